// handlers/protected/ia/mod.rs - POST /api/ia/gerar-resposta handler

use axum::extract::{rejection::JsonRejection, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GerarRespostaRequest {
    #[serde(default)]
    pub pergunta: String,
    #[serde(default)]
    pub contexto: String,
}

#[derive(Debug, Serialize)]
pub struct GerarRespostaResponse {
    pub resposta: String,
}

/// POST /api/ia/gerar-resposta - answer a question from the supplied context only
pub async fn gerar_resposta(
    State(state): State<AppState>,
    body: Result<Json<GerarRespostaRequest>, JsonRejection>,
) -> ApiResult<GerarRespostaResponse> {
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;

    if request.pergunta.trim().is_empty() {
        return Err(ApiError::missing_field("pergunta"));
    }
    if request.contexto.trim().is_empty() {
        return Err(ApiError::missing_field("contexto"));
    }

    let limit = state.config.gemini.answer_timeout();
    let answer = tokio::time::timeout(
        limit,
        state.answers.answer(&request.pergunta, &request.contexto),
    )
    .await
    .map_err(|_| {
        tracing::warn!(?limit, "Answer generation timed out");
        ApiError::internal_server_error(format!("AI answer timed out after {:?}", limit))
    })?;

    let resposta = answer.map_err(|e| {
        tracing::error!("Answer generation failed: {}", e);
        ApiError::internal_server_error(format!("Failed to generate answer: {}", e))
    })?;

    Ok(ApiResponse::success(GerarRespostaResponse { resposta }))
}
