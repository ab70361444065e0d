// handlers/protected/conhecimento/mod.rs - Knowledge base reads
//
// GET /api/conhecimento      - list entries, newest first
// GET /api/conhecimento/:id  - one entry

use axum::extract::{Path, State};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::types::KnowledgeBaseEntry;

/// GET /api/conhecimento - list knowledge base entries
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<KnowledgeBaseEntry>> {
    let entries = state.knowledge_base.list().await?;
    Ok(ApiResponse::success(entries))
}

/// GET /api/conhecimento/:id - show one entry
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<KnowledgeBaseEntry> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::bad_request(format!("Invalid entry id '{}'", id)))?;

    let entry = state.knowledge_base.get(id).await?;
    Ok(ApiResponse::success(entry))
}
