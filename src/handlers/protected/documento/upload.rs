// handlers/protected/documento/upload.rs - POST /api/documentos/upload handler

use axum::extract::{Multipart, State};
use axum::Extension;

use crate::auth::Role;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::IngestOutcome;
use crate::state::AppState;
use crate::types::UploadedDocument;

/// Roles allowed to feed the knowledge base
pub const UPLOAD_ROLES: [Role; 3] = [Role::Admin, Role::Coordenador, Role::Professor];

/// Filename used when the part carries none
const UNNAMED_UPLOAD: &str = "documento";

/// POST /api/documentos/upload - ingest one document into the knowledge base
///
/// Multipart fields: `file` and `subject_name` (alias `nome_disciplina`).
pub async fn upload(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> ApiResult<IngestOutcome> {
    user.require_any(&UPLOAD_ROLES)?;

    let (document, subject_name) = read_form(multipart).await?;
    tracing::info!(
        user = %user.id,
        filename = %document.filename,
        "Document upload received"
    );

    let outcome = state.pipeline.ingest(document, &subject_name).await?;
    Ok(ApiResponse::created(outcome))
}

async fn read_form(mut multipart: Multipart) -> Result<(UploadedDocument, String), ApiError> {
    let mut document = None;
    let mut subject_name = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                let filename = field
                    .file_name()
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or(UNNAMED_UPLOAD)
                    .to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?;

                document = Some(UploadedDocument {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            Some("subject_name") | Some("nome_disciplina") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid subject_name: {}", e)))?;
                subject_name = Some(value.trim().to_string());
            }
            _ => {}
        }
    }

    let document = document.ok_or_else(|| ApiError::missing_field("file"))?;
    let subject_name = subject_name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::missing_field("subject_name"))?;

    Ok((document, subject_name))
}
