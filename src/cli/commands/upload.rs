use std::path::Path;

use anyhow::Context;

use crate::cli::client::ApiClient;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::types::DocumentKind;

pub async fn handle(
    client: &ApiClient,
    path: &Path,
    subject: &str,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("'{}' has no file name", path.display()))?;
    let content_type = content_type_for(path);

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read '{}'", path.display()))?;

    let data = client.upload(filename, content_type, bytes, subject).await?;

    let url = data
        .get("document_url")
        .and_then(|u| u.as_str())
        .unwrap_or("-")
        .to_string();
    output_success(
        &output_format,
        &format!("Uploaded '{}' ({})", filename, url),
        Some(data),
    )
}

/// Content type from the extension; the server rejects anything unknown
fn content_type_for(path: &Path) -> &'static str {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(DocumentKind::from_extension)
        .map(|kind| kind.mime())
        .unwrap_or("application/octet-stream")
}
