use anyhow::{bail, Context};
use async_trait::async_trait;
use tracing::info;
use url::Url;

use crate::config::SupabaseConfig;
use crate::services::ServiceError;

/// Blob storage addressed by key
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `bytes` under `key`, overwriting any existing object
    async fn upload(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), ServiceError>;

    /// Publicly reachable URL of the object stored under `key`
    fn public_url(&self, key: &str) -> Result<String, ServiceError>;
}

/// Supabase Storage bucket accessed through its REST API
pub struct SupabaseStorage {
    http: reqwest::Client,
    base_url: Url,
    service_key: String,
    bucket: String,
}

impl SupabaseStorage {
    pub fn new(config: &SupabaseConfig, http: reqwest::Client) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.url)
            .with_context(|| format!("invalid SUPABASE_URL '{}'", config.url))?;
        if base_url.cannot_be_a_base() {
            bail!("SUPABASE_URL cannot be a base: {}", config.url);
        }

        Ok(Self {
            http,
            base_url,
            service_key: config.service_key.clone(),
            bucket: config.storage_bucket.clone(),
        })
    }

    /// `<base>/storage/v1/object[/<visibility>]/<bucket>/<key>` with each segment escaped
    fn object_url(&self, visibility: Option<&str>, key: &str) -> Result<Url, ServiceError> {
        if key.is_empty() {
            return Err(ServiceError::ValidationError("empty object key".to_string()));
        }

        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ServiceError::ValidationError(format!("SUPABASE_URL cannot be a base: {}", self.base_url))
            })?;
            segments.pop_if_empty().extend(["storage", "v1", "object"]);
            if let Some(visibility) = visibility {
                segments.push(visibility);
            }
            segments.push(&self.bucket).push(key);
        }
        Ok(url)
    }
}

#[async_trait]
impl ObjectStore for SupabaseStorage {
    async fn upload(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), ServiceError> {
        let url = self.object_url(None, key)?;

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header("x-upsert", "true")
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| ServiceError::ServiceUnavailable(format!("storage upload failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::ServiceUnavailable(format!(
                "storage returned {} for '{}': {}",
                status, key, body
            )));
        }

        info!(bucket = %self.bucket, key, size = bytes.len(), "Uploaded object");
        Ok(())
    }

    fn public_url(&self, key: &str) -> Result<String, ServiceError> {
        Ok(self.object_url(Some("public"), key)?.to_string())
    }
}
