use async_trait::async_trait;

use crate::services::ServiceError;
use crate::types::SubjectReference;

/// Maps a subject name to its identifier in the records store.
///
/// Zero matches is `Ok(SubjectReference::Unresolved)`; only a store that cannot
/// be reached produces an error.
#[async_trait]
pub trait SubjectResolver: Send + Sync {
    async fn resolve(&self, name: &str) -> Result<SubjectReference, ServiceError>;
}
