use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::services::{ServiceError, SubjectResolver};
use crate::types::SubjectReference;

/// Subject lookup against the `disciplina` table
pub struct PgSubjectResolver {
    pool: PgPool,
}

impl PgSubjectResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn first_id_by_name(&self, name: &str) -> Result<Option<Uuid>, DatabaseError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            "SELECT id_disciplina FROM disciplina WHERE nome_disciplina = $1 LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id)
    }
}

/// Map a lookup result onto the subject reference the pipeline records
fn reference_from(result: Result<Option<Uuid>, DatabaseError>) -> Result<SubjectReference, ServiceError> {
    match result {
        Ok(Some(id)) => Ok(SubjectReference::Resolved(id)),
        Ok(None) => Ok(SubjectReference::Unresolved),
        Err(e) => Err(ServiceError::ServiceUnavailable(format!(
            "subject lookup failed: {}",
            e
        ))),
    }
}

#[async_trait]
impl SubjectResolver for PgSubjectResolver {
    async fn resolve(&self, name: &str) -> Result<SubjectReference, ServiceError> {
        reference_from(self.first_id_by_name(name).await)
    }
}
