use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::services::ServiceError;
use crate::types::{EntryStatus, KnowledgeBaseEntry, NewKnowledgeBaseEntry};

/// Durable store of knowledge base entries
#[async_trait]
pub trait KnowledgeBaseStore: Send + Sync {
    /// Insert one entry and return the stored row
    async fn insert(&self, entry: NewKnowledgeBaseEntry) -> Result<KnowledgeBaseEntry, ServiceError>;

    /// Fetch one entry; `NotFound` when the id does not exist
    async fn get(&self, id: Uuid) -> Result<KnowledgeBaseEntry, ServiceError>;

    /// All entries, newest first
    async fn list(&self) -> Result<Vec<KnowledgeBaseEntry>, ServiceError>;

    async fn health_check(&self) -> Result<(), ServiceError>;
}

/// Serialize a list column to the JSON text stored in the table
pub fn encode_list(values: &[String]) -> String {
    Value::Array(values.iter().cloned().map(Value::String).collect()).to_string()
}

/// Decode a list column. Rows written by older clients hold the array
/// double-encoded as a JSON string, so one level of string wrapping is unwrapped.
pub fn decode_list(raw: Option<&str>) -> Result<Vec<String>, DatabaseError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(Vec::new());
    };

    let value: Value =
        serde_json::from_str(raw).map_err(|e| DatabaseError::Decode(format!("list: {}", e)))?;

    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(inner) => decode_list(Some(&inner)),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(DatabaseError::Decode(format!("list item {}", other))),
            })
            .collect(),
        other => Err(DatabaseError::Decode(format!("list: unexpected {}", other))),
    }
}

const SELECT_COLUMNS: &str = "id_conhecimento, pergunta_principal, resposta, \
    palavra_chave::text AS palavra_chave, categoria, visivel_para::text AS visivel_para, \
    status, id_disciplina, url_documento, criado_em, atualizado_em";

/// Knowledge base backed by the `baseconhecimento` table
pub struct PgKnowledgeBase {
    pool: PgPool,
}

impl PgKnowledgeBase {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn entry_from_row(row: &PgRow) -> Result<KnowledgeBaseEntry, DatabaseError> {
        let status: String = row.try_get("status")?;
        let status = EntryStatus::parse(&status)
            .ok_or_else(|| DatabaseError::Decode(format!("status '{}'", status)))?;

        Ok(KnowledgeBaseEntry {
            id: row.try_get("id_conhecimento")?,
            source_filename: row.try_get("pergunta_principal")?,
            summary: row.try_get("resposta")?,
            keywords: decode_list(row.try_get::<Option<String>, _>("palavra_chave")?.as_deref())?,
            category: row.try_get("categoria")?,
            visible_to: decode_list(row.try_get::<Option<String>, _>("visivel_para")?.as_deref())?,
            status,
            subject_id: row.try_get("id_disciplina")?,
            document_url: row.try_get("url_documento")?,
            created_at: row.try_get::<DateTime<Utc>, _>("criado_em")?,
            updated_at: row.try_get::<Option<DateTime<Utc>>, _>("atualizado_em")?,
        })
    }

    // List parameters are cast through jsonb so text, json and jsonb columns all accept them
    async fn insert_row(&self, entry: &NewKnowledgeBaseEntry) -> Result<KnowledgeBaseEntry, DatabaseError> {
        let sql = format!(
            "INSERT INTO baseconhecimento \
             (pergunta_principal, resposta, palavra_chave, categoria, visivel_para, status, id_disciplina, url_documento) \
             VALUES ($1, $2, $3::jsonb, $4, $5::jsonb, $6, $7, $8) \
             RETURNING {}",
            SELECT_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(&entry.source_filename)
            .bind(&entry.summary)
            .bind(encode_list(&entry.keywords))
            .bind(&entry.category)
            .bind(encode_list(&entry.visible_to))
            .bind(entry.status.as_str())
            .bind(entry.subject_id)
            .bind(&entry.document_url)
            .fetch_one(&self.pool)
            .await?;

        Self::entry_from_row(&row)
    }

    async fn fetch_one(&self, id: Uuid) -> Result<KnowledgeBaseEntry, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM baseconhecimento WHERE id_conhecimento = $1",
            SELECT_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("knowledge base entry {}", id)))?;

        Self::entry_from_row(&row)
    }

    async fn fetch_all(&self) -> Result<Vec<KnowledgeBaseEntry>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM baseconhecimento ORDER BY criado_em DESC",
            SELECT_COLUMNS
        );

        sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(Self::entry_from_row)
            .collect()
    }
}

#[async_trait]
impl KnowledgeBaseStore for PgKnowledgeBase {
    async fn insert(&self, entry: NewKnowledgeBaseEntry) -> Result<KnowledgeBaseEntry, ServiceError> {
        Ok(self.insert_row(&entry).await?)
    }

    async fn get(&self, id: Uuid) -> Result<KnowledgeBaseEntry, ServiceError> {
        Ok(self.fetch_one(id).await?)
    }

    async fn list(&self) -> Result<Vec<KnowledgeBaseEntry>, ServiceError> {
        Ok(self.fetch_all().await?)
    }

    async fn health_check(&self) -> Result<(), ServiceError> {
        Ok(DatabaseManager::health_check(&self.pool).await?)
    }
}
