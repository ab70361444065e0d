//! Document ingestion: stage the upload, link its subject, summarize it with the
//! AI service, store the original in the bucket and record a knowledge base entry.

use std::fmt;
use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::IngestConfig;
use crate::database::KnowledgeBaseStore;
use crate::services::filename::storage_key;
use crate::services::staging::StagedFile;
use crate::services::{ContentSummarizer, ObjectStore, ServiceError, SubjectResolver};
use crate::types::{
    DocumentKind, EntryStatus, NewKnowledgeBaseEntry, SubjectReference, UploadedDocument,
};

/// Audiences an ingested entry is visible to until an editor changes it
pub const DEFAULT_VISIBILITY: [&str; 2] = ["aluno", "professor"];

/// External call made by the pipeline, used to label failures and timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SubjectLookup,
    Summarize,
    Upload,
    Persist,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::SubjectLookup => "subject lookup",
            Stage::Summarize => "AI summarization",
            Stage::Upload => "object storage upload",
            Stage::Persist => "knowledge base insert",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unsupported file type '{0}'. Use PDF, TXT, DOC or DOCX.")]
    UnsupportedMediaType(String),

    #[error("Failed to stage upload: {0}")]
    Staging(#[from] io::Error),

    #[error("AI summarization failed: {0}")]
    Summarize(ServiceError),

    #[error("Object storage upload failed: {0}")]
    Upload(ServiceError),

    #[error("Knowledge base insert failed: {0}")]
    Persist(ServiceError),

    #[error("{stage} timed out after {limit:?}")]
    Timeout { stage: Stage, limit: Duration },
}

/// Summary of the entry created for an upload
#[derive(Debug, Clone, Serialize)]
pub struct IngestedEntry {
    pub id: Uuid,
    pub category: String,
    pub subject_id: Option<Uuid>,
    pub summary: String,
    pub keywords: Vec<String>,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub message: String,
    pub filename: String,
    pub content_type: String,
    pub document_url: String,
    pub knowledge_base: IngestedEntry,
}

pub struct IngestPipeline {
    subjects: Arc<dyn SubjectResolver>,
    summarizer: Arc<dyn ContentSummarizer>,
    object_store: Arc<dyn ObjectStore>,
    knowledge_base: Arc<dyn KnowledgeBaseStore>,
    config: IngestConfig,
}

impl IngestPipeline {
    pub fn new(
        subjects: Arc<dyn SubjectResolver>,
        summarizer: Arc<dyn ContentSummarizer>,
        object_store: Arc<dyn ObjectStore>,
        knowledge_base: Arc<dyn KnowledgeBaseStore>,
        config: IngestConfig,
    ) -> Self {
        Self {
            subjects,
            summarizer,
            object_store,
            knowledge_base,
            config,
        }
    }

    /// Run the whole pipeline for one upload.
    ///
    /// The staged copy is removed before this returns on every path past staging.
    pub async fn ingest(
        &self,
        document: UploadedDocument,
        subject_name: &str,
    ) -> Result<IngestOutcome, IngestError> {
        let UploadedDocument {
            filename,
            content_type,
            bytes,
        } = document;

        let kind = DocumentKind::from_content_type(&content_type)
            .ok_or_else(|| IngestError::UnsupportedMediaType(content_type.clone()))?;

        info!(
            filename = %filename,
            content_type = %content_type,
            size = bytes.len(),
            subject = %subject_name,
            "Received document for ingestion"
        );

        let staged = StagedFile::write(&self.config.staging_dir, &filename, &bytes).await?;
        drop(bytes);

        let prepared = self.prepare_entry(&staged, &filename, kind, subject_name).await;
        staged.remove().await;
        let new_entry = prepared?;

        let entry = within(
            Stage::Persist,
            self.config.persist_timeout(),
            self.knowledge_base.insert(new_entry.clone()),
            IngestError::Persist,
        )
        .await?;

        info!(
            id = %entry.id,
            category = %new_entry.category,
            subject_id = ?entry.subject_id,
            "Knowledge base entry created"
        );

        let document_url = new_entry.document_url;
        Ok(IngestOutcome {
            message: format!("File '{}' ingested into the knowledge base.", filename),
            filename,
            content_type,
            document_url: document_url.clone(),
            knowledge_base: IngestedEntry {
                id: entry.id,
                category: entry.category.unwrap_or(new_entry.category),
                subject_id: entry.subject_id,
                summary: entry.summary,
                keywords: entry.keywords,
                url: entry.document_url.unwrap_or(document_url),
            },
        })
    }

    /// Lookup, summarization, categorization and upload, all against the staged copy
    async fn prepare_entry(
        &self,
        staged: &StagedFile,
        filename: &str,
        kind: DocumentKind,
        subject_name: &str,
    ) -> Result<NewKnowledgeBaseEntry, IngestError> {
        let subject = self.resolve_subject(subject_name).await;

        let bytes = staged.read().await?;

        let extracted = within(
            Stage::Summarize,
            self.config.summarize_timeout(),
            self.summarizer.summarize(&bytes, kind.mime()),
            IngestError::Summarize,
        )
        .await?;
        let category = extracted.category();
        info!(
            keywords = extracted.keywords.len(),
            category = %category,
            "Document summarized"
        );

        let key = storage_key(filename);
        within(
            Stage::Upload,
            self.config.upload_timeout(),
            self.object_store.upload(&key, &bytes, kind.mime()),
            IngestError::Upload,
        )
        .await?;
        let document_url = self
            .object_store
            .public_url(&key)
            .map_err(IngestError::Upload)?;

        Ok(NewKnowledgeBaseEntry {
            source_filename: filename.to_string(),
            summary: extracted.summary,
            keywords: extracted.keywords,
            category,
            visible_to: DEFAULT_VISIBILITY.iter().map(|s| s.to_string()).collect(),
            status: EntryStatus::Draft,
            subject_id: subject.id(),
            document_url,
        })
    }

    /// Resolve the subject, treating lookup failures as "no subject linked"
    async fn resolve_subject(&self, subject_name: &str) -> SubjectReference {
        let limit = self.config.lookup_timeout();
        match tokio::time::timeout(limit, self.subjects.resolve(subject_name)).await {
            Ok(Ok(reference)) => {
                if reference == SubjectReference::Unresolved {
                    info!(subject = %subject_name, "No subject matches name; ingesting without one");
                }
                reference
            }
            Ok(Err(e)) => {
                warn!(subject = %subject_name, error = %e, "Subject lookup failed; ingesting without one");
                SubjectReference::Unresolved
            }
            Err(_) => {
                warn!(
                    subject = %subject_name,
                    "{} timed out after {:?}; ingesting without one",
                    Stage::SubjectLookup,
                    limit
                );
                SubjectReference::Unresolved
            }
        }
    }
}

/// Await an external call with a deadline
async fn within<T, F>(
    stage: Stage,
    limit: Duration,
    call: F,
    on_error: fn(ServiceError) -> IngestError,
) -> Result<T, IngestError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            warn!(stage = %stage, error = %e, "Ingestion step failed");
            Err(on_error(e))
        }
        Err(_) => {
            warn!(stage = %stage, ?limit, "Ingestion step timed out");
            Err(IngestError::Timeout { stage, limit })
        }
    }
}
