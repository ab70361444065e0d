use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

use crate::database::KnowledgeBaseStore;
use crate::services::{ContentSummarizer, ObjectStore, ServiceError, SubjectResolver};
use crate::types::{ExtractedSummary, KnowledgeBaseEntry, NewKnowledgeBaseEntry, SubjectReference};

/// Subject name the fakes resolve in most tests
pub const TEXT_SUBJECT: &str = "Cálculo I";

/// In-memory subject table
#[derive(Default)]
pub struct FakeSubjects {
    subjects: HashMap<String, Uuid>,
    unavailable: bool,
}

impl FakeSubjects {
    pub fn with(name: &str, id: Uuid) -> Self {
        let mut subjects = HashMap::new();
        subjects.insert(name.to_string(), id);
        Self {
            subjects,
            unavailable: false,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            subjects: HashMap::new(),
            unavailable: true,
        }
    }
}

#[async_trait]
impl SubjectResolver for FakeSubjects {
    async fn resolve(&self, name: &str) -> Result<SubjectReference, ServiceError> {
        if self.unavailable {
            return Err(ServiceError::ServiceUnavailable("connection refused".to_string()));
        }
        Ok(self
            .subjects
            .get(name)
            .map(|id| SubjectReference::Resolved(*id))
            .unwrap_or(SubjectReference::Unresolved))
    }
}

/// Summarizer with a canned reply and optional latency
pub struct FakeSummarizer {
    reply: Result<ExtractedSummary, ServiceError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeSummarizer {
    pub fn replying(summary: ExtractedSummary) -> Self {
        Self {
            reply: Ok(summary),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: ServiceError) -> Self {
        Self {
            reply: Err(err),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentSummarizer for FakeSummarizer {
    async fn summarize(&self, _bytes: &[u8], _content_type: &str) -> Result<ExtractedSummary, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone()
    }
}

#[derive(Debug, Clone)]
pub struct UploadedObject {
    pub key: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Object store that records uploads in memory
#[derive(Default)]
pub struct FakeObjectStore {
    uploads: Mutex<Vec<UploadedObject>>,
    fail: bool,
}

impl FakeObjectStore {
    pub fn failing() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn uploads(&self) -> Vec<UploadedObject> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn upload(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), ServiceError> {
        if self.fail {
            return Err(ServiceError::ServiceUnavailable("bucket not found".to_string()));
        }
        self.uploads.lock().unwrap().push(UploadedObject {
            key: key.to_string(),
            bytes: bytes.to_vec(),
            content_type: content_type.to_string(),
        });
        Ok(())
    }

    fn public_url(&self, key: &str) -> Result<String, ServiceError> {
        Ok(format!("https://storage.test/public/documentos/{}", key))
    }
}

/// Knowledge base kept in memory
#[derive(Default)]
pub struct FakeKnowledgeBase {
    entries: Mutex<Vec<KnowledgeBaseEntry>>,
    fail: bool,
}

impl FakeKnowledgeBase {
    pub fn failing() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn entries(&self) -> Vec<KnowledgeBaseEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl KnowledgeBaseStore for FakeKnowledgeBase {
    async fn insert(&self, entry: NewKnowledgeBaseEntry) -> Result<KnowledgeBaseEntry, ServiceError> {
        if self.fail {
            return Err(ServiceError::ValidationError(
                "null value in column \"resposta\" violates not-null constraint".to_string(),
            ));
        }
        let stored = KnowledgeBaseEntry {
            id: Uuid::new_v4(),
            source_filename: entry.source_filename,
            summary: entry.summary,
            keywords: entry.keywords,
            category: Some(entry.category),
            visible_to: entry.visible_to,
            status: entry.status,
            subject_id: entry.subject_id,
            document_url: Some(entry.document_url),
            created_at: Utc::now(),
            updated_at: None,
        };
        self.entries.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: Uuid) -> Result<KnowledgeBaseEntry, ServiceError> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("knowledge base entry {}", id)))
    }

    async fn list(&self) -> Result<Vec<KnowledgeBaseEntry>, ServiceError> {
        let mut entries = self.entries();
        entries.reverse();
        Ok(entries)
    }

    async fn health_check(&self) -> Result<(), ServiceError> {
        if self.fail {
            return Err(ServiceError::ServiceUnavailable("database down".to_string()));
        }
        Ok(())
    }
}
