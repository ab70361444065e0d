#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use academic_api::config::{AppConfig, Environment};
use academic_api::database::KnowledgeBaseStore;
use academic_api::services::{GeminiClient, ServiceError, SubjectResolver, SupabaseStorage};
use academic_api::types::{KnowledgeBaseEntry, NewKnowledgeBaseEntry, SubjectReference};
use academic_api::{app, AppState, Services};

pub const JWT_SECRET: &str = "test-jwt-secret";
pub const SUBJECT_NAME: &str = "Cálculo I";
pub const GEMINI_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";
pub const UPLOAD_PATH: &str = r"^/storage/v1/object/documentos/.+";

const BOUNDARY: &str = "academic-api-test-boundary";

/// Subject table with a single known subject
pub struct MemorySubjects {
    pub id: Uuid,
}

#[async_trait]
impl SubjectResolver for MemorySubjects {
    async fn resolve(&self, name: &str) -> Result<SubjectReference, ServiceError> {
        if name == SUBJECT_NAME {
            Ok(SubjectReference::Resolved(self.id))
        } else {
            Ok(SubjectReference::Unresolved)
        }
    }
}

/// Knowledge base kept in memory
#[derive(Default)]
pub struct MemoryKnowledgeBase {
    entries: Mutex<Vec<KnowledgeBaseEntry>>,
}

impl MemoryKnowledgeBase {
    pub fn entries(&self) -> Vec<KnowledgeBaseEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl KnowledgeBaseStore for MemoryKnowledgeBase {
    async fn insert(&self, entry: NewKnowledgeBaseEntry) -> Result<KnowledgeBaseEntry, ServiceError> {
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
            created_at: chrono::Utc::now(),
            updated_at: None,
        };
        self.entries.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: Uuid) -> Result<KnowledgeBaseEntry, ServiceError> {
        self.entries()
            .into_iter()
            .find(|e| e.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("knowledge base entry {} not found", id)))
    }

    async fn list(&self) -> Result<Vec<KnowledgeBaseEntry>, ServiceError> {
        let mut entries = self.entries();
        entries.reverse();
        Ok(entries)
    }

    async fn health_check(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}

/// Router wired to in-memory stores and mock Gemini / Storage servers
pub struct TestApp {
    pub router: Router,
    pub staging: tempfile::TempDir,
    pub gemini: MockServer,
    pub storage: MockServer,
    pub knowledge_base: Arc<MemoryKnowledgeBase>,
    pub subject_id: Uuid,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let staging = tempfile::tempdir().unwrap();
        let gemini = MockServer::start().await;
        let storage = MockServer::start().await;

        let mut config = AppConfig::for_environment(Environment::Development);
        config.api.enable_request_logging = false;
        config.security.jwt_secret = JWT_SECRET.to_string();
        config.supabase.url = storage.uri();
        config.supabase.service_key = "service-key".to_string();
        config.gemini.base_url = gemini.uri();
        config.gemini.api_key = "gemini-key".to_string();
        config.ingest.staging_dir = staging.path().join("uploads");
        config.ingest.summarize_timeout_secs = 5;
        config.ingest.upload_timeout_secs = 5;
        config.gemini.answer_timeout_secs = 1;

        let http = reqwest::Client::new();
        let ai = Arc::new(GeminiClient::new(&config.gemini, http.clone()));
        let knowledge_base = Arc::new(MemoryKnowledgeBase::default());
        let subject_id = Uuid::new_v4();

        let services = Services {
            subjects: Arc::new(MemorySubjects { id: subject_id }),
            summarizer: ai.clone(),
            object_store: Arc::new(SupabaseStorage::new(&config.supabase, http).unwrap()),
            knowledge_base: knowledge_base.clone(),
            answers: ai,
        };

        Self {
            router: app(AppState::new(config, services)),
            staging,
            gemini,
            storage,
            knowledge_base,
            subject_id,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| json!({ "raw": String::from_utf8_lossy(&bytes) }))
        };
        (status, body)
    }

    /// Gemini answers every request with `text` as the candidate
    pub async fn mock_gemini_text(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path(GEMINI_PATH))
            .respond_with(gemini_reply(text))
            .mount(&self.gemini)
            .await;
    }

    /// Storage accepts uploads; `expected` pins the number of calls
    pub async fn mock_storage_upload(&self, expected: u64) {
        Mock::given(method("POST"))
            .and(path_regex(UPLOAD_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Key": "documentos/x" })))
            .expect(expected)
            .mount(&self.storage)
            .await;
    }

    pub fn staged_files(&self) -> usize {
        count_files(&self.staging.path().join("uploads"))
    }
}

fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

pub fn gemini_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    }))
}

/// HS256 token signed with the test secret
pub fn token(role: Option<&str>) -> String {
    let mut claims = json!({
        "sub": Uuid::new_v4().to_string(),
        "email": "docente@faculdade.test",
        "aud": "authenticated",
        "exp": chrono::Utc::now().timestamp() + 3600,
    });
    if let Some(role) = role {
        claims["user_metadata"] = json!({ "role": role, "name": "Docente" });
    }

    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

/// Multipart form part: (name, optional filename + content type, bytes)
pub struct FormPart<'a> {
    pub name: &'a str,
    pub file: Option<(&'a str, &'a str)>,
    pub bytes: &'a [u8],
}

pub fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part.file {
            Some((filename, content_type)) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        part.name, filename, content_type
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", part.name).as_bytes(),
                );
            }
        }
        body.extend_from_slice(part.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Upload request with `file` and, when given, `subject_name`
pub fn upload_request(
    token: Option<&str>,
    file: Option<(&str, &str, &[u8])>,
    subject: Option<&str>,
) -> Request<Body> {
    let mut parts = Vec::new();
    if let Some((filename, content_type, bytes)) = file {
        parts.push(FormPart {
            name: "file",
            file: Some((filename, content_type)),
            bytes,
        });
    }
    if let Some(subject) = subject {
        parts.push(FormPart {
            name: "subject_name",
            file: None,
            bytes: subject.as_bytes(),
        });
    }

    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/documentos/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(multipart_body(&parts))).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn json_request(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}
