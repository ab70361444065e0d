/// Shared domain types used across the codebase

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Document formats accepted by the ingestion endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Pdf,
    PlainText,
    Doc,
    Docx,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 4] = [
        DocumentKind::Pdf,
        DocumentKind::PlainText,
        DocumentKind::Doc,
        DocumentKind::Docx,
    ];

    /// Match a declared content type against the allow-list.
    /// Media type parameters such as `; charset=utf-8` are ignored.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        Self::ALL.into_iter().find(|kind| kind.mime() == essence)
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "txt" => Some(DocumentKind::PlainText),
            "doc" => Some(DocumentKind::Doc),
            "docx" => Some(DocumentKind::Docx),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::PlainText => "text/plain",
            DocumentKind::Doc => "application/msword",
            DocumentKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// A file received over HTTP, held in memory until the pipeline stages it
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Outcome of looking up a subject by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectReference {
    Resolved(Uuid),
    Unresolved,
}

impl SubjectReference {
    pub fn id(&self) -> Option<Uuid> {
        match self {
            SubjectReference::Resolved(id) => Some(*id),
            SubjectReference::Unresolved => None,
        }
    }
}

/// Summary and keywords extracted from one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedSummary {
    pub summary: String,
    pub keywords: Vec<String>,
}

impl ExtractedSummary {
    pub const DEFAULT_CATEGORY: &'static str = "Geral";

    /// First keyword, or the default category when no keywords were extracted
    pub fn category(&self) -> String {
        self.keywords
            .first()
            .cloned()
            .unwrap_or_else(|| Self::DEFAULT_CATEGORY.to_string())
    }
}

/// Lifecycle status of a knowledge base entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryStatus {
    #[serde(rename = "rascunho")]
    Draft,
    #[serde(rename = "publicado")]
    Published,
    #[serde(rename = "arquivado")]
    Archived,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Draft => "rascunho",
            EntryStatus::Published => "publicado",
            EntryStatus::Archived => "arquivado",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "rascunho" => Some(EntryStatus::Draft),
            "publicado" => Some(EntryStatus::Published),
            "arquivado" => Some(EntryStatus::Archived),
            _ => None,
        }
    }
}

/// Fields supplied when creating a knowledge base entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewKnowledgeBaseEntry {
    pub source_filename: String,
    pub summary: String,
    pub keywords: Vec<String>,
    pub category: String,
    pub visible_to: Vec<String>,
    pub status: EntryStatus,
    pub subject_id: Option<Uuid>,
    pub document_url: String,
}

/// A stored knowledge base row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBaseEntry {
    #[serde(rename = "id_conhecimento")]
    pub id: Uuid,
    #[serde(rename = "pergunta_principal")]
    pub source_filename: String,
    #[serde(rename = "resposta")]
    pub summary: String,
    #[serde(rename = "palavra_chave")]
    pub keywords: Vec<String>,
    #[serde(rename = "categoria")]
    pub category: Option<String>,
    #[serde(rename = "visivel_para")]
    pub visible_to: Vec<String>,
    pub status: EntryStatus,
    #[serde(rename = "id_disciplina")]
    pub subject_id: Option<Uuid>,
    #[serde(rename = "url_documento")]
    pub document_url: Option<String>,
    #[serde(rename = "criado_em")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "atualizado_em")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_allow_list() {
        assert_eq!(DocumentKind::from_content_type("application/pdf"), Some(DocumentKind::Pdf));
        assert_eq!(
            DocumentKind::from_content_type("text/plain; charset=utf-8"),
            Some(DocumentKind::PlainText)
        );
        assert_eq!(
            DocumentKind::from_content_type(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            ),
            Some(DocumentKind::Docx)
        );
        assert_eq!(DocumentKind::from_content_type("application/zip"), None);
        assert_eq!(DocumentKind::from_content_type(""), None);
    }

    #[test]
    fn category_falls_back_to_default() {
        let summary = ExtractedSummary {
            summary: "Texto.".to_string(),
            keywords: vec![],
        };
        assert_eq!(summary.category(), "Geral");

        let summary = ExtractedSummary {
            summary: "Texto.".to_string(),
            keywords: vec!["Cálculo".to_string(), "Limites".to_string()],
        };
        assert_eq!(summary.category(), "Cálculo");
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(serde_json::to_value(EntryStatus::Draft).unwrap(), "rascunho");
        assert_eq!(EntryStatus::parse("publicado"), Some(EntryStatus::Published));
        assert_eq!(EntryStatus::parse("unknown"), None);
    }
}
