use async_trait::async_trait;
use serde::Deserialize;

use crate::services::ServiceError;
use crate::types::ExtractedSummary;

/// Instruction sent alongside every document
pub const SUMMARY_PROMPT: &str = r#"Você é um assistente acadêmico que cataloga materiais de disciplinas.
Leia o documento anexado e responda SOMENTE com um objeto JSON válido, sem texto adicional, no formato:
{"summary": "<resumo em prosa de 3 a 8 frases, em português>", "keywords": ["<palavra-chave curta>", "..."]}
Regras:
- "summary" descreve o conteúdo principal do documento.
- "keywords" lista de 3 a 10 termos curtos, do mais relevante para o menos relevante.
- Não inclua nenhum outro campo."#;

/// Produces a summary and keywords for a document
#[async_trait]
pub trait ContentSummarizer: Send + Sync {
    async fn summarize(
        &self,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<ExtractedSummary, ServiceError>;
}

#[derive(Debug, Deserialize)]
struct SummaryPayload {
    summary: String,
    keywords: Vec<String>,
}

/// Remove a surrounding Markdown code fence (```json ... ```), if present
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string (`json`) on the opening fence line, or before the payload on a one-line fence
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };

    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Parse the model's reply into an `ExtractedSummary`.
///
/// Malformed JSON, missing fields and a blank summary are all validation errors.
pub fn parse_summary(text: &str) -> Result<ExtractedSummary, ServiceError> {
    let body = strip_code_fences(text);

    let payload: SummaryPayload = serde_json::from_str(body).map_err(|e| {
        ServiceError::ValidationError(format!("AI response is not the expected JSON: {}", e))
    })?;

    let summary = payload.summary.trim().to_string();
    if summary.is_empty() {
        return Err(ServiceError::ValidationError(
            "AI response has an empty summary".to_string(),
        ));
    }

    let keywords = payload
        .keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();

    Ok(ExtractedSummary { summary, keywords })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &str =
        r#"{"summary": "Apostila sobre limites e derivadas.", "keywords": ["Cálculo", "limites"]}"#;

    #[test]
    fn parses_plain_json() {
        let parsed = parse_summary(PLAIN).unwrap();
        assert_eq!(parsed.summary, "Apostila sobre limites e derivadas.");
        assert_eq!(parsed.keywords, vec!["Cálculo", "limites"]);
    }

    #[test]
    fn fenced_response_parses_like_unfenced() {
        let fenced = format!("```json\n{}\n```", PLAIN);
        let bare_fence = format!("```\n{}\n```\n", PLAIN);
        let single_line = format!("```{}```", PLAIN);
        let single_line_tagged = format!("```json {}```", PLAIN);

        let expected = parse_summary(PLAIN).unwrap();
        assert_eq!(parse_summary(&fenced).unwrap(), expected);
        assert_eq!(parse_summary(&bare_fence).unwrap(), expected);
        assert_eq!(parse_summary(&single_line).unwrap(), expected);
        assert_eq!(parse_summary(&single_line_tagged).unwrap(), expected);
    }

    #[test]
    fn missing_keywords_is_a_validation_error() {
        let err = parse_summary(r#"{"summary": "Sem palavras-chave."}"#).unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    #[test]
    fn malformed_json_is_a_validation_error() {
        let err = parse_summary("Claro! Aqui está o resumo: ...").unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    #[test]
    fn blank_summary_is_rejected() {
        let err = parse_summary(r#"{"summary": "  ", "keywords": ["x"]}"#).unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    #[test]
    fn blank_keywords_are_dropped_and_order_kept() {
        let parsed =
            parse_summary(r#"{"summary": "Resumo.", "keywords": [" redes ", "", "TCP/IP"]}"#).unwrap();
        assert_eq!(parsed.keywords, vec!["redes", "TCP/IP"]);
    }
}
