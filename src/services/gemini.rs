//! Gemini `generateContent` client used for document summaries and grounded answers.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GeminiConfig;
use crate::services::answer::{grounded_answer_prompt, AnswerGenerator};
use crate::services::summarizer::{parse_summary, ContentSummarizer, SUMMARY_PROMPT};
use crate::services::ServiceError;
use crate::types::ExtractedSummary;

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// Send one request and return the concatenated text of the first candidate
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ServiceError> {
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ServiceError::ServiceUnavailable(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::ServiceUnavailable(format!(
                "Gemini returned {}: {}",
                status, body
            )));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            ServiceError::ServiceUnavailable(format!("Failed to parse Gemini response: {}", e))
        })?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ServiceError::ServiceUnavailable(
                "No text in Gemini response".to_string(),
            ));
        }

        debug!(model = %self.model, chars = text.len(), "Gemini response received");
        Ok(text)
    }
}

#[async_trait]
impl ContentSummarizer for GeminiClient {
    async fn summarize(
        &self,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<ExtractedSummary, ServiceError> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::Text {
                        text: SUMMARY_PROMPT.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: content_type.to_string(),
                            data: BASE64.encode(bytes),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: 0.2,
                response_mime_type: Some("application/json"),
            },
        };

        let text = self.generate(&request).await?;
        parse_summary(&text)
    }
}

#[async_trait]
impl AnswerGenerator for GeminiClient {
    async fn answer(&self, question: &str, context: &str) -> Result<String, ServiceError> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part::Text {
                    text: grounded_answer_prompt(question, context),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.1,
                response_mime_type: None,
            },
        };

        Ok(self.generate(&request).await?.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_camel_case_wire_names() {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::Text {
                        text: "prompt".to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "text/plain".to_string(),
                            data: BASE64.encode(b"ola"),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: 0.2,
                response_mime_type: Some("application/json"),
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "prompt");
        assert_eq!(value["contents"][0]["parts"][1]["inlineData"]["mimeType"], "text/plain");
        assert_eq!(value["contents"][0]["parts"][1]["inlineData"]["data"], "b2xh");
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn endpoint_includes_model() {
        let config = GeminiConfig {
            api_key: "key".to_string(),
            model: "gemini-2.0-flash".to_string(),
            base_url: "http://localhost:9999/".to_string(),
            answer_timeout_secs: 60,
        };
        let client = GeminiClient::new(&config, reqwest::Client::new());
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }
}
