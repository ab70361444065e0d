use anyhow::{anyhow, Context};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use url::Url;

/// Thin HTTP client for the API's `{"success", "data"}` envelope
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(server: &str, token: Option<String>) -> anyhow::Result<Self> {
        let base = Url::parse(server).with_context(|| format!("invalid server URL '{}'", server))?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("acad/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base, token })
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base
            .join(path)
            .with_context(|| format!("invalid request path '{}'", path))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GET `path` and return the envelope's `data`
    pub async fn get(&self, path: &str) -> anyhow::Result<Value> {
        let request = self.authorize(self.http.get(self.url(path)?));
        let response = request.send().await.context("request failed")?;
        unwrap_envelope(response).await
    }

    /// POST a document as multipart `file` + `subject_name`
    pub async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
        subject: &str,
    ) -> anyhow::Result<Value> {
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)?;
        let form = Form::new()
            .text("subject_name", subject.to_string())
            .part("file", part);

        let request = self.authorize(self.http.post(self.url("/api/documentos/upload")?));
        let response = request.multipart(form).send().await.context("upload failed")?;
        unwrap_envelope(response).await
    }
}

async fn unwrap_envelope(response: reqwest::Response) -> anyhow::Result<Value> {
    let status = response.status();
    let body: Value = response
        .json()
        .await
        .with_context(|| format!("server returned {} with a non-JSON body", status))?;

    if body.get("success").and_then(Value::as_bool) == Some(true) {
        return Ok(body.get("data").cloned().unwrap_or(Value::Null));
    }

    let code = body.get("error").and_then(Value::as_str).unwrap_or("ERROR");
    let detail = body
        .get("detail")
        .and_then(Value::as_str)
        .unwrap_or("no detail provided");
    Err(anyhow!("{} {}: {}", status.as_u16(), code, detail))
}
