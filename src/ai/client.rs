//! Multi-provider AI client for the study tools.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use thiserror::Error;

use crate::config::{AiConfig, ProviderKind};
use crate::store::ChatMessage;

use super::prompts;

/// Connection timeout for HTTP requests.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Overall request timeout. Document analysis can take a while.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum number of retries for transient failures.
const MAX_RETRIES: u32 = 3;

/// Build an HTTP client with proper timeout configuration.
fn build_http_client() -> Client {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default HTTP client");
            Client::new()
        })
}

/// Determine if a request should be retried based on status code and attempt count.
fn should_retry(status_code: u16, attempt: u32) -> bool {
    if attempt >= MAX_RETRIES {
        return false;
    }
    (500..600).contains(&status_code)
}

/// Calculate exponential backoff duration for retry attempts.
fn calculate_backoff(attempt: u32) -> Duration {
    // 1s, 2s, 4s
    Duration::from_secs(1 << attempt)
}

/// Errors from AI client operations.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("API key not configured (env: {0})")]
    MissingApiKey(String),
    #[error("API request failed: {0}")]
    RequestFailed(String),
    #[error("Failed to parse response: {0}")]
    ParseError(String),
    #[error("Unsupported attachment type: {0}")]
    UnsupportedAttachment(String),
    #[error("AI request timed out")]
    Timeout,
}

/// A file sent to the model alongside a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl Attachment {
    #[must_use]
    pub fn new(filename: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    fn is_text(&self) -> bool {
        self.mime_type.starts_with("text/")
    }

    fn base64(&self) -> String {
        BASE64.encode(&self.data)
    }
}

/// Trait for AI providers.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Generate a response from a system and user prompt.
    async fn generate(&self, system: &str, user: &str) -> Result<String, AiError>;

    /// Generate a response about an attached file.
    async fn generate_with_attachment(
        &self,
        system: &str,
        user: &str,
        attachment: &Attachment,
    ) -> Result<String, AiError>;
}

fn map_send_error(e: &reqwest::Error) -> AiError {
    if e.is_timeout() {
        AiError::Timeout
    } else {
        AiError::RequestFailed(e.to_string())
    }
}

/// POST a JSON body, retrying 5xx responses with exponential backoff.
async fn post_json_with_retry(
    client: &Client,
    url: &str,
    headers: &[(&str, &str)],
    body: &serde_json::Value,
) -> Result<serde_json::Value, AiError> {
    let mut attempt = 0;
    loop {
        let mut request = client.post(url).header("Content-Type", "application/json");
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| map_send_error(&e))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| AiError::ParseError(e.to_string()));
        }

        let status_code = status.as_u16();
        if should_retry(status_code, attempt) {
            let backoff = calculate_backoff(attempt);
            tracing::warn!(
                status = status_code,
                attempt,
                backoff_secs = backoff.as_secs(),
                "AI request failed, retrying"
            );
            tokio::time::sleep(backoff).await;
            attempt += 1;
            continue;
        }

        let text = response.text().await.unwrap_or_default();
        return Err(AiError::RequestFailed(format!("HTTP {status}: {text}")));
    }
}

/// Build a Gemini `generateContent` request body.
fn gemini_body(
    system: &str,
    user: &str,
    attachment: Option<&Attachment>,
    max_tokens: u32,
) -> serde_json::Value {
    let mut parts = Vec::with_capacity(2);
    if let Some(attachment) = attachment {
        parts.push(serde_json::json!({
            "inlineData": {
                "mimeType": attachment.mime_type,
                "data": attachment.base64()
            }
        }));
    }
    parts.push(serde_json::json!({ "text": user }));

    serde_json::json!({
        "contents": [{
            "role": "user",
            "parts": parts
        }],
        "systemInstruction": {
            "parts": [{ "text": system }]
        },
        "generationConfig": {
            "maxOutputTokens": max_tokens
        }
    })
}

/// Build a Claude Messages API request body.
///
/// PDFs go in a base64 `document` block and text files are inlined ahead of
/// the question. Other file types are rejected.
fn claude_body(
    model: &str,
    system: &str,
    user: &str,
    attachment: Option<&Attachment>,
    max_tokens: u32,
) -> Result<serde_json::Value, AiError> {
    let content = match attachment {
        None => serde_json::json!(user),
        Some(file) if file.mime_type == "application/pdf" => serde_json::json!([
            {
                "type": "document",
                "source": {
                    "type": "base64",
                    "media_type": file.mime_type,
                    "data": file.base64()
                }
            },
            { "type": "text", "text": user }
        ]),
        Some(file) if file.is_text() => {
            let text = String::from_utf8_lossy(&file.data);
            serde_json::json!(format!(
                "Document ({}):\n\n{text}\n\n{user}",
                file.filename
            ))
        }
        Some(file) => return Err(AiError::UnsupportedAttachment(file.mime_type.clone())),
    };

    Ok(serde_json::json!({
        "model": model,
        "max_tokens": max_tokens,
        "system": system,
        "messages": [{
            "role": "user",
            "content": content
        }]
    }))
}

/// Gemini API provider.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    #[must_use]
    pub fn new(base_url: String, api_key: String, model: String, max_tokens: u32) -> Self {
        Self {
            client: build_http_client(),
            base_url,
            api_key,
            model,
            max_tokens,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    async fn send(&self, body: serde_json::Value) -> Result<String, AiError> {
        let json = post_json_with_retry(
            &self.client,
            &self.url(),
            &[("x-goog-api-key", self.api_key.as_str())],
            &body,
        )
        .await?;

        json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| AiError::ParseError("No text in Gemini response".to_string()))
    }
}

#[async_trait]
impl AiProvider for GeminiProvider {
    async fn generate(&self, system: &str, user: &str) -> Result<String, AiError> {
        self.send(gemini_body(system, user, None, self.max_tokens))
            .await
    }

    async fn generate_with_attachment(
        &self,
        system: &str,
        user: &str,
        attachment: &Attachment,
    ) -> Result<String, AiError> {
        self.send(gemini_body(system, user, Some(attachment), self.max_tokens))
            .await
    }
}

/// Claude API provider.
#[derive(Debug, Clone)]
pub struct ClaudeProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl ClaudeProvider {
    /// Create a new Claude provider.
    #[must_use]
    pub fn new(base_url: String, api_key: String, model: String, max_tokens: u32) -> Self {
        Self {
            client: build_http_client(),
            base_url,
            api_key,
            model,
            max_tokens,
        }
    }

    async fn send(&self, body: serde_json::Value) -> Result<String, AiError> {
        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let json = post_json_with_retry(
            &self.client,
            &url,
            &[
                ("x-api-key", self.api_key.as_str()),
                ("anthropic-version", "2023-06-01"),
            ],
            &body,
        )
        .await?;

        json["content"][0]["text"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| AiError::ParseError("No text in Claude response".to_string()))
    }
}

#[async_trait]
impl AiProvider for ClaudeProvider {
    async fn generate(&self, system: &str, user: &str) -> Result<String, AiError> {
        let body = claude_body(&self.model, system, user, None, self.max_tokens)?;
        self.send(body).await
    }

    async fn generate_with_attachment(
        &self,
        system: &str,
        user: &str,
        attachment: &Attachment,
    ) -> Result<String, AiError> {
        let body = claude_body(&self.model, system, user, Some(attachment), self.max_tokens)?;
        self.send(body).await
    }
}

/// Client for the study tools, backed by any [`AiProvider`].
#[derive(Clone)]
pub struct AiClient {
    provider: Arc<dyn AiProvider>,
    config: AiConfig,
}

impl fmt::Debug for AiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiClient")
            .field("provider", &self.config.provider)
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

impl AiClient {
    /// Create a new client with the given provider and config.
    #[must_use]
    pub fn new(provider: Arc<dyn AiProvider>, config: AiConfig) -> Self {
        Self { provider, config }
    }

    /// Create client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `AiError::MissingApiKey` if the configured API key environment
    /// variable is not set.
    pub fn from_config(config: AiConfig) -> Result<Self, AiError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AiError::MissingApiKey(config.api_key_env.clone()))?;

        let provider: Arc<dyn AiProvider> = match config.provider {
            ProviderKind::Gemini => Arc::new(GeminiProvider::new(
                config.base_url.clone(),
                api_key,
                config.model.clone(),
                config.max_tokens,
            )),
            ProviderKind::Claude => Arc::new(ClaudeProvider::new(
                config.base_url.clone(),
                api_key,
                config.model.clone(),
                config.max_tokens,
            )),
        };

        Ok(Self { provider, config })
    }

    /// Get the configured model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Get the provider kind.
    #[must_use]
    pub fn provider_kind(&self) -> &ProviderKind {
        &self.config.provider
    }

    /// Summarize study material as bullet points.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider request fails.
    pub async fn summarize(&self, text: &str) -> Result<String, AiError> {
        tracing::debug!(chars = text.len(), "Requesting summary");
        self.provider
            .generate(prompts::SUMMARIZE_SYSTEM_PROMPT, &prompts::format_summarize(text))
            .await
    }

    /// Ask for `count` flashcards. The model's text is returned as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider request fails.
    pub async fn generate_flashcards(&self, text: &str, count: u32) -> Result<String, AiError> {
        tracing::debug!(count, "Requesting flashcards");
        self.provider
            .generate(
                prompts::FLASHCARD_SYSTEM_PROMPT,
                &prompts::format_flashcards(text, count),
            )
            .await
    }

    /// Ask for `count` multiple choice questions on a topic.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider request fails.
    pub async fn generate_quiz(
        &self,
        topic: &str,
        difficulty: &str,
        count: u32,
    ) -> Result<String, AiError> {
        tracing::debug!(topic, difficulty, count, "Requesting quiz");
        self.provider
            .generate(
                &prompts::quiz_system_prompt(difficulty),
                &prompts::format_quiz(topic, difficulty, count),
            )
            .await
    }

    /// Answer a student question with the session's earlier exchanges as context.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider request fails.
    pub async fn tutor_chat(
        &self,
        question: &str,
        history: &[ChatMessage],
    ) -> Result<String, AiError> {
        tracing::debug!(history = history.len(), "Requesting tutor answer");
        self.provider
            .generate(&prompts::tutor_system_prompt(history), question)
            .await
    }

    /// Answer `query` about an uploaded document.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the file type or the request fails.
    pub async fn analyze_document(
        &self,
        attachment: &Attachment,
        query: &str,
    ) -> Result<String, AiError> {
        tracing::debug!(
            filename = %attachment.filename,
            mime_type = %attachment.mime_type,
            bytes = attachment.data.len(),
            "Requesting document analysis"
        );
        self.provider
            .generate_with_attachment(prompts::DOCUMENT_SYSTEM_PROMPT, query, attachment)
            .await
    }

    /// Draft a day-by-day study plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider request fails.
    pub async fn suggest_study_plan(
        &self,
        topics: &[String],
        exam_date: &str,
        hours_per_day: u32,
    ) -> Result<String, AiError> {
        self.provider
            .generate(
                prompts::STUDY_PLAN_SYSTEM_PROMPT,
                &prompts::format_study_plan(topics, exam_date, hours_per_day),
            )
            .await
    }

    /// Generate exam practice questions with solutions.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider request fails.
    pub async fn generate_exam_questions(
        &self,
        topics: &[String],
        question_count: u32,
    ) -> Result<String, AiError> {
        self.provider
            .generate(
                prompts::EXAM_SYSTEM_PROMPT,
                &prompts::format_exam_questions(topics, question_count),
            )
            .await
    }
}
