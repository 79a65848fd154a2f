//! Gemini Provider - Implementation of AIProvider for Google's Gemini API.
//!
//! Uses the `generateContent` endpoint for single-shot completions.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(api_key)
//!     .with_model("gemini-2.5-flash")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let provider = GeminiProvider::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, MessageRole,
    ProviderInfo, TokenUsage,
};

/// Default retry delay when a 429 carries no `RetryInfo`.
const DEFAULT_RETRY_AFTER_SECS: u32 = 60;

/// Configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gemini-2.5-flash").
    pub model: String,
    /// Base URL for the API (default: https://generativelanguage.googleapis.com).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Gemini API provider implementation.
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the generateContent endpoint URL.
    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Converts our request to Gemini's format.
    fn to_gemini_request(request: &CompletionRequest) -> GeminiRequest {
        let contents = request
            .messages
            .iter()
            .map(|msg| GeminiContent {
                role: Some(
                    match msg.role {
                        MessageRole::User => "user",
                        MessageRole::Assistant => "model",
                    }
                    .to_string(),
                ),
                parts: vec![GeminiPart {
                    text: Some(msg.content.clone()),
                }],
            })
            .collect();

        let system_instruction = request.system_prompt.as_ref().map(|prompt| GeminiContent {
            role: None,
            parts: vec![GeminiPart {
                text: Some(prompt.clone()),
            }],
        });

        GeminiRequest {
            contents,
            system_instruction,
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                response_mime_type: request
                    .json_output
                    .then(|| "application/json".to_string()),
            },
        }
    }

    /// Sends a request and maps transport failures.
    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        let gemini_request = Self::to_gemini_request(request);

        self.client
            .post(self.generate_url())
            .header("x-goog-api-key", self.config.api_key())
            .header("Content-Type", "application/json")
            .json(&gemini_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, AIError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        let error = serde_json::from_str::<GeminiErrorEnvelope>(&error_body)
            .map(|envelope| envelope.error)
            .ok();
        let message = error
            .as_ref()
            .and_then(|e| e.message.clone())
            .unwrap_or_else(|| error_body.clone());

        match status.as_u16() {
            401 | 403 => Err(AIError::AuthenticationFailed),
            429 => {
                let retry_after = error
                    .as_ref()
                    .and_then(Self::parse_retry_after)
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                Err(AIError::rate_limited(retry_after))
            }
            400 => {
                if message.contains("API key not valid") || message.contains("API_KEY_INVALID") {
                    Err(AIError::AuthenticationFailed)
                } else {
                    Err(AIError::InvalidRequest(message))
                }
            }
            500..=599 => Err(AIError::unavailable(format!(
                "Server error {}: {}",
                status, message
            ))),
            _ => Err(AIError::network(format!(
                "Unexpected status {}: {}",
                status, message
            ))),
        }
    }

    /// Extracts the retry delay from a `google.rpc.RetryInfo` detail ("37s", "1.5s").
    fn parse_retry_after(error: &GeminiError) -> Option<u32> {
        error
            .details
            .iter()
            .filter(|d| d.type_url.as_deref().is_some_and(|t| t.ends_with("RetryInfo")))
            .find_map(|d| d.retry_delay.as_deref())
            .and_then(|delay| delay.trim().strip_suffix('s'))
            .and_then(|secs| secs.parse::<f64>().ok())
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(|secs| secs.ceil() as u32)
    }

    /// Parses a successful response body.
    async fn parse_response(&self, response: Response) -> Result<CompletionResponse, AIError> {
        let response = self.handle_response_status(response).await?;

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        self.into_completion(gemini_response)
    }

    fn into_completion(&self, response: GeminiResponse) -> Result<CompletionResponse, AIError> {
        if let Some(reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone())
        {
            return Err(AIError::content_filtered(reason));
        }

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AIError::parse("Response contained no candidates"))?;

        let content = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let finish_reason = match candidate.finish_reason.as_deref() {
            Some("STOP") | None => FinishReason::Stop,
            Some("MAX_TOKENS") => FinishReason::Length,
            Some("SAFETY") | Some("BLOCKLIST") | Some("PROHIBITED_CONTENT") => {
                FinishReason::ContentFilter
            }
            Some(_) => FinishReason::Other,
        };

        if content.trim().is_empty() {
            return Err(match finish_reason {
                FinishReason::ContentFilter => AIError::content_filtered(
                    candidate.finish_reason.unwrap_or_else(|| "SAFETY".to_string()),
                ),
                _ => AIError::parse("Response contained no text"),
            });
        }

        let usage = response
            .usage_metadata
            .map(|u| TokenUsage::new(u.prompt_token_count, u.candidates_token_count))
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            usage,
            model: response
                .model_version
                .unwrap_or_else(|| self.config.model.clone()),
            finish_reason,
        })
    }
}

#[async_trait]
impl AIProvider for GeminiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let response = self.send_request(&request).await?;
        self.parse_response(response).await
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("gemini", &self.config.model)
    }
}

// ----- Gemini API Types -----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiError,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: Option<String>,
    #[serde(default)]
    details: Vec<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiErrorDetail {
    #[serde(rename = "@type")]
    type_url: Option<String>,
    retry_delay: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::RequestMetadata;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn provider_for(server: &MockServer) -> GeminiProvider {
        let config = GeminiConfig::new("test-key")
            .with_base_url(server.uri())
            .with_timeout(Duration::from_millis(500));
        GeminiProvider::new(config).unwrap()
    }

    fn json_request(prompt: &str) -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new("trace-1"))
            .with_message(MessageRole::User, prompt)
            .with_system_prompt("Be concise")
            .with_max_tokens(256)
            .with_temperature(0.2)
            .with_json_output()
    }

    fn text_response(text: &str) -> serde_json::Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 8, "totalTokenCount": 20 },
            "modelVersion": "gemini-2.5-flash"
        })
    }

    async fn error_for(status: u16, body: serde_json::Value) -> AIError {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;

        provider_for(&server)
            .complete(json_request("hello"))
            .await
            .unwrap_err()
    }

    #[test]
    fn config_builder_works() {
        let config = GeminiConfig::new("test-key")
            .with_model("gemini-2.5-pro")
            .with_base_url("https://proxy.example.com")
            .with_timeout(Duration::from_secs(10));

        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.base_url, "https://proxy.example.com");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn debug_output_does_not_leak_api_key() {
        let config = GeminiConfig::new("super-secret-key");
        assert!(!format!("{:?}", config).contains("super-secret-key"));
    }

    #[test]
    fn provider_info_reports_model() {
        let provider = GeminiProvider::new(GeminiConfig::new("k")).unwrap();
        let info = provider.provider_info();
        assert_eq!(info.name, "gemini");
        assert_eq!(info.model, "gemini-2.5-flash");
    }

    #[test]
    fn request_maps_roles_and_json_mode() {
        let request = CompletionRequest::new(RequestMetadata::new("t"))
            .with_message(MessageRole::User, "hi")
            .with_message(MessageRole::Assistant, "hello")
            .with_json_output();
        let body = serde_json::to_value(GeminiProvider::to_gemini_request(&request)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn parse_retry_after_reads_retry_info() {
        let error: GeminiError = serde_json::from_value(json!({
            "message": "Quota exceeded",
            "details": [
                { "@type": "type.googleapis.com/google.rpc.QuotaFailure" },
                { "@type": "type.googleapis.com/google.rpc.RetryInfo", "retryDelay": "37.2s" }
            ]
        }))
        .unwrap();
        assert_eq!(GeminiProvider::parse_retry_after(&error), Some(38));
    }

    #[tokio::test]
    async fn complete_returns_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }],
                "systemInstruction": { "parts": [{ "text": "Be concise" }] },
                "generationConfig": { "maxOutputTokens": 256, "responseMimeType": "application/json" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response("{\"ok\":true}")))
            .expect(1)
            .mount(&server)
            .await;

        let response = provider_for(&server)
            .complete(json_request("hello"))
            .await
            .unwrap();

        assert_eq!(response.content, "{\"ok\":true}");
        assert_eq!(response.usage.total_tokens, 20);
        assert_eq!(response.model, "gemini-2.5-flash");
        assert_eq!(response.finish_reason, FinishReason::Stop);
    }

    #[tokio::test]
    async fn multi_part_text_is_concatenated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] },
                    "finishReason": "MAX_TOKENS"
                }]
            })))
            .mount(&server)
            .await;

        let response = provider_for(&server)
            .complete(json_request("hello"))
            .await
            .unwrap();
        assert_eq!(response.content, "{\"a\":1}");
        assert_eq!(response.finish_reason, FinishReason::Length);
        assert_eq!(response.usage, TokenUsage::default());
    }

    #[tokio::test]
    async fn status_429_maps_to_rate_limited() {
        let err = error_for(
            429,
            json!({ "error": {
                "code": 429,
                "message": "Resource has been exhausted",
                "status": "RESOURCE_EXHAUSTED",
                "details": [{ "@type": "type.googleapis.com/google.rpc.RetryInfo", "retryDelay": "12s" }]
            }}),
        )
        .await;
        assert!(matches!(err, AIError::RateLimited { retry_after_secs: 12 }));
    }

    #[tokio::test]
    async fn status_429_without_retry_info_uses_default() {
        let err = error_for(429, json!({ "error": { "message": "slow down" } })).await;
        assert!(matches!(
            err,
            AIError::RateLimited { retry_after_secs: DEFAULT_RETRY_AFTER_SECS }
        ));
    }

    #[tokio::test]
    async fn invalid_api_key_maps_to_authentication_failed() {
        let err = error_for(
            400,
            json!({ "error": { "code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT" } }),
        )
        .await;
        assert!(matches!(err, AIError::AuthenticationFailed));

        let err = error_for(403, json!({ "error": { "message": "Permission denied" } })).await;
        assert!(matches!(err, AIError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn other_400_maps_to_invalid_request() {
        let err = error_for(
            400,
            json!({ "error": { "message": "Invalid JSON payload received." } }),
        )
        .await;
        match err {
            AIError::InvalidRequest(message) => assert!(message.contains("Invalid JSON payload")),
            other => panic!("expected InvalidRequest, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn server_errors_map_to_unavailable() {
        let err = error_for(503, json!({ "error": { "message": "The model is overloaded." } })).await;
        assert!(matches!(err, AIError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn blocked_prompt_maps_to_content_filtered() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "promptFeedback": { "blockReason": "SAFETY" } })),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .complete(json_request("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, AIError::ContentFiltered { .. }));
    }

    #[tokio::test]
    async fn safety_stop_without_text_maps_to_content_filtered() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "finishReason": "SAFETY" }]
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .complete(json_request("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, AIError::ContentFiltered { .. }));
    }

    #[tokio::test]
    async fn empty_candidates_map_to_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .complete(json_request("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, AIError::Parse(_)));
    }

    #[tokio::test]
    async fn slow_upstream_maps_to_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(text_response("{}"))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .complete(json_request("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, AIError::Timeout { .. }));
    }
}
