use crate::error::GenerationError;
use crate::types::*;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-1106";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    /// Whole-exchange limit; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl LlmConfig {
    /// Defaults overridden by `TRIPWEAVE_*` environment variables.
    /// The key falls back to `OPENAI_API_KEY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        config.api_key = get("TRIPWEAVE_API_KEY").or_else(|| get("OPENAI_API_KEY"));
        if let Some(url) = get("TRIPWEAVE_BASE_URL") {
            config.base_url = url;
        }
        if let Some(model) = get("TRIPWEAVE_MODEL") {
            config.model = model;
        }
        if let Some(secs) = get("TRIPWEAVE_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(0) => config.timeout = None,
                Ok(n) => config.timeout = Some(Duration::from_secs(n)),
                Err(_) => warn!("Ignoring unparseable TRIPWEAVE_TIMEOUT_SECS '{}'", secs),
            }
        }
        config
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

/// Sampling configuration for one generation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
}

impl GenerationOptions {
    pub fn advice() -> Self {
        Self {
            temperature: 0.8,
            max_output_tokens: 1000,
            presence_penalty: 0.4,
            frequency_penalty: 0.4,
        }
    }

    pub fn search() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 500,
            presence_penalty: 0.3,
            frequency_penalty: 0.3,
        }
    }

    /// Clamp into the ranges the backend accepts.
    pub fn normalized(self) -> Self {
        let clamped = Self {
            temperature: clamp_or_zero(self.temperature, 0.0, 2.0),
            max_output_tokens: self.max_output_tokens.max(1),
            presence_penalty: clamp_or_zero(self.presence_penalty, -2.0, 2.0),
            frequency_penalty: clamp_or_zero(self.frequency_penalty, -2.0, 2.0),
        };
        if clamped != self {
            warn!("Generation options clamped from {:?} to {:?}", self, clamped);
        }
        clamped
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::advice()
    }
}

fn clamp_or_zero(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() { 0.0 } else { value.clamp(min, max) }
}

/// Anything that can answer a chat-completion request.
#[allow(async_fn_in_trait)]
pub trait ChatBackend {
    fn model_name(&self) -> &str;

    async fn chat(
        &self,
        messages: Vec<Message>,
        options: &GenerationOptions,
    ) -> Result<ChatResponse, GenerationError>;
}

pub struct LlmClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Self {
        Self::with_http(config, reqwest::Client::new())
    }

    pub fn with_http(config: LlmConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    async fn exchange(
        &self,
        url: &str,
        api_key: &str,
        request: &ChatRequest,
    ) -> Result<ChatResponse, GenerationError> {
        let response = self
            .http
            .post(url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::BackendRejected {
                status: Some(status.as_u16()),
                detail: rejection_detail(status.as_u16(), &body),
            });
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| GenerationError::BackendRejected {
                status: Some(status.as_u16()),
                detail: format!("unreadable response body: {}", e),
            })
    }
}

impl ChatBackend for LlmClient {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn chat(
        &self,
        messages: Vec<Message>,
        options: &GenerationOptions,
    ) -> Result<ChatResponse, GenerationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(GenerationError::NoCredentials)?;

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let options = options.normalized();
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages,
            temperature: Some(options.temperature),
            max_tokens: Some(options.max_output_tokens),
            presence_penalty: Some(options.presence_penalty),
            frequency_penalty: Some(options.frequency_penalty),
        };

        debug!("LLM request to {}: {} messages", url, request.messages.len());

        let exchange = self.exchange(&url, api_key, &request);
        let chat_response = match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .unwrap_or(Err(GenerationError::Timeout(limit))),
            None => exchange.await,
        }?;

        info!(
            "LLM response: finish_reason={:?}, usage={:?}",
            chat_response
                .choices
                .first()
                .and_then(|c| c.finish_reason.as_ref()),
            chat_response.usage.as_ref().map(|u| u.total_tokens)
        );

        Ok(chat_response)
    }
}

fn transport_error(e: reqwest::Error) -> GenerationError {
    GenerationError::BackendRejected {
        status: e.status().map(|s| s.as_u16()),
        detail: format!("request failed: {}", e),
    }
}

/// Prefer the backend's own `error.message`, then the raw body.
fn rejection_detail(status: u16, body: &str) -> String {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from));
    match message {
        Some(m) => format!("HTTP {}: {}", status, m),
        None if body.trim().is_empty() => format!("HTTP {}", status),
        None => format!("HTTP {}: {}", status, body.trim()),
    }
}

/// Send one instruction/data pair and return the raw reply text, unmodified.
pub async fn generate(
    backend: &impl ChatBackend,
    instruction: &str,
    data: &str,
    options: &GenerationOptions,
) -> Result<String, GenerationError> {
    let messages = vec![Message::system(instruction), Message::user(data)];
    let response = backend.chat(messages, options).await?;
    let text = response
        .first_text()
        .ok_or(GenerationError::EmptyResponse)?;
    debug!("{} raw output: {}", backend.model_name(), text);
    Ok(text.to_string())
}
