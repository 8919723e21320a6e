//! OpenAI chat-completions backend

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Settings;

use super::{Completion, CompletionBackend, CompletionError};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: u32,
}

/// One chat-completions request per call; retries live in
/// [`ResilientCompletionClient`](super::ResilientCompletionClient)
#[derive(Clone)]
pub struct OpenAIBackend {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl std::fmt::Debug for OpenAIBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIBackend")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

impl OpenAIBackend {
    /// Build a backend with its own pooled HTTP client
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
        pool_max_idle_per_host: usize,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(pool_max_idle_per_host)
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            max_tokens: 2000,
            temperature: 0.7,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            settings.openai_api_key.clone(),
            settings.openai_model.clone(),
            settings.request_timeout(),
            settings.http_pool_max_idle_per_host,
        )?
        .with_base_url(&settings.openai_base_url)
        .with_max_tokens(settings.openai_max_tokens)
        .with_temperature(settings.openai_temperature))
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl CompletionBackend for OpenAIBackend {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<Completion, CompletionError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                Message {
                    role: "system",
                    content: system_prompt,
                },
                Message {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let body: ChatResponse = response.json().await.map_err(classify_transport_error)?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::Unexpected("response contained no choices".into()))?;

        Ok(Completion {
            text: choice.message.content.unwrap_or_default(),
            tokens_used: body.usage.map(|u| u.total_tokens).unwrap_or(0),
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn classify_status(status: StatusCode, body: &str) -> CompletionError {
    let message = truncate(body, MAX_ERROR_BODY);
    if status == StatusCode::TOO_MANY_REQUESTS {
        CompletionError::RateLimited(message)
    } else {
        CompletionError::Service {
            status: Some(status.as_u16()),
            message,
        }
    }
}

fn classify_transport_error(err: reqwest::Error) -> CompletionError {
    if err.is_timeout() {
        CompletionError::Timeout(err.to_string())
    } else if err.is_builder() {
        CompletionError::Unexpected(err.to_string())
    } else {
        CompletionError::Service {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
