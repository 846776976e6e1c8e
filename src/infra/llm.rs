use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::services::LanguageModelService;

const INITIAL_BACKOFF: Duration = Duration::from_millis(750);
const MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Chat Completions client for OpenAI and API-compatible servers.
pub struct OpenAiClient {
    http: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    timeout: Duration,
    max_retries: u32,
}

impl OpenAiClient {
    pub fn new(
        api_key: Option<String>,
        base_url: String,
        model: String,
        timeout: Duration,
        max_retries: u32,
    ) -> Self {
        Self {
            http: Client::new(),
            api_key,
            base_url,
            model,
            timeout,
            max_retries,
        }
    }

    fn api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::LanguageModel("OpenAI API key not configured".to_string()))
    }

    fn completions_endpoint(base_url: &str) -> String {
        format!("{}/chat/completions", base_url.trim_end_matches('/'))
    }

    async fn send_once(&self, api_key: &str, body: &ChatRequest<'_>) -> Result<String, Attempt> {
        let response = self
            .http
            .post(Self::completions_endpoint(&self.base_url))
            .timeout(self.timeout)
            .header(AUTHORIZATION, format!("Bearer {api_key}"))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| Attempt::Retry(format!("failed to call model: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            let message = format!("model responded with {status}: {body}");
            return Err(if is_retryable(status) {
                Attempt::Retry(message)
            } else {
                Attempt::Fatal(message)
            });
        }

        let payload: ChatResponse = response
            .json()
            .await
            .map_err(|err| Attempt::Fatal(format!("failed to parse model response: {err}")))?;

        extract_reply(payload).map_err(Attempt::Fatal)
    }
}

#[async_trait]
impl LanguageModelService for OpenAiClient {
    async fn complete(&self, system_prompt: &str, ticket_text: &str) -> AppResult<String> {
        let api_key = self.api_key()?;
        let body = ChatRequest::new(&self.model, system_prompt, ticket_text);

        let mut backoff = INITIAL_BACKOFF;
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.send_once(api_key, &body).await {
                Ok(reply) => {
                    debug!(attempt, bytes = reply.len(), "model reply received");
                    return Ok(reply);
                }
                Err(Attempt::Retry(message)) if attempt <= self.max_retries => {
                    warn!(attempt, "{message}; retrying in {backoff:?}");
                    tokio::time::sleep(backoff).await;
                    backoff = next_backoff(backoff);
                }
                Err(Attempt::Retry(message)) | Err(Attempt::Fatal(message)) => {
                    return Err(AppError::LanguageModel(message));
                }
            }
        }
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

enum Attempt {
    Retry(String),
    Fatal(String),
}

fn next_backoff(current: Duration) -> Duration {
    current.saturating_mul(2).min(MAX_BACKOFF)
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Empty content is a valid reply; a missing one is not.
fn extract_reply(payload: ChatResponse) -> Result<String, String> {
    payload
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or_else(|| "model response contained no choices".to_string())
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

impl<'a> ChatRequest<'a> {
    fn new(model: &'a str, system_prompt: &'a str, ticket_text: &'a str) -> Self {
        Self {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: ticket_text,
                },
            ],
        }
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Deserialize)]
struct ChatReplyMessage {
    content: Option<String>,
}
