use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::GenerationError;

pub const SYSTEM_PROMPT: &str =
    "You are an expert educational AI assistant helping students learn from video content.";

/// Text produced by one completion call
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub text: String,
    pub tokens_used: Option<u32>,
}

/// One chat-completion round trip per call; no retries
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, max_tokens: u32, temperature: f32) -> Result<Generation, GenerationError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

/// OpenAI-compatible chat completions client
pub struct OpenAiClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_base: &str, api_key: &str, model: &str, timeout: Duration) -> eyre::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(&self, prompt: &str, max_tokens: u32, temperature: f32) -> Result<Generation, GenerationError> {
        debug!(
            "Requesting completion from {} (max_tokens={max_tokens}, temperature={temperature})",
            self.model
        );

        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens,
            temperature,
        };

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Provider(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| GenerationError::Provider(e.to_string()))?;
        let generation = parse_completion(&bytes)?;
        debug!("Completion used {:?} tokens", generation.tokens_used);
        Ok(generation)
    }
}

fn classify_failure(status: StatusCode, body: &str) -> GenerationError {
    match status {
        StatusCode::UNAUTHORIZED => GenerationError::Auth,
        StatusCode::TOO_MANY_REQUESTS => GenerationError::RateLimited,
        _ => {
            let message = serde_json::from_str::<serde_json::Value>(body)
                .ok()
                .and_then(|json| {
                    json.get("error")
                        .and_then(|e| e.get("message"))
                        .and_then(|m| m.as_str())
                        .map(str::to_string)
                })
                .unwrap_or_else(|| body.trim().to_string());
            GenerationError::Provider(format!("{status}: {message}"))
        }
    }
}

fn parse_completion(body: &[u8]) -> Result<Generation, GenerationError> {
    let resp: ChatResponse =
        serde_json::from_slice(body).map_err(|e| GenerationError::Unknown(format!("malformed completion: {e}")))?;

    let text = resp
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| GenerationError::Unknown("completion contained no message".to_string()))?;

    Ok(Generation {
        text: text.trim().to_string(),
        tokens_used: resp.usage.map(|u| u.total_tokens),
    })
}
