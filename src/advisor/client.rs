use std::time::Duration;

use anyhow::Context;
use axum::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AiConfig;

const API_VERSION: &str = "2024-12-01-preview";

/// A text-completion backend that answers a single prompt.
#[async_trait]
pub trait Advisor: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str, max_tokens: u32)
        -> anyhow::Result<String>;
}

/// Azure-style chat-completions deployment.
#[derive(Clone)]
pub struct ChatCompletionsAdvisor {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatCompletionsAdvisor {
    pub fn new(cfg: &AiConfig) -> anyhow::Result<Self> {
        let endpoint = cfg.endpoint.as_deref().context("AI_ENDPOINT is not set")?;
        let api_key = cfg.api_key.clone().context("AI_API_KEY is not set")?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("build http client")?;
        Ok(Self {
            http,
            url: format!(
                "{}/openai/deployments/{}/chat/completions?api-version={API_VERSION}",
                endpoint.trim_end_matches('/'),
                cfg.deployment
            ),
            api_key,
        })
    }
}

#[async_trait]
impl Advisor for ChatCompletionsAdvisor {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        max_tokens: u32,
    ) -> anyhow::Result<String> {
        let body = ChatRequest {
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.4,
            max_tokens,
        };
        let res: ChatResponse = self
            .http
            .post(&self.url)
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("send chat completion")?
            .error_for_status()
            .context("chat completion status")?
            .json()
            .await
            .context("decode chat completion")?;

        let answer = res
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        debug!(answer = %answer, "model answered");
        Ok(answer.trim().to_string())
    }
}
