use crate::generator::base::{GenerateRequest, GeneratedExchange, ResponseGenerator, UserTurn};
use crate::generator::prompt;
use crate::thread::{Role, ThreadMessage};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// OpenAI-compatible chat-completions generator.
///
/// `api_base` is configurable so self-hosted gateways (and tests) can point
/// it elsewhere.
pub struct OpenAiGenerator {
    api_base: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    client: Client,
}

impl OpenAiGenerator {
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens,
            temperature,
            client: Client::builder()
                .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    fn thread_message_to_value(msg: &ThreadMessage) -> Value {
        let role = match msg.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        if msg.images.is_empty() {
            json!({ "role": role, "content": msg.content })
        } else {
            json!({ "role": role, "content": content_with_images(&msg.content, &msg.images) })
        }
    }
}

fn content_with_images(text: &str, images: &[String]) -> Value {
    let mut parts = vec![json!({ "type": "text", "text": text })];
    for image in images {
        parts.push(json!({
            "type": "image_url",
            "image_url": { "url": format!("data:image/jpeg;base64,{image}") }
        }));
    }
    Value::Array(parts)
}

#[async_trait]
impl ResponseGenerator for OpenAiGenerator {
    async fn respond(&self, req: GenerateRequest) -> Result<GeneratedExchange> {
        let user_content = prompt::build_user_content(&req.message, &req.sender_name);

        let mut messages = vec![json!({ "role": "system", "content": prompt::system_prompt() })];
        messages.extend(req.history.iter().map(Self::thread_message_to_value));
        if req.images.is_empty() {
            messages.push(json!({ "role": "user", "content": user_content }));
        } else {
            messages.push(json!({
                "role": "user",
                "content": content_with_images(&user_content, &req.images)
            }));
        }

        let payload = json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .context("Failed to send request to chat-completions API")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("chat-completions API returned {status}: {body}");
        }

        let body: Value = resp
            .json()
            .await
            .context("Failed to parse chat-completions response")?;
        let response = body["choices"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|choice| choice["message"]["content"].as_str())
            .context("No message content in chat-completions response")?
            .to_string();

        Ok(GeneratedExchange {
            response,
            user_turn: UserTurn {
                content: user_content,
                images: req.images,
            },
        })
    }
}
