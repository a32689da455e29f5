//! OpenAI-compatible chat completion provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::integrations::llm::LlmProvider;
use crate::models::ChatMessage;

const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<CompletionMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct CompletionMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
    error: Option<CompletionError>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionError {
    message: String,
}

#[derive(Debug, Clone)]
pub struct OpenAiChatProvider {
    api_key: String,
    base_url: String,
    model: String,
    client: Client,
}

impl OpenAiChatProvider {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout_seconds: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let base_url: String = base_url.into();
        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            client,
        })
    }

    fn build_request(&self, messages: Vec<ChatMessage>) -> ChatCompletionRequest<'_> {
        ChatCompletionRequest {
            model: &self.model,
            messages: messages
                .into_iter()
                .map(|msg| CompletionMessage {
                    role: msg.role.as_str().to_string(),
                    content: Some(msg.content),
                })
                .collect(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    fn parse_response(response: ChatCompletionResponse) -> Result<String> {
        if let Some(error) = response.error {
            return Err(AppError::LlmProvider(error.message));
        }
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::LlmProvider("No response choices returned".to_string()))?;

        let content = choice.message.content.unwrap_or_default();
        if content.trim().is_empty() {
            return Err(AppError::LlmProvider("Empty completion".to_string()));
        }
        Ok(content)
    }
}

#[async_trait]
impl LlmProvider for OpenAiChatProvider {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = self.build_request(messages);
        tracing::debug!(
            "Sending {} messages to {} ({})",
            request.messages.len(),
            url,
            self.model
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::LlmProvider("Request to language model timed out".to_string())
                } else {
                    AppError::LlmProvider(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        match status {
            StatusCode::OK => {
                let body = response
                    .json::<ChatCompletionResponse>()
                    .await
                    .map_err(|e| AppError::LlmProvider(format!("Failed to parse response: {}", e)))?;
                Self::parse_response(body)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let error_text = response.text().await.unwrap_or_default();
                Err(AppError::LlmProvider(format!(
                    "Authentication failed ({}): {}",
                    status, error_text
                )))
            }
            _ => {
                let error_text = response.text().await.unwrap_or_default();
                Err(AppError::LlmProvider(format!(
                    "Unexpected status ({}): {}",
                    status, error_text
                )))
            }
        }
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> OpenAiChatProvider {
        OpenAiChatProvider::new("key", "https://api.openai.com/v1/", "gpt-4o-mini", 5).unwrap()
    }

    #[test]
    fn build_request_keeps_roles_and_order() {
        let provider = provider();
        let request = provider.build_request(vec![
            ChatMessage::system("be brief"),
            ChatMessage::user("hi"),
        ]);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
    }

    #[test]
    fn parse_response_reads_first_choice() {
        let body: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "role": "assistant", "content": "Hello!" }, "finish_reason": "stop" }]
        }))
        .unwrap();
        assert_eq!(OpenAiChatProvider::parse_response(body).unwrap(), "Hello!");
    }

    #[test]
    fn parse_response_surfaces_api_error() {
        let body: ChatCompletionResponse = serde_json::from_value(json!({
            "error": { "message": "quota exceeded", "type": "insufficient_quota" }
        }))
        .unwrap();
        let err = OpenAiChatProvider::parse_response(body).unwrap_err();
        assert!(matches!(err, AppError::LlmProvider(msg) if msg == "quota exceeded"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        assert_eq!(provider().base_url, "https://api.openai.com/v1");
    }
}
