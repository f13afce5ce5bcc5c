//! OpenAI Chat Client - 调用 OpenAI 兼容的对话补全接口
//!
//! 实现 TextGenerationPort trait
//!
//! 外部 API:
//! POST {base_url}/chat/completions
//! Request: {"model": "gpt-4o", "messages": [{"role": "user", "content": "..."}]}
//! Response: {"choices": [{"message": {"content": "..."}}]}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{ChatMessage, TextGenerationError, TextGenerationPort};

#[derive(Debug, Serialize)]
struct ChatHttpRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatHttpResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// 对话客户端配置
#[derive(Debug, Clone)]
pub struct OpenAiChatConfig {
    /// 服务基础 URL（含 `/v1`）
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// 请求超时时间（秒），0 表示不限制
    pub timeout_secs: u64,
}

impl Default for OpenAiChatConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o".to_string(),
            timeout_secs: 0,
        }
    }
}

/// OpenAI 对话客户端
pub struct OpenAiChatClient {
    client: Client,
    config: OpenAiChatConfig,
}

impl OpenAiChatClient {
    pub fn new(config: OpenAiChatConfig) -> Result<Self, TextGenerationError> {
        let mut builder = Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| TextGenerationError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

/// 取出第一个候选回复的正文
fn first_choice_content(body: ChatHttpResponse) -> Result<String, TextGenerationError> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| TextGenerationError::InvalidResponse("response has no content".to_string()))
}

#[async_trait]
impl TextGenerationPort for OpenAiChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, TextGenerationError> {
        let request = ChatHttpRequest {
            model: &self.config.model,
            messages,
        };

        tracing::debug!(
            url = %self.completions_url(),
            model = %self.config.model,
            messages = messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TextGenerationError::Timeout
                } else if e.is_connect() {
                    TextGenerationError::NetworkError(format!(
                        "Cannot connect to text generation service: {}",
                        e
                    ))
                } else {
                    TextGenerationError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TextGenerationError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: ChatHttpResponse = response
            .json()
            .await
            .map_err(|e| TextGenerationError::InvalidResponse(e.to_string()))?;
        let content = first_choice_content(body)?;

        tracing::debug!(response_len = content.len(), "Chat completion received");
        Ok(content)
    }

    fn model_id(&self) -> &str {
        &self.config.model
    }
}
