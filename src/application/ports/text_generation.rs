//! Text Generation Port - 文本生成抽象
//!
//! 支持多轮对话：多轮生成策略会带着不断增长的消息历史多次调用

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 文本生成错误
///
/// 本层不做重试，重试策略全部在应用层
#[derive(Debug, Error)]
pub enum TextGenerationError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// 对话消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Text Generation Port
#[async_trait]
pub trait TextGenerationPort: Send + Sync {
    /// 根据消息历史生成下一条回复
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, TextGenerationError>;

    /// 模型标识（参与缓存 key）
    fn model_id(&self) -> &str;
}
