//! Speech Synthesis Port - 语音合成抽象
//!
//! 定义语音合成的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

/// 单次合成请求允许的最大字符数
pub const SYNTHESIS_CEILING: usize = 4096;

/// 语音合成错误
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Input of {length} characters exceeds the synthesis ceiling of {ceiling}")]
    InputTooLong { length: usize, ceiling: usize },
}

/// Speech Synthesis Port
///
/// 外部语音合成服务的抽象接口。调用方保证 `text` 不超过 [`SYNTHESIS_CEILING`]。
#[async_trait]
pub trait SpeechSynthesisPort: Send + Sync {
    /// 合成音频，返回编码后的音频字节
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, SpeechError>;

    /// 模型标识（用于日志）
    fn model_id(&self) -> &str;
}
