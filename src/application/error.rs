//! 应用层错误定义
//!
//! 统一的流水线错误分类

use thiserror::Error;

use crate::application::ports::{
    AudioStorageError, CacheError, MuxerError, SpeechError, TextGenerationError,
};
use crate::domain::{FileNameError, SegmentError, TopicError};

/// 流水线错误
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 输入无效（主题、参数），不重试
    #[error("Input error: {0}")]
    Input(String),

    /// 配置错误（缺少凭据、音色无法解析）
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// 服务明确拒绝该主题
    #[error("Content rejected: {0}")]
    ContentRejection(String),

    /// 生成内容结构不合法
    #[error("Malformed content: {0}")]
    ContentStructure(String),

    /// 外部工具或服务调用失败
    #[error("External tool error: {0}")]
    ExternalTool(String),

    /// 缓存或音频文件读写失败
    #[error("Storage error: {0}")]
    Storage(String),

    /// 调用方应保证的前置条件被违反
    #[error("Invariant violated: {0}")]
    Invariant(String),
}

impl PipelineError {
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn structure(message: impl Into<String>) -> Self {
        Self::ContentStructure(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// 错误种类名称（用于日志）
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Input(_) => "input",
            Self::Configuration(_) => "configuration",
            Self::ContentRejection(_) => "content_rejection",
            Self::ContentStructure(_) => "content_structure",
            Self::ExternalTool(_) => "external_tool",
            Self::Storage(_) => "storage",
            Self::Invariant(_) => "invariant",
        }
    }

    /// 每类错误对应不同的进程退出码
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Input(_) => 2,
            Self::Configuration(_) => 3,
            Self::ContentRejection(_) => 4,
            Self::ContentStructure(_) => 5,
            Self::ExternalTool(_) => 6,
            Self::Storage(_) => 7,
            Self::Invariant(_) => 70,
        }
    }
}

impl From<TopicError> for PipelineError {
    fn from(err: TopicError) -> Self {
        Self::Input(err.to_string())
    }
}

impl From<SegmentError> for PipelineError {
    fn from(err: SegmentError) -> Self {
        Self::Invariant(err.to_string())
    }
}

impl From<FileNameError> for PipelineError {
    fn from(err: FileNameError) -> Self {
        Self::Invariant(err.to_string())
    }
}

impl From<CacheError> for PipelineError {
    fn from(err: CacheError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<AudioStorageError> for PipelineError {
    fn from(err: AudioStorageError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<TextGenerationError> for PipelineError {
    fn from(err: TextGenerationError) -> Self {
        Self::ExternalTool(format!("text generation failed: {}", err))
    }
}

impl From<SpeechError> for PipelineError {
    fn from(err: SpeechError) -> Self {
        Self::ExternalTool(format!("speech synthesis failed: {}", err))
    }
}

impl From<MuxerError> for PipelineError {
    fn from(err: MuxerError) -> Self {
        Self::ExternalTool(format!("audio muxing failed: {}", err))
    }
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Invariant(format!("worker task failed: {}", err))
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            PipelineError::input("a"),
            PipelineError::configuration("b"),
            PipelineError::ContentRejection("c".into()),
            PipelineError::structure("d"),
            PipelineError::ExternalTool("e".into()),
            PipelineError::storage("f"),
            PipelineError::Invariant("g".into()),
        ];
        let mut codes: Vec<u8> = errors.iter().map(|e| e.exit_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(codes.iter().all(|c| *c != 0));
    }

    #[test]
    fn test_topic_error_is_input_error() {
        let err: PipelineError = TopicError::TooShort.into();
        assert_eq!(err.kind(), "input");
        assert_eq!(err.to_string(), "Input error: Topic must be at least two characters long.");
    }
}
