//! Audio Muxer Port - 音频拼接抽象
//!
//! 外部工具读取有序清单文件，不重新编码地拼接音频

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MuxerError {
    #[error("Failed to launch muxer `{program}`: {message}")]
    LaunchFailed { program: String, message: String },

    #[error("Muxer exited with status {status}: {stderr}")]
    NonZeroExit { status: String, stderr: String },

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Audio Muxer Port
///
/// 成功的约定：返回 Ok 且输出文件存在
#[async_trait]
pub trait AudioMuxerPort: Send + Sync {
    async fn concat(&self, manifest_path: &Path, output_path: &Path) -> Result<(), MuxerError>;
}
