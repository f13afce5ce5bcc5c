//! Audio Storage Port - 出站端口
//!
//! 合成音频片段、拼接清单与输出目录的文件系统抽象。
//! 音频文件是否存在即为合成任务是否完成的标记。

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// 音频存储错误
#[derive(Debug, Error)]
pub enum AudioStorageError {
    #[error("IO error at {path}: {message}")]
    IoError { path: String, message: String },
}

impl AudioStorageError {
    pub fn io(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::IoError {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
pub trait AudioStoragePort: Send + Sync {
    /// 文件是否存在
    async fn exists(&self, path: &Path) -> Result<bool, AudioStorageError>;

    /// 是否为已存在的目录
    async fn is_dir(&self, path: &Path) -> bool;

    /// 创建目录（含父目录）
    async fn create_dir_all(&self, path: &Path) -> Result<(), AudioStorageError>;

    /// 原子写入：先写临时文件再重命名，中断时不会留下看似完整的文件
    async fn save(&self, path: &Path, data: &[u8]) -> Result<(), AudioStorageError>;
}
