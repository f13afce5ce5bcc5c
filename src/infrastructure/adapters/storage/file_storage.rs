//! File Storage - 文件系统音频存储实现
//!
//! 实现 AudioStoragePort trait

use async_trait::async_trait;
use std::path::Path;
use tokio::fs;

use crate::application::ports::{AudioStorageError, AudioStoragePort};
use crate::infrastructure::persistence::write_atomic;

/// 文件系统音频存储
///
/// 路径由调用方决定，本身不持有根目录
#[derive(Debug, Default, Clone, Copy)]
pub struct FileAudioStorage;

impl FileAudioStorage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AudioStoragePort for FileAudioStorage {
    async fn exists(&self, path: &Path) -> Result<bool, AudioStorageError> {
        fs::try_exists(path)
            .await
            .map_err(|e| AudioStorageError::io(path, e))
    }

    async fn is_dir(&self, path: &Path) -> bool {
        fs::metadata(path)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }

    async fn create_dir_all(&self, path: &Path) -> Result<(), AudioStorageError> {
        fs::create_dir_all(path)
            .await
            .map_err(|e| AudioStorageError::io(path, e))
    }

    async fn save(&self, path: &Path, data: &[u8]) -> Result<(), AudioStorageError> {
        write_atomic(path, data)
            .await
            .map_err(|e| AudioStorageError::io(path, e))?;

        tracing::debug!(path = %path.display(), size = data.len(), "Saved audio");
        Ok(())
    }
}
