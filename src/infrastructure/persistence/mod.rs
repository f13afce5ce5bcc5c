//! Persistence Layer - 数据持久化
//!
//! 主题工作目录下的文件缓存，以及缓存和音频共用的原子写入

mod file_content_cache;

pub use file_content_cache::FileContentCache;

use std::path::Path;
use tokio::fs;
use uuid::Uuid;

/// 原子写入
///
/// 先写同目录下的临时文件再重命名，目标文件要么不存在，要么内容完整
pub(crate) async fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let temp_path = dir.join(format!(".{}.tmp", Uuid::new_v4()));

    if let Err(e) = fs::write(&temp_path, data).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(e);
    }
    if let Err(e) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(e);
    }
    Ok(())
}
