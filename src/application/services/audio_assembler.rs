//! Audio Assembler - 音频拼接
//!
//! 写出有序清单，交给外部拼接工具在不重新编码的情况下合成最终文件

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::error::PipelineError;
use crate::application::ports::{AudioMuxerPort, AudioStoragePort};

/// 清单文件名
pub const MANIFEST_FILE_NAME: &str = "concat.list";

/// 单引号转义：`'` 变为 `'\''`
pub fn escape_manifest_path(path: &Path) -> String {
    path.display().to_string().replace('\'', "'\\''")
}

/// 生成清单内容，每行一个 `file '<path>'`
pub fn render_manifest(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("file '{}'", escape_manifest_path(p)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 转为绝对路径
///
/// ffmpeg 相对清单所在目录解析相对路径，因此清单里只写绝对路径
fn absolute_path(path: &Path) -> Result<PathBuf, PipelineError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}

pub struct AudioAssembler {
    muxer: Arc<dyn AudioMuxerPort>,
    storage: Arc<dyn AudioStoragePort>,
}

impl AudioAssembler {
    pub fn new(muxer: Arc<dyn AudioMuxerPort>, storage: Arc<dyn AudioStoragePort>) -> Self {
        Self { muxer, storage }
    }

    /// 按顺序拼接音频文件到 `output_path`
    ///
    /// 拼接工具失败或输出文件不存在时返回 `ExternalTool` 错误，不重试
    pub async fn assemble(
        &self,
        ordered_paths: &[PathBuf],
        manifest_dir: &Path,
        output_path: &Path,
    ) -> Result<(), PipelineError> {
        if ordered_paths.is_empty() {
            return Err(PipelineError::Invariant(
                "no audio parts to assemble".to_string(),
            ));
        }

        let absolute_paths = ordered_paths
            .iter()
            .map(|path| absolute_path(path))
            .collect::<Result<Vec<_>, _>>()?;
        let manifest_path = manifest_dir.join(MANIFEST_FILE_NAME);
        self.storage
            .save(&manifest_path, render_manifest(&absolute_paths).as_bytes())
            .await?;

        tracing::info!(parts = ordered_paths.len(), output = %output_path.display(), "Merging speech parts");
        self.muxer.concat(&manifest_path, output_path).await?;

        if !self.storage.exists(output_path).await? {
            return Err(PipelineError::ExternalTool(format!(
                "muxer reported success but output file is missing: {}",
                output_path.display()
            )));
        }

        tracing::info!(parts = ordered_paths.len(), output = %output_path.display(), "Merged speech parts");
        Ok(())
    }
}
