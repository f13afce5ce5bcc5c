//! FFmpeg Muxer - 调用 ffmpeg concat demuxer 拼接音频
//!
//! 等价命令：`ffmpeg -y -f concat -safe 0 -i <manifest> -c copy -loglevel error <output>`

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::application::ports::{AudioMuxerPort, MuxerError};

pub struct FfmpegMuxer {
    program: String,
}

impl Default for FfmpegMuxer {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FfmpegMuxer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// 命令行参数（不含程序名）
    pub fn args(manifest_path: &Path, output_path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-y", "-f", "concat", "-safe", "0", "-i"]
            .iter()
            .map(OsString::from)
            .collect();
        args.push(manifest_path.as_os_str().to_os_string());
        args.extend(["-c", "copy", "-loglevel", "error"].iter().map(OsString::from));
        args.push(output_path.as_os_str().to_os_string());
        args
    }
}

#[async_trait]
impl AudioMuxerPort for FfmpegMuxer {
    async fn concat(&self, manifest_path: &Path, output_path: &Path) -> Result<(), MuxerError> {
        tracing::info!(
            program = %self.program,
            manifest = %manifest_path.display(),
            output = %output_path.display(),
            "Running muxer"
        );

        let output = Command::new(&self.program)
            .args(Self::args(manifest_path, output_path))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| MuxerError::LaunchFailed {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(MuxerError::NonZeroExit {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
