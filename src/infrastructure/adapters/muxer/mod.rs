//! Muxer Adapter - 音频拼接实现

mod concat_muxer;
mod ffmpeg_muxer;

pub use concat_muxer::{parse_manifest, ConcatMuxer};
pub use ffmpeg_muxer::FfmpegMuxer;
