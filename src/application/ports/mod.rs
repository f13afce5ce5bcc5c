//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_muxer;
mod audio_storage;
mod confirmer;
mod content_cache;
mod speech_synthesis;
mod text_generation;

pub use audio_muxer::{AudioMuxerPort, MuxerError};
pub use audio_storage::{AudioStorageError, AudioStoragePort};
pub use confirmer::{AlwaysConfirm, ConfirmerPort};
pub use content_cache::{generate_cache_key, CacheError, CacheKey, CacheStats, ContentCachePort};
pub use speech_synthesis::{SpeechError, SpeechSynthesisPort, SYNTHESIS_CEILING};
pub use text_generation::{ChatMessage, ChatRole, TextGenerationError, TextGenerationPort};
