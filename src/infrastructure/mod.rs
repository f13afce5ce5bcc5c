//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod adapters;
pub mod persistence;

pub use adapters::{
    ConcatMuxer, FakeSpeechClient, FakeTextClient, FfmpegMuxer, FileAudioStorage,
    OpenAiChatClient, OpenAiSpeechClient, ScriptedTextClient, StdinConfirmer,
};
pub use persistence::FileContentCache;
