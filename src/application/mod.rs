//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（TextGeneration、SpeechSynthesis、ContentCache、AudioMuxer 等）
//! - services: 流水线各阶段服务及编排
//! - scheduler: 有界并发调度
//! - prompts: 提示词模板与约定字面量
//! - error: 应用层错误定义

pub mod error;
pub mod ports;
pub mod prompts;
pub mod scheduler;
pub mod services;

pub use error::PipelineError;
pub use scheduler::{TaskScheduler, DEFAULT_MAX_WORKERS};
pub use services::{
    describe_episode, DescriptionFormat, GenerationStrategy, Pipeline, PipelineOutput,
    PipelinePorts, PipelineSettings, RunOptions,
};

pub use ports::{
    // Text generation
    ChatMessage,
    ChatRole,
    TextGenerationError,
    TextGenerationPort,
    // Speech synthesis
    SpeechError,
    SpeechSynthesisPort,
    SYNTHESIS_CEILING,
    // Content cache
    generate_cache_key,
    CacheError,
    CacheKey,
    CacheStats,
    ContentCachePort,
    // Audio
    AudioMuxerPort,
    AudioStorageError,
    AudioStoragePort,
    MuxerError,
    // Confirmation
    AlwaysConfirm,
    ConfirmerPort,
};
