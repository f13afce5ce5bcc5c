//! Topicast - 主题到有声朗读的生成流水线
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Topic / Outline / Voice: 值对象与结构校验
//! - 文本切分、文件名清理
//!
//! 应用层 (application/):
//! - Ports: 端口定义（TextGeneration, SpeechSynthesis, ContentCache, AudioMuxer, AudioStorage, Confirmer）
//! - Services: 大纲、章节、音色、合成任务、拼接及流水线编排
//! - Scheduler: 有界并发调度
//!
//! 基础设施层 (infrastructure/):
//! - Persistence: 文件内容缓存
//! - Adapters: OpenAI 客户端、ffmpeg、假客户端、终端确认

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::{Pipeline, PipelineError};
pub use config::{load_config, AppConfig};
