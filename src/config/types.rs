//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::application::services::GenerationStrategy;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 文本生成服务
    #[serde(default)]
    pub text: TextConfig,

    /// 语音合成服务
    #[serde(default)]
    pub speech: SpeechConfig,

    /// 流水线参数
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 音频拼接工具
    #[serde(default)]
    pub muxer: MuxerConfig,

    /// 服务提供方
    #[serde(default)]
    pub provider: ProviderConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 文本生成服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct TextConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_text_model")]
    pub model: String,

    /// 保存 API key 的环境变量名
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// 请求超时（秒），0 表示不限制
    #[serde(default)]
    pub timeout_secs: u64,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_text_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: 0,
        }
    }
}

impl TextConfig {
    /// 从环境变量读取 API key，未设置或为空时返回 None
    pub fn api_key(&self) -> Option<String> {
        read_api_key(&self.api_key_env)
    }
}

/// 语音合成服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_speech_model")]
    pub model: String,

    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default)]
    pub timeout_secs: u64,

    /// 输出音频格式
    #[serde(default = "default_speech_format")]
    pub format: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_speech_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: 0,
            format: default_speech_format(),
        }
    }
}

impl SpeechConfig {
    pub fn api_key(&self) -> Option<String> {
        read_api_key(&self.api_key_env)
    }
}

fn read_api_key(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_text_model() -> String {
    "gpt-4o".to_string()
}

fn default_speech_model() -> String {
    "tts-1".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_speech_format() -> String {
    "mp3".to_string()
}

/// 流水线配置
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// 最大并发数
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    #[serde(default = "default_outline_attempts")]
    pub outline_attempts: usize,

    #[serde(default = "default_section_attempts")]
    pub section_attempts: usize,

    #[serde(default = "default_voice_attempts")]
    pub voice_attempts: usize,

    /// 多轮生成的最大补全次数
    #[serde(default = "default_multishot_max_completions")]
    pub multishot_max_completions: usize,

    #[serde(default)]
    pub strategy: GenerationStrategy,

    /// 章节数上限
    #[serde(default)]
    pub max_sections: Option<usize>,

    /// 是否朗读 AI 生成声明
    #[serde(default = "default_true")]
    pub disclaimer: bool,

    /// 生成正文前是否征求确认
    #[serde(default)]
    pub confirm: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            outline_attempts: default_outline_attempts(),
            section_attempts: default_section_attempts(),
            voice_attempts: default_voice_attempts(),
            multishot_max_completions: default_multishot_max_completions(),
            strategy: GenerationStrategy::default(),
            max_sections: None,
            disclaimer: true,
            confirm: false,
        }
    }
}

fn default_max_workers() -> usize {
    16
}

fn default_outline_attempts() -> usize {
    2
}

fn default_section_attempts() -> usize {
    3
}

fn default_voice_attempts() -> usize {
    3
}

fn default_multishot_max_completions() -> usize {
    10
}

fn default_true() -> bool {
    true
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 工作目录根，每个主题一个子目录
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// 默认输出目录
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_work_dir() -> PathBuf {
    PathBuf::from("work")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// 拼接工具类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MuxerKind {
    #[default]
    Ffmpeg,
    /// 直接按字节拼接
    Concat,
}

/// 拼接工具配置
#[derive(Debug, Clone, Deserialize)]
pub struct MuxerConfig {
    #[serde(default)]
    pub kind: MuxerKind,

    /// ffmpeg 可执行文件
    #[serde(default = "default_muxer_program")]
    pub program: String,
}

impl Default for MuxerConfig {
    fn default() -> Self {
        Self {
            kind: MuxerKind::default(),
            program: default_muxer_program(),
        }
    }
}

fn default_muxer_program() -> String {
    "ffmpeg".to_string()
}

/// 服务提供方类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Openai,
    /// 离线的假客户端
    Fake,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
