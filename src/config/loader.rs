//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（topicast.toml / topicast.local.toml，或 `--config` 指定的文件）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, ProviderKind};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["topicast", "topicast.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "TOPICAST";

/// 加载应用配置
///
/// # 环境变量示例
/// - `TOPICAST_PIPELINE__MAX_WORKERS=4`
/// - `TOPICAST_TEXT__MODEL=gpt-4o-mini`
/// - `TOPICAST_MUXER__KIND=concat`
/// - `TOPICAST_PROVIDER__KIND=fake`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("text.model", "gpt-4o")?
        .set_default("speech.model", "tts-1")?
        .set_default("speech.format", "mp3")?
        .set_default("pipeline.max_workers", 16)?
        .set_default("pipeline.strategy", "oneshot")?
        .set_default("storage.work_dir", "work")?
        .set_default("storage.output_dir", ".")?
        .set_default("muxer.kind", "ffmpeg")?
        .set_default("provider.kind", "openai")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级），层级分隔符为双下划线
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let pipeline = &config.pipeline;

    if pipeline.max_workers == 0 {
        return Err(ConfigError::ValidationError(
            "pipeline.max_workers must be at least 1".to_string(),
        ));
    }

    let ceilings = [
        ("pipeline.outline_attempts", pipeline.outline_attempts),
        ("pipeline.section_attempts", pipeline.section_attempts),
        ("pipeline.voice_attempts", pipeline.voice_attempts),
        (
            "pipeline.multishot_max_completions",
            pipeline.multishot_max_completions,
        ),
    ];
    if let Some((name, _)) = ceilings.iter().find(|(_, value)| *value == 0) {
        return Err(ConfigError::ValidationError(format!(
            "{} must be at least 1",
            name
        )));
    }

    if pipeline.max_sections == Some(0) {
        return Err(ConfigError::ValidationError(
            "pipeline.max_sections must be at least 1".to_string(),
        ));
    }

    if config.provider.kind == ProviderKind::Openai {
        let required = [
            ("text.model", &config.text.model),
            ("text.base_url", &config.text.base_url),
            ("speech.model", &config.speech.model),
            ("speech.base_url", &config.speech.base_url),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                name
            )));
        }
    }

    if config.muxer.program.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "muxer.program cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Topicast Configuration ===");
    tracing::info!("Provider: {:?}", config.provider.kind);
    tracing::info!("Text: {} @ {}", config.text.model, config.text.base_url);
    tracing::info!("Speech: {} @ {}", config.speech.model, config.speech.base_url);
    tracing::info!("Workers: {}", config.pipeline.max_workers);
    tracing::info!("Strategy: {}", config.pipeline.strategy);
    tracing::info!("Work Directory: {:?}", config.storage.work_dir);
    tracing::info!("Output Directory: {:?}", config.storage.output_dir);
    tracing::info!("Muxer: {:?} ({})", config.muxer.kind, config.muxer.program);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("==============================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::GenerationStrategy;
    use crate::config::MuxerKind;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.text.model, "gpt-4o");
        assert_eq!(config.speech.model, "tts-1");
        assert_eq!(config.pipeline.max_workers, 16);
        assert_eq!(config.pipeline.outline_attempts, 2);
        assert_eq!(config.pipeline.section_attempts, 3);
        assert_eq!(config.pipeline.voice_attempts, 3);
        assert_eq!(config.pipeline.multishot_max_completions, 10);
        assert!(config.pipeline.disclaimer);
        assert!(!config.pipeline.confirm);
        assert_eq!(config.text.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_workers() {
        let mut config = AppConfig::default();
        config.pipeline.max_workers = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_attempts() {
        let mut config = AppConfig::default();
        config.pipeline.section_attempts = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("pipeline.section_attempts"));
    }

    #[test]
    fn test_validation_error_for_empty_model() {
        let mut config = AppConfig::default();
        config.text.model = String::new();
        assert!(validate_config(&config).is_err());

        // 离线模式不使用模型配置
        config.provider.kind = ProviderKind::Fake;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[pipeline]
max_workers = 4
strategy = "multishot"
max_sections = 5

[muxer]
kind = "concat"

[provider]
kind = "fake"
"#
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.pipeline.max_workers, 4);
        assert_eq!(config.pipeline.strategy, GenerationStrategy::MultiShot);
        assert_eq!(config.pipeline.max_sections, Some(5));
        assert_eq!(config.muxer.kind, MuxerKind::Concat);
        assert_eq!(config.provider.kind, ProviderKind::Fake);
        assert_eq!(config.speech.format, "mp3");
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[pipeline]\nmax_workers = 0").unwrap();

        let err = load_config_from_path(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = load_config_from_path(Some(Path::new("/definitely/missing.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }
}
