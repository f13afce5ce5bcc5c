//! Topicast - 主题到有声朗读的生成流水线
//!
//! 子命令：
//! - generate: 生成完整朗读音频
//! - describe: 输出节目简介

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use topicast::application::ports::{
    AlwaysConfirm, AudioMuxerPort, ConfirmerPort, SpeechSynthesisPort, TextGenerationPort,
};
use topicast::application::services::{
    topic_work_dir, DescriptionFormat, GenerationStrategy, Pipeline, PipelinePorts,
    PipelineSettings, RunOptions,
};
use topicast::config::{
    load_config_from_path, print_config, AppConfig, LogConfig, MuxerKind, ProviderKind,
};
use topicast::domain::Topic;
use topicast::infrastructure::adapters::{
    ConcatMuxer, FakeSpeechClient, FakeTextClient, FfmpegMuxer, FileAudioStorage, OpenAiChatClient,
    OpenAiChatConfig, OpenAiSpeechClient, OpenAiSpeechConfig, StdinConfirmer,
};
use topicast::infrastructure::persistence::FileContentCache;
use topicast::PipelineError;

/// 被 Ctrl-C 中断时的退出码
const INTERRUPTED_EXIT_CODE: u8 = 130;

#[derive(Debug, Parser)]
#[command(name = "topicast", version, about = "Generate a narrated audio episode about a topic")]
struct Cli {
    /// 配置文件路径
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate the full narration audio
    Generate(GenerateArgs),
    /// Print the episode description built from the outline
    Describe(DescribeArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    #[arg(long)]
    topic: String,

    /// Output file (.mp3) or an existing directory
    #[arg(long, short)]
    output: Option<PathBuf>,

    #[arg(long)]
    max_sections: Option<usize>,

    /// Do not narrate the AI generated disclaimer
    #[arg(long)]
    no_marker: bool,

    /// Ask before generating section texts
    #[arg(long)]
    confirm: bool,

    #[arg(long)]
    strategy: Option<GenerationStrategy>,

    #[arg(long)]
    workers: Option<usize>,
}

#[derive(Debug, Args)]
struct DescribeArgs {
    #[arg(long)]
    topic: String,

    #[arg(long)]
    max_sections: Option<usize>,

    /// html or plain
    #[arg(long, default_value = "html")]
    format: DescriptionFormat,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = match load_config_from_path(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            let err = PipelineError::configuration(e.to_string());
            eprintln!("Error: {}", err);
            return ExitCode::from(err.exit_code());
        }
    };

    init_tracing(&config.log);
    print_config(&config);

    tokio::select! {
        result = execute(cli.command, config) => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                let code = e
                    .downcast_ref::<PipelineError>()
                    .map(|pe| {
                        tracing::error!(kind = pe.kind(), "Pipeline failed");
                        pe.exit_code()
                    })
                    .unwrap_or(1);
                eprintln!("Error: {:#}", e);
                ExitCode::from(code)
            }
        },
        _ = tokio::signal::ctrl_c() => {
            // 丢弃运行中的 future，调度器随之中止所有进行中的任务
            tracing::warn!("Interrupted, aborting run");
            ExitCode::from(INTERRUPTED_EXIT_CODE)
        }
    }
}

/// 初始化日志，输出到 stderr，stdout 只留给结果
fn init_tracing(log: &LogConfig) {
    let log_filter = format!("{},topicast={}", log.level, log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn execute(command: Command, mut config: AppConfig) -> anyhow::Result<()> {
    match command {
        Command::Generate(args) => {
            if let Some(workers) = args.workers {
                config.pipeline.max_workers = workers;
            }
            let options = RunOptions {
                output_path: args.output,
                max_sections: args.max_sections.or(config.pipeline.max_sections),
                strategy: args.strategy.unwrap_or(config.pipeline.strategy),
                include_disclaimer: config.pipeline.disclaimer && !args.no_marker,
                confirm: config.pipeline.confirm || args.confirm,
            };

            let pipeline = build_pipeline(&args.topic, &config, options.confirm).await?;
            let output = pipeline.run(&options).await?;

            tracing::info!(
                synthesized = output.speech.synthesized,
                skipped = output.speech.skipped,
                sections = output.outline.len(),
                "Narration ready"
            );
            println!("{}", output.output_path.display());
        }
        Command::Describe(args) => {
            let pipeline = build_pipeline(&args.topic, &config, false).await?;
            let max_sections = args.max_sections.or(config.pipeline.max_sections);
            let description = pipeline.describe(max_sections, args.format).await?;
            println!("{}", description);
        }
    }
    Ok(())
}

async fn build_pipeline(raw_topic: &str, config: &AppConfig, confirm: bool) -> anyhow::Result<Pipeline> {
    let topic = Topic::parse(raw_topic).map_err(PipelineError::from)?;
    let work_root = std::env::current_dir()
        .context("Failed to resolve current directory")?
        .join(&config.storage.work_dir);
    let work_dir = topic_work_dir(&work_root, &topic);

    let cache = FileContentCache::new(&work_dir)
        .await
        .map_err(PipelineError::from)
        .with_context(|| format!("Failed to open work directory {}", work_dir.display()))?;

    let (text, speech) = build_providers(config)?;
    let muxer: Arc<dyn AudioMuxerPort> = match config.muxer.kind {
        MuxerKind::Ffmpeg => Arc::new(FfmpegMuxer::new(config.muxer.program.clone())),
        MuxerKind::Concat => Arc::new(ConcatMuxer::new()),
    };
    let confirmer: Arc<dyn ConfirmerPort> = if confirm {
        Arc::new(StdinConfirmer::new())
    } else {
        Arc::new(AlwaysConfirm)
    };

    let ports = PipelinePorts {
        text,
        speech,
        muxer,
        storage: Arc::new(FileAudioStorage::new()),
        confirmer,
    };
    let settings = PipelineSettings {
        max_workers: config.pipeline.max_workers,
        outline_attempts: config.pipeline.outline_attempts,
        section_attempts: config.pipeline.section_attempts,
        voice_attempts: config.pipeline.voice_attempts,
        multishot_max_completions: config.pipeline.multishot_max_completions,
        output_dir: config.storage.output_dir.clone(),
    };

    Ok(Pipeline::new(topic, work_dir, Arc::new(cache), ports, settings))
}

type Providers = (Arc<dyn TextGenerationPort>, Arc<dyn SpeechSynthesisPort>);

fn build_providers(config: &AppConfig) -> Result<Providers, PipelineError> {
    match config.provider.kind {
        ProviderKind::Fake => {
            tracing::warn!("Using offline fake providers");
            let text: Arc<dyn TextGenerationPort> = Arc::new(FakeTextClient::new());
            let speech: Arc<dyn SpeechSynthesisPort> = Arc::new(FakeSpeechClient::new());
            Ok((text, speech))
        }
        ProviderKind::Openai => {
            let text_key = config.text.api_key().ok_or_else(|| {
                PipelineError::configuration(format!(
                    "Environment variable {} is not set",
                    config.text.api_key_env
                ))
            })?;
            let speech_key = config.speech.api_key().ok_or_else(|| {
                PipelineError::configuration(format!(
                    "Environment variable {} is not set",
                    config.speech.api_key_env
                ))
            })?;

            let text = OpenAiChatClient::new(OpenAiChatConfig {
                base_url: config.text.base_url.clone(),
                api_key: text_key,
                model: config.text.model.clone(),
                timeout_secs: config.text.timeout_secs,
            })?;
            let speech = OpenAiSpeechClient::new(OpenAiSpeechConfig {
                base_url: config.speech.base_url.clone(),
                api_key: speech_key,
                model: config.speech.model.clone(),
                format: config.speech.format.clone(),
                timeout_secs: config.speech.timeout_secs,
            })?;

            let text: Arc<dyn TextGenerationPort> = Arc::new(text);
            let speech: Arc<dyn SpeechSynthesisPort> = Arc::new(speech);
            Ok((text, speech))
        }
    }
}
