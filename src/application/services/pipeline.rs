//! Pipeline Orchestrator - 流水线编排
//!
//! 严格分阶段执行：大纲 → 音色 → （确认）→ 全部章节 → 全部合成任务 → 拼接

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::audio_assembler::AudioAssembler;
use super::content_generator::{ContentGenerator, GenerationStrategy, DEFAULT_MAX_COMPLETIONS};
use super::episode_description::{describe_episode, DescriptionFormat};
use super::outline_generator::{OutlineGenerator, DEFAULT_OUTLINE_ATTEMPTS};
use super::section_generator::{SectionGenerator, DEFAULT_SECTION_ATTEMPTS};
use super::speech_executor::{SpeechExecutor, SpeechReport};
use super::speech_tasks::{compose_narration, SpeechTaskBuilder};
use super::voice_selector::{VoiceSelector, DEFAULT_VOICE_ATTEMPTS};
use crate::application::error::PipelineError;
use crate::application::ports::{
    AudioMuxerPort, AudioStoragePort, ConfirmerPort, ContentCachePort, SpeechSynthesisPort,
    TextGenerationPort,
};
use crate::application::scheduler::{TaskScheduler, DEFAULT_MAX_WORKERS};
use crate::domain::{sanitize_file_name, validate_file_name, Outline, SectionHeading, Topic};

/// 输出音频扩展名
pub const OUTPUT_EXTENSION: &str = "mp3";

/// 主题工作目录
pub fn topic_work_dir(work_root: &Path, topic: &Topic) -> PathBuf {
    work_root.join(topic.dir_name())
}

/// 默认输出文件名 `<时间戳> <主题>.mp3`
pub fn default_output_file_name(topic: &Topic, now: DateTime<Local>) -> String {
    sanitize_file_name(&format!(
        "{} {}.{}",
        now.format("%Y-%m-%dT%H:%M:%S"),
        topic,
        OUTPUT_EXTENSION
    ))
}

/// 流水线参数
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub max_workers: usize,
    pub outline_attempts: usize,
    pub section_attempts: usize,
    pub voice_attempts: usize,
    pub multishot_max_completions: usize,
    /// 未指定输出路径时的输出目录
    pub output_dir: PathBuf,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            outline_attempts: DEFAULT_OUTLINE_ATTEMPTS,
            section_attempts: DEFAULT_SECTION_ATTEMPTS,
            voice_attempts: DEFAULT_VOICE_ATTEMPTS,
            multishot_max_completions: DEFAULT_MAX_COMPLETIONS,
            output_dir: PathBuf::from("."),
        }
    }
}

/// 单次运行的选项
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output_path: Option<PathBuf>,
    pub max_sections: Option<usize>,
    pub strategy: GenerationStrategy,
    /// 是否朗读 AI 生成声明
    pub include_disclaimer: bool,
    /// 生成正文前是否征求确认
    pub confirm: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            output_path: None,
            max_sections: None,
            strategy: GenerationStrategy::OneShot,
            include_disclaimer: true,
            confirm: false,
        }
    }
}

/// 外部协作者
pub struct PipelinePorts {
    pub text: Arc<dyn TextGenerationPort>,
    pub speech: Arc<dyn SpeechSynthesisPort>,
    pub muxer: Arc<dyn AudioMuxerPort>,
    pub storage: Arc<dyn AudioStoragePort>,
    pub confirmer: Arc<dyn ConfirmerPort>,
}

/// 运行结果
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub output_path: PathBuf,
    pub outline: Outline,
    pub speech: SpeechReport,
}

/// 单个主题的流水线
///
/// 除缓存条目和音频片段外不跨运行保存任何状态
pub struct Pipeline {
    topic: Topic,
    work_dir: PathBuf,
    cache: Arc<dyn ContentCachePort>,
    outline_generator: OutlineGenerator,
    section_generator: Arc<SectionGenerator>,
    voice_selector: VoiceSelector,
    speech_executor: SpeechExecutor,
    assembler: AudioAssembler,
    storage: Arc<dyn AudioStoragePort>,
    confirmer: Arc<dyn ConfirmerPort>,
    scheduler: TaskScheduler,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(
        topic: Topic,
        work_dir: PathBuf,
        cache: Arc<dyn ContentCachePort>,
        ports: PipelinePorts,
        settings: PipelineSettings,
    ) -> Self {
        let scheduler = TaskScheduler::new(settings.max_workers);
        let content = Arc::new(
            ContentGenerator::new(cache.clone(), ports.text)
                .with_max_completions(settings.multishot_max_completions),
        );

        Self {
            topic,
            work_dir,
            cache,
            outline_generator: OutlineGenerator::new(content.clone())
                .with_max_attempts(settings.outline_attempts),
            section_generator: Arc::new(
                SectionGenerator::new(content.clone()).with_max_attempts(settings.section_attempts),
            ),
            voice_selector: VoiceSelector::new(content).with_max_attempts(settings.voice_attempts),
            speech_executor: SpeechExecutor::new(ports.speech, ports.storage.clone(), scheduler),
            assembler: AudioAssembler::new(ports.muxer, ports.storage.clone()),
            storage: ports.storage,
            confirmer: ports.confirmer,
            scheduler,
            settings,
        }
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// 生成完整的朗读音频，返回输出路径及运行摘要
    pub async fn run(&self, options: &RunOptions) -> Result<PipelineOutput, PipelineError> {
        tracing::info!(
            topic = %self.topic,
            work_dir = %self.work_dir.display(),
            workers = self.scheduler.max_workers(),
            strategy = %options.strategy,
            "Pipeline started"
        );
        self.storage.create_dir_all(&self.work_dir).await?;

        let outline = self
            .outline_generator
            .generate(&self.topic, options.max_sections)
            .await?;
        tracing::info!(sections = %outline.lines().join(" | "), "Outline ready");

        let voice = self.voice_selector.select(&self.topic).await?;

        if options.confirm {
            self.ask_confirmation(&outline).await?;
        }

        let sections = self.generate_sections(&outline, options.strategy).await?;
        let narration = compose_narration(&self.topic, &sections, options.include_disclaimer);

        let tasks = SpeechTaskBuilder::new(&self.work_dir, OUTPUT_EXTENSION).build(&narration, voice)?;
        tracing::info!(tasks = tasks.len(), sections = sections.len(), "Speech tasks built");
        let speech = self.speech_executor.ensure_all(&tasks, voice).await?;

        let output_path = self.resolve_output_path(options.output_path.as_deref()).await?;
        let ordered_paths: Vec<PathBuf> = tasks.into_iter().map(|t| t.path).collect();
        self.assembler
            .assemble(&ordered_paths, &self.work_dir, &output_path)
            .await?;

        let stats = self.cache.stats();
        tracing::info!(
            output = %output_path.display(),
            cache_hits = stats.hit_count,
            cache_misses = stats.miss_count,
            cache_writes = stats.write_count,
            "Pipeline finished"
        );

        Ok(PipelineOutput {
            output_path,
            outline,
            speech,
        })
    }

    /// 生成（或从缓存读取）大纲并渲染简介
    pub async fn describe(
        &self,
        max_sections: Option<usize>,
        format: DescriptionFormat,
    ) -> Result<String, PipelineError> {
        self.storage.create_dir_all(&self.work_dir).await?;
        let outline = self
            .outline_generator
            .generate(&self.topic, max_sections)
            .await?;
        Ok(describe_episode(&outline, format))
    }

    async fn ask_confirmation(&self, outline: &Outline) -> Result<(), PipelineError> {
        let confirmer = self.confirmer.clone();
        let question = format!(
            "Generate the full narration for \"{}\" with {} sections?\n{}",
            self.topic,
            outline.len(),
            outline.to_text()
        );
        let confirmed = tokio::task::spawn_blocking(move || confirmer.confirm(&question)).await?;
        if !confirmed {
            tracing::warn!(topic = %self.topic, "User aborted");
            return Err(PipelineError::input("User canceled."));
        }
        Ok(())
    }

    async fn generate_sections(
        &self,
        outline: &Outline,
        strategy: GenerationStrategy,
    ) -> Result<Vec<(SectionHeading, String)>, PipelineError> {
        let topic = Arc::new(self.topic.clone());
        let shared_outline = Arc::new(outline.clone());
        let generator = self.section_generator.clone();

        let inputs: Vec<(SectionHeading, SectionHeading)> = outline
            .headings()
            .iter()
            .map(|h| (h.clone(), h.clone()))
            .collect();

        let sections = self
            .scheduler
            .run_all(inputs, move |heading: SectionHeading| {
                let topic = topic.clone();
                let outline = shared_outline.clone();
                let generator = generator.clone();
                async move { generator.generate(&topic, &outline, &heading, strategy).await }
            })
            .await?;

        tracing::info!(sections = sections.len(), "Section texts ready");
        Ok(sections)
    }

    /// 解析输出路径
    ///
    /// - 未指定：`<output_dir>/<默认文件名>`
    /// - 已存在的目录：目录下的默认文件名
    /// - 其他：必须以 `.mp3` 结尾，自动创建父目录
    async fn resolve_output_path(&self, requested: Option<&Path>) -> Result<PathBuf, PipelineError> {
        let default_name = default_output_file_name(&self.topic, Local::now());

        let path = match requested {
            None => {
                self.storage.create_dir_all(&self.settings.output_dir).await?;
                self.settings.output_dir.join(default_name)
            }
            Some(dir) if self.storage.is_dir(dir).await => dir.join(default_name),
            Some(file) => {
                let has_extension = file
                    .extension()
                    .map_or(false, |ext| ext.eq_ignore_ascii_case(OUTPUT_EXTENSION));
                if !has_extension {
                    return Err(PipelineError::input(format!(
                        "Output path must have a .{} suffix: {}",
                        OUTPUT_EXTENSION,
                        file.display()
                    )));
                }
                if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
                    self.storage.create_dir_all(parent).await?;
                }
                file.to_path_buf()
            }
        };

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        validate_file_name(&file_name)
            .map_err(|e| PipelineError::input(format!("Invalid output path: {}", e)))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_output_file_name() {
        let topic = Topic::parse("Stoicism").unwrap();
        let now = Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        assert_eq!(
            default_output_file_name(&topic, now),
            "2024-03-01T09_30_00 Stoicism.mp3"
        );
    }

    #[test]
    fn test_topic_work_dir() {
        let topic = Topic::parse("TCP/IP").unwrap();
        assert_eq!(
            topic_work_dir(Path::new("work"), &topic),
            PathBuf::from("work/TCP_IP")
        );
    }
}
