//! 应用服务
//!
//! 每个服务负责流水线中的一个阶段，`Pipeline` 负责按阶段编排

mod audio_assembler;
mod content_generator;
mod episode_description;
mod outline_generator;
mod pipeline;
mod section_generator;
mod speech_executor;
mod speech_tasks;
mod voice_selector;

pub use audio_assembler::{escape_manifest_path, render_manifest, AudioAssembler, MANIFEST_FILE_NAME};
pub use content_generator::{
    strip_done_token, ContentGenerator, GenerationStrategy, DEFAULT_MAX_COMPLETIONS,
};
pub use episode_description::{describe_episode, DescriptionFormat};
pub use outline_generator::{OutlineGenerator, DEFAULT_OUTLINE_ATTEMPTS, OUTLINE_CACHE_LABEL};
pub use pipeline::{
    default_output_file_name, topic_work_dir, Pipeline, PipelineOutput, PipelinePorts,
    PipelineSettings, RunOptions, OUTPUT_EXTENSION,
};
pub use section_generator::{validate_section_text, SectionGenerator, DEFAULT_SECTION_ATTEMPTS};
pub use speech_executor::{SpeechExecutor, SpeechReport};
pub use speech_tasks::{compose_narration, SpeechTask, SpeechTaskBuilder};
pub use voice_selector::{VoiceSelector, DEFAULT_VOICE_ATTEMPTS, VOICE_CACHE_LABEL};
