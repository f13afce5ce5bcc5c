//! Speech Task Builder - 合成任务构建
//!
//! 把有序的章节文本变成有序的 (音频路径, 文本) 列表，超过合成上限的文本按段落切分

use std::path::{Path, PathBuf};

use crate::application::error::PipelineError;
use crate::application::ports::SYNTHESIS_CEILING;
use crate::application::prompts::DISCLAIMER;
use crate::domain::{
    sanitize_file_name, segment_by_paragraphs, truncate_on_char_boundary, validate_file_name,
    SectionHeading, Topic, VoiceProfile, MAX_TITLE_BYTES, PARAGRAPH_SEPARATOR,
};

/// 合成任务
///
/// 目标文件存在即表示任务已完成
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechTask {
    pub path: PathBuf,
    pub text: String,
}

/// 组装朗读文本
///
/// 每个章节前加上 `Section <n>: <name>.`，第一个章节前加上带引号的主题和（可选的）AI 生成声明
pub fn compose_narration(
    topic: &Topic,
    sections: &[(SectionHeading, String)],
    include_disclaimer: bool,
) -> Vec<(SectionHeading, String)> {
    sections
        .iter()
        .enumerate()
        .map(|(position, (heading, text))| {
            let mut paragraphs: Vec<String> = Vec::new();
            if position == 0 {
                paragraphs.push(format!("\"{}\"", topic));
                if include_disclaimer {
                    paragraphs.push(DISCLAIMER.to_string());
                }
            }
            paragraphs.push(format!("Section {}: {}.", heading.index(), heading.name()));
            paragraphs.push(text.clone());
            (heading.clone(), paragraphs.join(PARAGRAPH_SEPARATOR))
        })
        .collect()
}

pub struct SpeechTaskBuilder {
    audio_dir: PathBuf,
    extension: String,
    ceiling: usize,
}

impl SpeechTaskBuilder {
    pub fn new(audio_dir: impl AsRef<Path>, extension: impl Into<String>) -> Self {
        Self {
            audio_dir: audio_dir.as_ref().to_path_buf(),
            extension: extension.into(),
            ceiling: SYNTHESIS_CEILING,
        }
    }

    /// 覆盖合成上限（仅用于测试较短文本的切分）
    pub fn with_ceiling(mut self, ceiling: usize) -> Self {
        self.ceiling = ceiling;
        self
    }

    /// 稳定的文件名主干：标题 + 音色 + 内容哈希
    fn stem(heading: &SectionHeading, voice: VoiceProfile, text: &str) -> String {
        let title = heading.to_string();
        let title = truncate_on_char_boundary(&title, MAX_TITLE_BYTES);
        let digest = md5::compute(text.as_bytes());
        sanitize_file_name(&format!("{} ({}) {:x}", title, voice.key(), digest))
    }

    fn task_path(&self, file_name: String) -> Result<PathBuf, PipelineError> {
        validate_file_name(&file_name)?;
        Ok(self.audio_dir.join(file_name))
    }

    /// 构建有序的合成任务列表，每个任务的文本都不超过合成上限
    pub fn build(
        &self,
        sections: &[(SectionHeading, String)],
        voice: VoiceProfile,
    ) -> Result<Vec<SpeechTask>, PipelineError> {
        let mut tasks = Vec::new();

        for (heading, text) in sections {
            let stem = Self::stem(heading, voice, text);

            if text.chars().count() <= self.ceiling {
                tasks.push(SpeechTask {
                    path: self.task_path(format!("{}.{}", stem, self.extension))?,
                    text: text.clone(),
                });
                continue;
            }

            let chunks = segment_by_paragraphs(text, self.ceiling)?;
            tracing::debug!(section = %heading, chunks = chunks.len(), "Section split for synthesis");
            for (offset, chunk) in chunks.into_iter().enumerate() {
                tasks.push(SpeechTask {
                    path: self.task_path(format!("{} ({}).{}", stem, offset + 1, self.extension))?,
                    text: chunk,
                });
            }
        }

        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Outline;

    fn sections(texts: &[&str]) -> Vec<(SectionHeading, String)> {
        let lines: Vec<String> = (1..=texts.len()).map(|i| format!("{}. Part {}", i, i)).collect();
        let outline = Outline::from_lines(&lines, None).unwrap();
        outline
            .headings()
            .iter()
            .cloned()
            .zip(texts.iter().map(|t| t.to_string()))
            .collect()
    }

    #[test]
    fn test_one_task_per_short_section() {
        let builder = SpeechTaskBuilder::new("/work/Stoicism", "mp3");
        let tasks = builder
            .build(&sections(&["alpha", "beta"]), VoiceProfile::SereneFemale)
            .unwrap();

        assert_eq!(tasks.len(), 2);
        let name = tasks[0].path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("1. Part 1 (serene-female) "));
        assert!(name.ends_with(".mp3"));
        assert_eq!(tasks[1].text, "beta");
    }

    #[test]
    fn test_long_section_split_with_numbered_paths() {
        let builder = SpeechTaskBuilder::new("/work", "mp3").with_ceiling(10);
        let tasks = builder
            .build(&sections(&["aaaa\n\nbbbb\n\ncccc"]), VoiceProfile::Neutral)
            .unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].text, "aaaa\n\nbbbb");
        assert_eq!(tasks[1].text, "cccc");
        let first = tasks[0].path.file_name().unwrap().to_string_lossy().to_string();
        let second = tasks[1].path.file_name().unwrap().to_string_lossy().to_string();
        assert!(first.ends_with(" (1).mp3"));
        assert!(second.ends_with(" (2).mp3"));
        for task in &tasks {
            assert!(task.text.chars().count() <= 10);
        }
    }

    #[test]
    fn test_blank_line_runs_do_not_create_empty_tasks() {
        let builder = SpeechTaskBuilder::new("/work", "mp3").with_ceiling(4);
        let tasks = builder
            .build(&sections(&["aaaa\n\n\n\nbbbb"]), VoiceProfile::Neutral)
            .unwrap();

        let texts: Vec<&str> = tasks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["aaaa", "bbbb"]);
        assert!(tasks.iter().all(|t| !t.text.trim().is_empty()));
    }

    #[test]
    fn test_stem_depends_on_voice_and_content() {
        let builder = SpeechTaskBuilder::new("/work", "mp3");
        let a = builder.build(&sections(&["same"]), VoiceProfile::Neutral).unwrap();
        let b = builder.build(&sections(&["same"]), VoiceProfile::DeepMale).unwrap();
        let c = builder.build(&sections(&["other"]), VoiceProfile::Neutral).unwrap();
        let again = builder.build(&sections(&["same"]), VoiceProfile::Neutral).unwrap();
        assert_ne!(a[0].path, b[0].path);
        assert_ne!(a[0].path, c[0].path);
        assert_eq!(a[0].path, again[0].path);
    }

    #[test]
    fn test_unsplittable_paragraph_is_invariant_error() {
        let builder = SpeechTaskBuilder::new("/work", "mp3").with_ceiling(5);
        let err = builder
            .build(&sections(&["this paragraph is too long"]), VoiceProfile::Neutral)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Invariant(_)));
    }

    #[test]
    fn test_compose_narration() {
        let topic = Topic::parse("Stoicism").unwrap();
        let parts = compose_narration(&topic, &sections(&["alpha", "beta"]), true);
        assert_eq!(
            parts[0].1,
            format!("\"Stoicism\"\n\n{}\n\nSection 1: Part 1.\n\nalpha", DISCLAIMER)
        );
        assert_eq!(parts[1].1, "Section 2: Part 2.\n\nbeta");

        let without = compose_narration(&topic, &sections(&["alpha"]), false);
        assert_eq!(without[0].1, "\"Stoicism\"\n\nSection 1: Part 1.\n\nalpha");
    }
}
