//! Speech Executor - 合成任务执行
//!
//! 确保每个合成任务的音频文件存在：已存在则跳过，否则调用语音合成服务并写入

use std::sync::Arc;

use super::speech_tasks::SpeechTask;
use crate::application::error::PipelineError;
use crate::application::ports::{AudioStoragePort, SpeechSynthesisPort};
use crate::application::scheduler::TaskScheduler;
use crate::domain::VoiceProfile;

/// 执行结果统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpeechReport {
    pub synthesized: usize,
    pub skipped: usize,
}

pub struct SpeechExecutor {
    synthesizer: Arc<dyn SpeechSynthesisPort>,
    storage: Arc<dyn AudioStoragePort>,
    scheduler: TaskScheduler,
}

impl SpeechExecutor {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesisPort>,
        storage: Arc<dyn AudioStoragePort>,
        scheduler: TaskScheduler,
    ) -> Self {
        Self {
            synthesizer,
            storage,
            scheduler,
        }
    }

    /// 确保所有音频文件存在
    pub async fn ensure_all(
        &self,
        tasks: &[SpeechTask],
        voice: VoiceProfile,
    ) -> Result<SpeechReport, PipelineError> {
        let inputs: Vec<(usize, SpeechTask)> = tasks.iter().cloned().enumerate().collect();
        let synthesizer = self.synthesizer.clone();
        let storage = self.storage.clone();

        let results = self
            .scheduler
            .run_all(inputs, move |task: SpeechTask| {
                let synthesizer = synthesizer.clone();
                let storage = storage.clone();
                async move { Self::ensure_one(task, voice, synthesizer, storage).await }
            })
            .await?;

        let synthesized = results.iter().filter(|(_, created)| *created).count();
        let report = SpeechReport {
            synthesized,
            skipped: results.len() - synthesized,
        };

        tracing::info!(
            synthesized = report.synthesized,
            skipped = report.skipped,
            voice = %voice,
            model = %self.synthesizer.model_id(),
            "Speech parts ensured"
        );
        Ok(report)
    }

    /// 返回是否新合成了音频
    async fn ensure_one(
        task: SpeechTask,
        voice: VoiceProfile,
        synthesizer: Arc<dyn SpeechSynthesisPort>,
        storage: Arc<dyn AudioStoragePort>,
    ) -> Result<bool, PipelineError> {
        if storage.exists(&task.path).await? {
            tracing::debug!(path = %task.path.display(), "Speech part exists, skipping");
            return Ok(false);
        }

        tracing::info!(
            chars = task.text.chars().count(),
            voice = %voice,
            path = %task.path.display(),
            "Synthesizing speech part"
        );
        let audio = synthesizer
            .synthesize(&task.text, voice.provider_voice())
            .await?;
        storage.save(&task.path, &audio).await?;

        tracing::debug!(path = %task.path.display(), bytes = audio.len(), "Speech part written");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::{FakeSpeechClient, FileAudioStorage};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_ensure_all_is_idempotent() {
        let dir = tempdir().unwrap();
        let speech = Arc::new(FakeSpeechClient::new());
        let executor = SpeechExecutor::new(
            speech.clone(),
            Arc::new(FileAudioStorage::new()),
            TaskScheduler::new(4),
        );
        let tasks: Vec<SpeechTask> = (0..3)
            .map(|i| SpeechTask {
                path: dir.path().join(format!("part {}.mp3", i)),
                text: format!("text {}", i),
            })
            .collect();

        let first = executor.ensure_all(&tasks, VoiceProfile::Neutral).await.unwrap();
        assert_eq!(first, SpeechReport { synthesized: 3, skipped: 0 });
        assert_eq!(speech.call_count(), 3);

        let second = executor.ensure_all(&tasks, VoiceProfile::Neutral).await.unwrap();
        assert_eq!(second, SpeechReport { synthesized: 0, skipped: 3 });
        assert_eq!(speech.call_count(), 3);

        for task in &tasks {
            assert!(task.path.exists());
        }
    }

    #[tokio::test]
    async fn test_only_missing_parts_are_synthesized() {
        let dir = tempdir().unwrap();
        let speech = Arc::new(FakeSpeechClient::new());
        let executor = SpeechExecutor::new(
            speech.clone(),
            Arc::new(FileAudioStorage::new()),
            TaskScheduler::new(1),
        );
        let existing = dir.path().join("existing.mp3");
        std::fs::write(&existing, b"audio").unwrap();
        let tasks = vec![
            SpeechTask { path: existing, text: "a".into() },
            SpeechTask { path: dir.path().join("missing.mp3"), text: "b".into() },
        ];

        let report = executor.ensure_all(&tasks, VoiceProfile::Storyteller).await.unwrap();
        assert_eq!(report, SpeechReport { synthesized: 1, skipped: 1 });
        assert_eq!(speech.call_count(), 1);
        assert_eq!(speech.voices(), vec!["fable".to_string()]);
    }
}
