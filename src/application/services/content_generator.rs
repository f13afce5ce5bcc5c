//! Cached Content Generator - 带缓存的文本生成
//!
//! 每次外部调用都以 (标签, 策略, 模型, 提示词哈希) 为 key 缓存，
//! 重跑时直接复用，从而可恢复、幂等

use serde::Deserialize;
use std::sync::Arc;

use crate::application::error::PipelineError;
use crate::application::ports::{
    generate_cache_key, ChatMessage, ContentCachePort, TextGenerationPort,
};
use crate::application::prompts::{continuation_prompt, DONE_TOKEN};
use crate::domain::PARAGRAPH_SEPARATOR;

/// 默认多轮生成的最大回复数
pub const DEFAULT_MAX_COMPLETIONS: usize = 10;

/// 生成策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStrategy {
    /// 单次请求，回复原样使用
    #[default]
    OneShot,
    /// 初始请求加续写请求，直到出现结束标记
    MultiShot,
}

impl GenerationStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneShot => "oneshot",
            Self::MultiShot => "multishot",
        }
    }
}

impl std::str::FromStr for GenerationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "oneshot" => Ok(Self::OneShot),
            "multishot" => Ok(Self::MultiShot),
            other => Err(format!("unknown generation strategy: {}", other)),
        }
    }
}

impl std::fmt::Display for GenerationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 带缓存的文本生成器
///
/// 显式构造并注入到每个需要它的服务中
pub struct ContentGenerator {
    cache: Arc<dyn ContentCachePort>,
    provider: Arc<dyn TextGenerationPort>,
    max_completions: usize,
}

impl ContentGenerator {
    pub fn new(cache: Arc<dyn ContentCachePort>, provider: Arc<dyn TextGenerationPort>) -> Self {
        Self {
            cache,
            provider,
            max_completions: DEFAULT_MAX_COMPLETIONS,
        }
    }

    pub fn with_max_completions(mut self, max_completions: usize) -> Self {
        self.max_completions = max_completions.max(1);
        self
    }

    pub fn model_id(&self) -> &str {
        self.provider.model_id()
    }

    /// 获取内容，命中缓存时不调用服务
    ///
    /// - `read_cache` 为 false 时跳过已有条目（重试时绕过已知的坏结果）
    /// - 新结果写入缓存，覆盖旧条目
    /// - 返回值总是去除首尾空白后的文本
    pub async fn get_cached(
        &self,
        prompt: &str,
        label: &str,
        strategy: GenerationStrategy,
        read_cache: bool,
    ) -> Result<String, PipelineError> {
        let key = generate_cache_key(label, strategy.as_str(), self.provider.model_id(), prompt);

        if read_cache {
            if let Some(content) = self.cache.get(&key).await? {
                tracing::debug!(label = %label, strategy = %strategy, "Content cache hit");
                return Ok(content);
            }
        }

        tracing::info!(
            label = %label,
            strategy = %strategy,
            prompt_len = prompt.len(),
            read_cache = read_cache,
            "Requesting content"
        );

        let content = match strategy {
            GenerationStrategy::OneShot => self.complete_oneshot(prompt).await?,
            GenerationStrategy::MultiShot => self.complete_multishot(prompt, label).await?,
        };

        self.cache.put(&key, &content).await?;
        Ok(content.trim().to_string())
    }

    async fn complete_oneshot(&self, prompt: &str) -> Result<String, PipelineError> {
        let messages = [ChatMessage::user(prompt)];
        Ok(self.provider.complete(&messages).await?)
    }

    async fn complete_multishot(&self, prompt: &str, label: &str) -> Result<String, PipelineError> {
        let mut messages = vec![ChatMessage::user(prompt)];
        let mut parts: Vec<String> = Vec::new();

        for completion in 1..=self.max_completions {
            let response = self.provider.complete(&messages).await?;
            let (body, done) = strip_done_token(&response);
            if !body.is_empty() {
                parts.push(body);
            }
            if done {
                tracing::debug!(label = %label, completions = completion, "Multishot content done");
                break;
            }
            if completion == self.max_completions {
                tracing::warn!(
                    label = %label,
                    completions = completion,
                    "Multishot content reached the completion ceiling without a done token"
                );
                break;
            }
            messages.push(ChatMessage::assistant(response));
            messages.push(ChatMessage::user(continuation_prompt()));
        }

        Ok(parts.join(PARAGRAPH_SEPARATOR))
    }
}

/// 识别并去掉回复末尾的结束标记
///
/// 最后一行（去掉空白和结尾标点后）等于结束标记时视为结束，不区分大小写。
/// 正文中出现的同名单词不算。返回 (去掉标记后的正文, 是否结束)。
pub fn strip_done_token(response: &str) -> (String, bool) {
    let trimmed = response.trim();
    let (head, last_line) = match trimmed.rfind('\n') {
        Some(position) => (&trimmed[..position], &trimmed[position + 1..]),
        None => ("", trimmed),
    };
    let core = last_line
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace());

    if core.eq_ignore_ascii_case(DONE_TOKEN) {
        return (head.trim_end().to_string(), true);
    }
    (trimmed.to_string(), false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::ScriptedTextClient;
    use crate::infrastructure::persistence::FileContentCache;
    use tempfile::tempdir;

    async fn generator(responses: &[&str]) -> (ContentGenerator, Arc<ScriptedTextClient>, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let cache = Arc::new(FileContentCache::new(dir.path()).await.unwrap());
        let client = Arc::new(ScriptedTextClient::new(responses.iter().map(|s| s.to_string())));
        (ContentGenerator::new(cache, client.clone()), client, dir)
    }

    #[test]
    fn test_strip_done_token() {
        assert_eq!(strip_done_token("DONE"), (String::new(), true));
        assert_eq!(strip_done_token("  done.  "), (String::new(), true));
        assert_eq!(
            strip_done_token("Last paragraph.\n\nDONE"),
            ("Last paragraph.".to_string(), true)
        );
        assert_eq!(strip_done_token("Abandoned"), ("Abandoned".to_string(), false));
        assert_eq!(strip_done_token(" More text. "), ("More text.".to_string(), false));
    }

    #[test]
    fn test_prose_ending_in_done_words_is_not_finished() {
        let text = "The school endured to the end.";
        assert_eq!(strip_done_token(text), (text.to_string(), false));
        assert_eq!(strip_done_token("The work was done."), ("The work was done.".to_string(), false));
        assert_eq!(
            strip_done_token("It was over.\n\nThe End"),
            ("It was over.\n\nThe End".to_string(), false)
        );
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("oneshot".parse::<GenerationStrategy>(), Ok(GenerationStrategy::OneShot));
        assert_eq!("MultiShot".parse::<GenerationStrategy>(), Ok(GenerationStrategy::MultiShot));
        assert!("twoshot".parse::<GenerationStrategy>().is_err());
    }

    #[tokio::test]
    async fn test_cache_hit_skips_provider() {
        let (generator, client, _dir) = generator(&["  first answer \n"]).await;

        let first = generator
            .get_cached("prompt", "label", GenerationStrategy::OneShot, true)
            .await
            .unwrap();
        let second = generator
            .get_cached("prompt", "label", GenerationStrategy::OneShot, true)
            .await
            .unwrap();

        assert_eq!(first, "first answer");
        assert_eq!(first, second);
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_bypass_overwrites_entry() {
        let (generator, client, _dir) = generator(&["stale", "fresh"]).await;

        generator
            .get_cached("prompt", "label", GenerationStrategy::OneShot, true)
            .await
            .unwrap();
        let bypassed = generator
            .get_cached("prompt", "label", GenerationStrategy::OneShot, false)
            .await
            .unwrap();
        let reread = generator
            .get_cached("prompt", "label", GenerationStrategy::OneShot, true)
            .await
            .unwrap();

        assert_eq!(bypassed, "fresh");
        assert_eq!(reread, "fresh");
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn test_multishot_joins_until_done() {
        let (generator, client, _dir) =
            generator(&["Part one.", "Part two.\n\nDONE", "never requested"]).await;

        let content = generator
            .get_cached("prompt", "1. Origins", GenerationStrategy::MultiShot, true)
            .await
            .unwrap();

        assert_eq!(content, "Part one.\n\nPart two.");
        assert_eq!(client.call_count(), 2);

        // 第二次请求带上了历史和续写提示词
        let history = client.requests();
        assert_eq!(history[1].len(), 3);
        assert_eq!(history[1][2].content, continuation_prompt());
    }

    #[tokio::test]
    async fn test_multishot_stops_at_ceiling() {
        let (generator, client, _dir) = generator(&["a", "b", "c", "d"]).await;
        let generator = generator.with_max_completions(3);

        let content = generator
            .get_cached("prompt", "label", GenerationStrategy::MultiShot, true)
            .await
            .unwrap();

        assert_eq!(content, "a\n\nb\n\nc");
        assert_eq!(client.call_count(), 3);
    }
}
