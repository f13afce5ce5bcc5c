//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};

/// 音色配置
///
/// 每个规范 key 对应一个语音合成服务的音色名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VoiceProfile {
    Neutral,
    WarmMale,
    Storyteller,
    DeepMale,
    SereneFemale,
    BrightFemale,
}

impl VoiceProfile {
    pub const ALL: [VoiceProfile; 6] = [
        Self::Neutral,
        Self::WarmMale,
        Self::Storyteller,
        Self::DeepMale,
        Self::SereneFemale,
        Self::BrightFemale,
    ];

    /// 规范 key
    pub fn key(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::WarmMale => "warm-male",
            Self::Storyteller => "storyteller",
            Self::DeepMale => "deep-male",
            Self::SereneFemale => "serene-female",
            Self::BrightFemale => "bright-female",
        }
    }

    /// 语音合成服务的音色名
    pub fn provider_voice(&self) -> &'static str {
        match self {
            Self::Neutral => "alloy",
            Self::WarmMale => "echo",
            Self::Storyteller => "fable",
            Self::DeepMale => "onyx",
            Self::SereneFemale => "nova",
            Self::BrightFemale => "shimmer",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.key() == key)
    }

    pub fn from_provider_voice(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.provider_voice() == value)
    }

    /// 解析模型给出的音色推荐
    ///
    /// 依次尝试：
    /// 1. 规范 key 精确匹配
    /// 2. 服务端音色名匹配，映射回规范 key
    /// 3. `key (value)` 联合格式，且 key 与 value 必须配对
    pub fn resolve(raw: &str) -> Option<Self> {
        let normalized = normalize_voice_response(raw);

        if let Some(voice) = Self::from_key(&normalized) {
            return Some(voice);
        }
        if let Some(voice) = Self::from_provider_voice(&normalized) {
            return Some(voice);
        }

        let (key, rest) = normalized.split_once(" (")?;
        let value = rest.strip_suffix(')')?;
        Self::from_key(key.trim()).filter(|voice| voice.provider_voice() == value.trim())
    }

    /// 用于提示词的选项列表，如 `neutral, warm-male, ...`
    pub fn options_text() -> String {
        Self::ALL.iter().map(|v| v.key()).collect::<Vec<_>>().join(", ")
    }
}

impl std::fmt::Display for VoiceProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.key(), self.provider_voice())
    }
}

/// 规范化：去首尾空白、去结尾句号、转小写
pub fn normalize_voice_response(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_suffix('.')
        .unwrap_or(trimmed)
        .trim_end()
        .to_lowercase()
}
