//! 提示词模板
//!
//! 占位符形如 `{topic}`，渲染时直接替换

use crate::domain::{Outline, SectionHeading, Topic, VoiceProfile};

/// 服务拒绝主题时使用的前缀
pub const REJECTION_PREFIX: &str = "Error:";

/// 无法划分章节时的哨兵回复
pub const NONE_SENTINELS: [&str; 2] = ["none", "none."];

/// 多轮生成的结束标记，必须单独占据回复的最后一行
pub const DONE_TOKEN: &str = "DONE";

const OUTLINE_TEMPLATE: &str = "\
You are planning a long-form audio narration about the topic: {topic}

List the sections the narration should cover, in the order they should be narrated. \
Output one section per line, numbered as `1. Section name`, with no other text, no blank lines and no sub-items.{section_limit}

If the topic is too vague or too narrow to be divided into sections, output exactly: none
If the topic must not be covered, output a single line starting with `Error:` followed by the reason.";

const SECTION_TEMPLATE: &str = "\
You are writing the script of a long-form audio narration about the topic: {topic}

The narration has the following sections:
{outline}

Write the complete narration text for section {heading} only. \
Write plain spoken prose in paragraphs separated by blank lines. \
Do not use markdown, lists, headings or code blocks, and do not repeat the section title.{continuation}";

const CONTINUATION_FIRST: &str = "

If the section is too long for a single response, stop at a natural paragraph break; you will be asked to continue. \
When the section is completely written, end your final response with a last line containing only DONE.";

const CONTINUATION: &str = "Continue writing the section exactly where you stopped. If the section is already complete, respond with only DONE.";

const VOICE_TEMPLATE: &str = "\
Choose the narration voice best suited for a long-form audio narration about the topic: {topic}

The available voices are: {options}

Respond with only the name of one voice.";

/// 语音中的 AI 生成声明
pub const DISCLAIMER: &str =
    "Both the text and the audio of this narration are AI generated, and inaccuracies may exist.";

/// 大纲提示词，可选地限制章节数
pub fn outline_prompt(topic: &Topic, max_sections: Option<usize>) -> String {
    let section_limit = match max_sections {
        Some(max) => format!(" List at most {} sections.", max),
        None => String::new(),
    };
    OUTLINE_TEMPLATE
        .replace("{topic}", topic.as_str())
        .replace("{section_limit}", &section_limit)
}

/// 章节正文提示词
pub fn section_prompt(
    topic: &Topic,
    outline: &Outline,
    heading: &SectionHeading,
    with_continuation: bool,
) -> String {
    SECTION_TEMPLATE
        .replace("{topic}", topic.as_str())
        .replace("{outline}", &outline.to_text())
        .replace("{heading}", &heading.to_string())
        .replace(
            "{continuation}",
            if with_continuation { CONTINUATION_FIRST } else { "" },
        )
}

/// 多轮生成的续写提示词
pub fn continuation_prompt() -> &'static str {
    CONTINUATION
}

/// 音色推荐提示词
pub fn voice_prompt(topic: &Topic) -> String {
    VOICE_TEMPLATE
        .replace("{topic}", topic.as_str())
        .replace("{options}", &VoiceProfile::options_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_prompt_limit_clause() {
        let topic = Topic::parse("Stoicism").unwrap();
        assert!(!outline_prompt(&topic, None).contains("at most"));
        assert!(outline_prompt(&topic, Some(4)).contains("List at most 4 sections."));
        assert!(!outline_prompt(&topic, None).contains('{'));
    }

    #[test]
    fn test_section_prompt_contains_context() {
        let topic = Topic::parse("Stoicism").unwrap();
        let outline = Outline::from_lines(&["1. Origins", "2. Legacy"], None).unwrap();
        let prompt = section_prompt(&topic, &outline, &outline.headings()[1], false);
        assert!(prompt.contains("1. Origins\n2. Legacy"));
        assert!(prompt.contains("section 2. Legacy only"));
        assert!(!prompt.contains("DONE"));
        assert!(section_prompt(&topic, &outline, &outline.headings()[0], true).contains("DONE"));
    }

    #[test]
    fn test_voice_prompt_lists_options() {
        let topic = Topic::parse("Stoicism").unwrap();
        assert!(voice_prompt(&topic).contains("serene-female"));
    }
}
