//! Episode Description - 节目简介
//!
//! 根据大纲生成发布用的简介文本

use serde::Deserialize;

use crate::application::prompts::DISCLAIMER;
use crate::domain::Outline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionFormat {
    #[default]
    Html,
    Plain,
}

impl std::str::FromStr for DescriptionFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "plain" => Ok(Self::Plain),
            other => Err(format!("unknown description format: {}", other)),
        }
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// 渲染简介
///
/// - Html: 不带编号的有序列表 + 声明
/// - Plain: 带编号的章节列表
pub fn describe_episode(outline: &Outline, format: DescriptionFormat) -> String {
    match format {
        DescriptionFormat::Html => {
            let items = outline
                .headings()
                .iter()
                .map(|h| format!("  <li>{}</li>", escape_html(h.name())))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "<p><strong>Sections</strong>:</p>\n<ol>\n{}\n</ol>\n<p><br></p><p><strong>Disclaimer</strong>: <em>{}</em></p>",
                items, DISCLAIMER
            )
        }
        DescriptionFormat::Plain => format!("Sections:\n\n{}", outline.to_text()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain() {
        let outline = Outline::from_lines(&["1. Origins", "2. Legacy"], None).unwrap();
        assert_eq!(
            describe_episode(&outline, DescriptionFormat::Plain),
            "Sections:\n\n1. Origins\n2. Legacy"
        );
    }

    #[test]
    fn test_html_strips_numbers_and_escapes() {
        let outline = Outline::from_lines(&["1. Origins", "2. Virtue & <Vice>"], None).unwrap();
        let html = describe_episode(&outline, DescriptionFormat::Html);
        assert!(html.contains("<li>Origins</li>"));
        assert!(html.contains("<li>Virtue &amp; &lt;Vice&gt;</li>"));
        assert!(html.contains(DISCLAIMER));
    }
}
