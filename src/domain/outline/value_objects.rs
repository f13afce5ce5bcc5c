//! Outline Context - Value Objects

use std::collections::HashSet;

use super::OutlineViolation;

/// 章节标题 `<index>. <name>`
///
/// 不变量:
/// - index 从 1 开始，与在大纲中的位置一致
/// - name 非空，无首尾空白
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SectionHeading {
    index: usize,
    name: String,
}

impl SectionHeading {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for SectionHeading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}", self.index, self.name)
    }
}

/// 大纲 - 有序、已校验的章节列表，永不为空
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    headings: Vec<SectionHeading>,
}

impl Outline {
    /// 校验编号行并构建大纲
    ///
    /// 按顺序检查，遇到第一个违规即返回：
    /// 1. 无首尾空白
    /// 2. 前缀 `"<n>. "` 与位置一致
    /// 3. 名称非空
    /// 4. 名称唯一（区分大小写）
    /// 5. 数量不超过 `max_sections`
    pub fn from_lines<S: AsRef<str>>(
        lines: &[S],
        max_sections: Option<usize>,
    ) -> Result<Self, OutlineViolation> {
        if lines.is_empty() {
            return Err(OutlineViolation::Empty);
        }

        let mut seen: HashSet<&str> = HashSet::with_capacity(lines.len());
        let mut headings = Vec::with_capacity(lines.len());

        for (offset, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            let position = offset + 1;

            if line != line.trim() {
                return Err(OutlineViolation::StrayWhitespace {
                    position,
                    line: line.to_string(),
                });
            }

            let prefix = format!("{}. ", position);
            let Some(name) = line.strip_prefix(prefix.as_str()) else {
                return Err(OutlineViolation::BadNumbering {
                    position,
                    line: line.to_string(),
                });
            };

            if name.trim().is_empty() || name != name.trim_start() {
                return Err(OutlineViolation::EmptyName {
                    position,
                    line: line.to_string(),
                });
            }

            if !seen.insert(name) {
                return Err(OutlineViolation::DuplicateName {
                    position,
                    line: line.to_string(),
                });
            }

            headings.push(SectionHeading {
                index: position,
                name: name.to_string(),
            });
        }

        if let Some(max) = max_sections {
            if headings.len() > max {
                return Err(OutlineViolation::TooManySections {
                    count: headings.len(),
                    max,
                });
            }
        }

        Ok(Self { headings })
    }

    pub fn headings(&self) -> &[SectionHeading] {
        &self.headings
    }

    pub fn len(&self) -> usize {
        self.headings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }

    /// 编号行，如 `["1. Origins", "2. Key Ideas"]`
    pub fn lines(&self) -> Vec<String> {
        self.headings.iter().map(ToString::to_string).collect()
    }

    /// 以换行连接的大纲文本（用于提示词与缓存）
    pub fn to_text(&self) -> String {
        self.lines().join("\n")
    }
}

/// 大纲行是否结构合法
pub fn is_outline_valid<S: AsRef<str>>(lines: &[S]) -> bool {
    Outline::from_lines(lines, None).is_ok()
}
