//! Book Context - Value Objects

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 非正文章节（目录、致谢等）的排除集合
///
/// 按字符串精确匹配，不做大小写或标点归一化。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FluffSet(HashSet<String>);

impl FluffSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, title: impl Into<String>) {
        self.0.insert(title.into());
    }

    pub fn contains(&self, title: &str) -> bool {
        self.0.contains(title)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 解析排除列表文件：每行一个标题，忽略空行和 `#` 开头的注释
    pub fn parse_lines(text: &str) -> Self {
        text.lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for FluffSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for FluffSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for FluffSet {
    type Item = String;
    type IntoIter = std::collections::hash_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// 章节标题/编号解析策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitlePolicy {
    /// 优先使用 h1 的 `title="<编号>. <标题>"` 属性，编号来自属性
    #[default]
    Attribute,
    /// 使用 h1 可见文本，编号顺序递增
    HeadingText,
    /// 使用 h1 可见文本，标题格式的多词标题加 "About " 前缀
    TitleCasePrefix,
}

impl std::fmt::Display for TitlePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TitlePolicy::Attribute => "attribute",
            TitlePolicy::HeadingText => "heading_text",
            TitlePolicy::TitleCasePrefix => "title_case_prefix",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for TitlePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "attribute" => Ok(TitlePolicy::Attribute),
            "heading_text" => Ok(TitlePolicy::HeadingText),
            "title_case_prefix" => Ok(TitlePolicy::TitleCasePrefix),
            other => Err(format!("unknown title policy: {}", other)),
        }
    }
}
