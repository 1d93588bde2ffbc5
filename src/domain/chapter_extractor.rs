//! 章节提取器
//!
//! 将电子书的文档条目按阅读顺序转换为章节记录：
//! 1. 跳过非文本条目（样式表、图片等）
//! 2. 从第一个 h1 解析标题和章节编号
//! 3. 去掉 script/style 后提取正文
//! 4. 过滤空正文和排除集合中的标题

use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;

use super::book::{ChapterRecord, DocumentItem, FluffSet, TitlePolicy};

static HEADING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("static selector"));
static BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("static selector"));

/// 不参与正文提取的元素
const HIDDEN_TAGS: &[&str] = &["script", "style"];

/// 块级元素，边界处换行
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "ol", "p",
    "pre", "section", "table", "tr", "ul",
];

/// 标题两端去除的弯引号
const CURLY_QUOTES: &[char] = &['\u{201C}', '\u{201D}'];

/// 提取配置
#[derive(Debug, Clone, Default)]
pub struct ExtractorConfig {
    /// 标题/编号策略
    pub policy: TitlePolicy,
    /// 排除的标题（精确匹配）
    pub fluff: FluffSet,
}

impl ExtractorConfig {
    pub fn new(policy: TitlePolicy, fluff: FluffSet) -> Self {
        Self { policy, fluff }
    }
}

/// 对文档条目进行章节提取
///
/// 后备编号从 1 开始，每保留一条记录加一；属性中的编号不影响计数。
/// 输出顺序与输入顺序一致。
pub fn extract_chapters(items: &[DocumentItem], config: &ExtractorConfig) -> Vec<ChapterRecord> {
    let (chapters, _next_number) = items.iter().fold(
        (Vec::new(), 1u32),
        |(mut chapters, next_number), item| match extract_item(item, config, next_number) {
            Some(chapter) => {
                chapters.push(chapter);
                (chapters, next_number + 1)
            }
            None => (chapters, next_number),
        },
    );
    chapters
}

/// 处理单个条目，被过滤时返回 None
fn extract_item(
    item: &DocumentItem,
    config: &ExtractorConfig,
    next_number: u32,
) -> Option<ChapterRecord> {
    if !item.is_document() {
        return None;
    }

    let document = Html::parse_document(&item.markup());
    let heading = document.select(&HEADING).next();
    let (title, attribute_number) = resolve_title(item.name(), heading, config.policy);

    let content = visible_text(&document);
    if content.is_empty() || config.fluff.contains(&title) {
        return None;
    }

    Some(ChapterRecord::new(
        attribute_number.unwrap_or(next_number),
        title,
        content,
    ))
}

/// 解析标题，并在属性策略下返回属性中的章节编号
fn resolve_title(
    fallback: &str,
    heading: Option<ElementRef<'_>>,
    policy: TitlePolicy,
) -> (String, Option<u32>) {
    let Some(heading) = heading else {
        return (fallback.to_string(), None);
    };

    let heading_text = element_text(heading);
    let visible = if heading_text.is_empty() {
        fallback.to_string()
    } else {
        heading_text.clone()
    };

    match policy {
        TitlePolicy::Attribute => match heading.value().attr("title").and_then(parse_structured_title) {
            Some((number, title)) => (title, Some(number)),
            None => (visible, None),
        },
        TitlePolicy::HeadingText => (visible, None),
        TitlePolicy::TitleCasePrefix => {
            if is_title_case(&heading_text) {
                (format!("About {}", heading_text), None)
            } else {
                (visible, None)
            }
        }
    }
}

/// 解析 `"<编号>. <标题>"` 格式的结构化标题
///
/// 在第一个 `". "` 处分割；编号必须是非负整数，标题去掉两端的弯引号后不能为空。
pub fn parse_structured_title(raw: &str) -> Option<(u32, String)> {
    let (number, rest) = raw.split_once(". ")?;
    let number = number.trim().parse::<u32>().ok()?;
    let title = rest.trim().trim_matches(CURLY_QUOTES).trim();
    if title.is_empty() {
        return None;
    }
    Some((number, title.to_string()))
}

/// 判断文本是否为"标题格式"
///
/// 单词或空文本返回 false；多词且不等于其全大写形式时返回 true。
pub fn is_title_case(text: &str) -> bool {
    if text.split_whitespace().count() <= 1 {
        return false;
    }
    text != text.to_uppercase()
}

/// 元素的可见文本，空白折叠为单个空格
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// 提取 body 的可见文本（忽略 script/style），块级元素边界换行
fn visible_text(document: &Html) -> String {
    let root = document
        .select(&BODY)
        .next()
        .unwrap_or_else(|| document.root_element());

    let mut raw = String::new();
    for node in root.descendants() {
        match node.value() {
            Node::Text(text) => {
                let hidden = node.ancestors().any(|ancestor| {
                    matches!(ancestor.value(), Node::Element(e) if HIDDEN_TAGS.contains(&e.name()))
                });
                if !hidden {
                    raw.push_str(text);
                }
            }
            Node::Element(element) if BLOCK_TAGS.contains(&element.name()) => raw.push('\n'),
            _ => {}
        }
    }

    normalize_lines(&raw)
}

/// 去掉每行两端空白，连续空行合并为一个
fn normalize_lines(raw: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in raw.lines().map(str::trim) {
        if line.is_empty() && lines.last().map_or(true, |last| last.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    lines.join("\n").trim().to_string()
}
