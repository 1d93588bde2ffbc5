//! Book Context - Entities

use serde::{Deserialize, Serialize};

/// 可作为章节正文的媒体类型
const DOCUMENT_MEDIA_TYPES: &[&str] = &["application/xhtml+xml", "text/html"];

/// 文档条目 - 电子书归档中的一个 HTML 单元
///
/// `name` 是条目相对于包文档的路径（例如 `Text/part0002.html`），
/// 在找不到标题时作为后备标题使用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentItem {
    name: String,
    media_type: String,
    content: Vec<u8>,
}

impl DocumentItem {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            content,
        }
    }

    /// 以 XHTML 文档构造（测试和内存书源常用）
    pub fn xhtml(name: impl Into<String>, markup: impl Into<String>) -> Self {
        Self::new(name, "application/xhtml+xml", markup.into().into_bytes())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// 是否为文本文档（样式表、图片等返回 false）
    pub fn is_document(&self) -> bool {
        let media_type = self
            .media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();
        DOCUMENT_MEDIA_TYPES
            .iter()
            .any(|t| t.eq_ignore_ascii_case(media_type))
    }

    /// 以 UTF-8 解码内容，非法字节被替换
    pub fn markup(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

/// 章节记录 - 最小音频生成单位
///
/// 不变量:
/// - 创建后不可变
/// - chapter_number 不保证唯一或连续
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRecord {
    chapter_number: u32,
    title: String,
    content: String,
}

impl ChapterRecord {
    pub fn new(chapter_number: u32, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            chapter_number,
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn chapter_number(&self) -> u32 {
        self.chapter_number
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

/// 书籍元数据（来自包文档的 dc:title / dc:creator）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
}

/// 封面图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    pub data: Vec<u8>,
    pub media_type: String,
}

impl CoverImage {
    /// 根据媒体类型选择封面文件扩展名
    pub fn extension(&self) -> &'static str {
        if self.media_type.eq_ignore_ascii_case("image/png") {
            "png"
        } else {
            "jpg"
        }
    }
}
