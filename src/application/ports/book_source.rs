//! Book Source Port - 电子书读取抽象

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

use crate::domain::book::{BookMetadata, CoverImage, DocumentItem};

/// 电子书读取错误
#[derive(Debug, Error)]
pub enum BookSourceError {
    #[error("Failed to open book {path}: {message}")]
    OpenError { path: String, message: String },

    #[error("Failed to read item {item}: {message}")]
    ReadError { item: String, message: String },

    #[error("Book contains no documents: {0}")]
    Empty(String),
}

/// 已加载的电子书
#[derive(Debug, Clone, Default)]
pub struct LoadedBook {
    pub metadata: BookMetadata,
    /// 按阅读顺序排列的条目
    pub items: Vec<DocumentItem>,
    pub cover: Option<CoverImage>,
}

/// Book Source Port
///
/// 打开电子书归档并按阅读顺序返回全部条目
#[async_trait]
pub trait BookSourcePort: Send + Sync {
    async fn load(&self, path: &Path) -> Result<LoadedBook, BookSourceError>;
}
