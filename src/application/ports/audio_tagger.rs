//! Audio Tagger Port - 音频元数据标签抽象

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// 标签写入错误
#[derive(Debug, Error)]
pub enum TaggingError {
    #[error("Failed to read tags from {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to write tags to {path}: {message}")]
    WriteError { path: String, message: String },

    #[error("Failed to read cover image {path}: {message}")]
    CoverError { path: String, message: String },
}

/// 标签请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRequest {
    pub path: PathBuf,
    /// 写入 artist
    pub author: String,
    /// 写入 album
    pub book_title: String,
    /// 写入 title
    pub chapter_title: String,
    pub track_number: Option<u32>,
    pub cover_image: Option<PathBuf>,
}

/// Audio Tagger Port
#[async_trait]
pub trait AudioTaggerPort: Send + Sync {
    /// 写入（或覆盖）音频文件的元数据
    async fn tag(&self, request: &TagRequest) -> Result<(), TaggingError>;
}
