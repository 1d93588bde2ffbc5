//! Book Context - 电子书限界上下文
//!
//! 职责:
//! - 文档条目（归档内的 HTML 单元）
//! - 章节记录
//! - 过滤集合与标题策略

mod entities;
mod value_objects;

pub use entities::{BookMetadata, ChapterRecord, CoverImage, DocumentItem};
pub use value_objects::{FluffSet, TitlePolicy};
