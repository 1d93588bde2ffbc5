//! Book Queries

use std::path::PathBuf;

use crate::domain::ExtractorConfig;

/// 列出电子书章节查询
#[derive(Debug, Clone)]
pub struct ListChapters {
    pub book_path: PathBuf,
    pub extractor: ExtractorConfig,
}
