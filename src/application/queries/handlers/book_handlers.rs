//! Book Query Handlers

use serde::Serialize;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::BookSourcePort;
use crate::application::queries::ListChapters;
use crate::domain::book::{BookMetadata, ChapterRecord};
use crate::domain::extract_chapters;

// ============================================================================
// Response DTOs
// ============================================================================

/// 章节摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterSummary {
    pub chapter_number: u32,
    pub title: String,
    pub char_count: usize,
    pub word_count: usize,
}

impl From<&ChapterRecord> for ChapterSummary {
    fn from(record: &ChapterRecord) -> Self {
        Self {
            chapter_number: record.chapter_number(),
            title: record.title().to_string(),
            char_count: record.char_count(),
            word_count: record.word_count(),
        }
    }
}

/// 章节列表响应
#[derive(Debug, Clone)]
pub struct ListChaptersResponse {
    pub metadata: BookMetadata,
    /// 归档中的条目总数（含非文本条目）
    pub item_count: usize,
    pub chapters: Vec<ChapterRecord>,
}

impl ListChaptersResponse {
    pub fn summaries(&self) -> Vec<ChapterSummary> {
        self.chapters.iter().map(ChapterSummary::from).collect()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// ListChapters Handler
pub struct ListChaptersHandler {
    book_source: Arc<dyn BookSourcePort>,
}

impl ListChaptersHandler {
    pub fn new(book_source: Arc<dyn BookSourcePort>) -> Self {
        Self { book_source }
    }

    pub async fn handle(&self, query: ListChapters) -> Result<ListChaptersResponse, ApplicationError> {
        let book = self.book_source.load(&query.book_path).await?;
        let chapters = extract_chapters(&book.items, &query.extractor);

        tracing::info!(
            book = %query.book_path.display(),
            items = book.items.len(),
            chapters = chapters.len(),
            policy = %query.extractor.policy,
            "Book chunked"
        );

        Ok(ListChaptersResponse {
            metadata: book.metadata,
            item_count: book.items.len(),
            chapters,
        })
    }
}
