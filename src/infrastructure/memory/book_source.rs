//! In-Memory Book Source Implementation

use async_trait::async_trait;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::ports::{BookSourceError, BookSourcePort, LoadedBook};

/// 内存电子书源，按路径返回预先放入的书
pub struct InMemoryBookSource {
    books: DashMap<PathBuf, LoadedBook>,
}

impl InMemoryBookSource {
    pub fn new() -> Self {
        Self {
            books: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn insert(&self, path: impl Into<PathBuf>, book: LoadedBook) {
        let path = path.into();
        tracing::debug!(path = %path.display(), items = book.items.len(), "Book registered");
        self.books.insert(path, book);
    }
}

impl Default for InMemoryBookSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookSourcePort for InMemoryBookSource {
    async fn load(&self, path: &Path) -> Result<LoadedBook, BookSourceError> {
        let book = self
            .books
            .get(path)
            .map(|b| b.clone())
            .ok_or_else(|| BookSourceError::OpenError {
                path: path.display().to_string(),
                message: "no such book".to_string(),
            })?;

        if book.items.is_empty() {
            return Err(BookSourceError::Empty(path.display().to_string()));
        }
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::DocumentItem;

    #[tokio::test]
    async fn test_load_registered_book() {
        let source = InMemoryBookSource::new();
        source.insert(
            "book.epub",
            LoadedBook {
                items: vec![DocumentItem::xhtml("a.xhtml", "<p>x</p>")],
                ..Default::default()
            },
        );

        let book = source.load(Path::new("book.epub")).await.unwrap();
        assert_eq!(book.items.len(), 1);
    }

    #[tokio::test]
    async fn test_load_unknown_and_empty() {
        let source = InMemoryBookSource::new();
        source.insert("empty.epub", LoadedBook::default());

        assert!(matches!(
            source.load(Path::new("other.epub")).await,
            Err(BookSourceError::OpenError { .. })
        ));
        assert!(matches!(
            source.load(Path::new("empty.epub")).await,
            Err(BookSourceError::Empty(_))
        ));
    }
}
