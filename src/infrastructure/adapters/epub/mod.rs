//! EPUB Adapter - 电子书归档读取

mod epub_book_source;

pub use epub_book_source::EpubBookSource;
