//! Memory Layer - In-Memory Book Source
//!
//! 测试用的内存电子书源

mod book_source;

pub use book_source::InMemoryBookSource;
