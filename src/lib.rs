//! Audiobooker - EPUB 有声书生成
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Book Context: 文档条目、章节记录、排除集合、标题策略
//! - 章节提取与输出文件命名（纯函数）
//!
//! 应用层 (application/):
//! - Ports: TtsEngine, BookSource, AudioTagger, AudioStorage
//! - Commands: ConvertBook, TagDirectory, SpeakText
//! - Queries: ListChapters, ListVoices
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: EPUB 读取, HTTP/Fake TTS Client, ID3 标签, 文件存储
//! - Memory: 内存电子书源

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
