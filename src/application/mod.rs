//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（TtsEngine、BookSource、AudioTagger、AudioStorage）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Convert commands
    ConvertBook,
    TagOptions,
    // Tag commands
    TagDirectory,
    // Speak commands
    SpeakText,
    // Handlers
    handlers::{
        ConversionReport, ConvertBookHandler, FailedChapter, SpeakTextHandler, SpeakTextResponse,
        TagDirectoryHandler, TagDirectoryReport,
    },
};

pub use error::ApplicationError;

pub use ports::{
    // Audio storage
    AudioStorageError,
    AudioStoragePort,
    // Audio tagger
    AudioTaggerPort,
    TagRequest,
    TaggingError,
    // Book source
    BookSourceError,
    BookSourcePort,
    LoadedBook,
    // TTS engine
    SynthesisRequest,
    SynthesisResponse,
    TtsEnginePort,
    TtsError,
    VoiceInfo,
};

pub use queries::{
    // Book queries
    ListChapters,
    // Voice queries
    ListVoices,
    // Handlers
    handlers::{ChapterSummary, ListChaptersHandler, ListChaptersResponse, ListVoicesHandler},
};
