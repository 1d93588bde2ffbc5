//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_storage;
mod audio_tagger;
mod book_source;
mod tts_engine;

pub use audio_storage::{AudioStorageError, AudioStoragePort};
pub use audio_tagger::{AudioTaggerPort, TagRequest, TaggingError};
pub use book_source::{BookSourceError, BookSourcePort, LoadedBook};
pub use tts_engine::{SynthesisRequest, SynthesisResponse, TtsEnginePort, TtsError, VoiceInfo};
