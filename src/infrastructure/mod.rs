//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod adapters;
#[cfg(test)]
pub mod memory;

pub use adapters::{EpubBookSource, FakeTtsClient, FileAudioStorage, HttpTtsClient, Id3Tagger};
#[cfg(test)]
pub use memory::InMemoryBookSource;
