//! Tagging Adapter - ID3 标签写入

mod id3_tagger;

pub use id3_tagger::Id3Tagger;
