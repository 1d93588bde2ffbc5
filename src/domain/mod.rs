//! Domain Layer - 领域层
//!
//! - Book Context: 文档条目、章节记录、排除集合
//! - 章节提取器
//! - 输出文件命名

pub mod book;
pub mod output_naming;

mod chapter_extractor;

pub use chapter_extractor::{
    extract_chapters, is_title_case, parse_structured_title, ExtractorConfig,
};
pub use output_naming::{output_path, output_paths, parse_track_stem, sanitize_title};
