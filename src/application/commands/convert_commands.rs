//! Convert Commands

use std::path::PathBuf;

use crate::domain::ExtractorConfig;

/// 将电子书转换为逐章音频的命令
#[derive(Debug, Clone)]
pub struct ConvertBook {
    pub book_path: PathBuf,
    pub output_dir: PathBuf,
    pub extractor: ExtractorConfig,
    pub voice: String,
    pub pitch: Option<String>,
    /// 同时进行的合成任务上限
    pub max_concurrent: usize,
    /// 已存在的输出文件不再合成
    pub skip_existing: bool,
    /// None 表示不写入标签
    pub tagging: Option<TagOptions>,
}

/// 标签选项，未指定的字段取自电子书元数据
#[derive(Debug, Clone, Default)]
pub struct TagOptions {
    pub author: Option<String>,
    pub book_title: Option<String>,
    pub cover_image: Option<PathBuf>,
}
