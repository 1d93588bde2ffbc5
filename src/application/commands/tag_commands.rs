//! Tag Commands

use std::path::PathBuf;

/// 为目录下所有 MP3 写入标签的命令
///
/// 音轨号和章节标题从 `004. Title.mp3` 形式的文件名解析
#[derive(Debug, Clone)]
pub struct TagDirectory {
    pub dir: PathBuf,
    pub author: String,
    pub book_title: String,
    pub cover_image: Option<PathBuf>,
}
