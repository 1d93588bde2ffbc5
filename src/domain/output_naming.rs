//! 输出文件命名
//!
//! 章节编号按总章节数补零，标题去掉常见文件系统的非法字符并限制长度。

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::book::ChapterRecord;

/// Windows 文件名中的非法字符
const INVALID_FILENAME_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// 标题最大字符数，超出则截断并追加省略号
pub const MAX_TITLE_CHARS: usize = 150;

const ELLIPSIS: &str = "...";

/// 输出音频扩展名
pub const AUDIO_EXTENSION: &str = "mp3";

/// 章节编号的补零宽度（总章节数的十进制位数）
pub fn padding_width(total_chapters: usize) -> usize {
    total_chapters.max(1).to_string().len()
}

/// 清理标题使其可用作文件名
pub fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !INVALID_FILENAME_CHARS.contains(c))
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.chars().count() > MAX_TITLE_CHARS {
        let keep = MAX_TITLE_CHARS - ELLIPSIS.len();
        let truncated: String = cleaned.chars().take(keep).collect();
        format!("{}{}", truncated, ELLIPSIS)
    } else {
        cleaned.to_string()
    }
}

/// 章节文件名，如 `07. Some Title.mp3`
pub fn chapter_file_name(chapter: &ChapterRecord, total_chapters: usize) -> String {
    format!(
        "{:0width$}. {}.{}",
        chapter.chapter_number(),
        sanitize_title(chapter.title()),
        AUDIO_EXTENSION,
        width = padding_width(total_chapters)
    )
}

/// 章节在输出目录中的路径
pub fn output_path(output_dir: &Path, chapter: &ChapterRecord, total_chapters: usize) -> PathBuf {
    output_dir.join(chapter_file_name(chapter, total_chapters))
}

/// 所有章节的输出路径，顺序与章节一致
///
/// 同一章节拆成多个文件时编号和标题可能相同，后出现的重名路径追加 ` (2)`、` (3)` 等后缀。
pub fn output_paths(output_dir: &Path, chapters: &[ChapterRecord]) -> Vec<PathBuf> {
    let total = chapters.len();
    let mut taken: HashSet<PathBuf> = HashSet::with_capacity(total);

    chapters
        .iter()
        .map(|chapter| {
            let path = output_path(output_dir, chapter, total);
            let path = if taken.contains(&path) {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                (2..)
                    .map(|n| output_dir.join(format!("{} ({}).{}", stem, n, AUDIO_EXTENSION)))
                    .find(|candidate| !taken.contains(candidate))
                    .unwrap_or(path)
            } else {
                path
            };
            taken.insert(path.clone());
            path
        })
        .collect()
}

/// 从 `004. Title` 形式的文件名（不含扩展名）解析音轨号和章节标题
///
/// 不以数字开头时音轨号为 None，标题为整个文件名。
pub fn parse_track_stem(stem: &str) -> (Option<u32>, String) {
    if !stem.starts_with(|c: char| c.is_ascii_digit()) {
        return (None, stem.to_string());
    }

    match stem.split_once('.') {
        Some((number, title)) => (number.trim().parse().ok(), title.trim().to_string()),
        None => (stem.trim().parse().ok(), String::new()),
    }
}
