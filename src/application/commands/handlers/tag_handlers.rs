//! Tag Command Handlers

use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use crate::application::commands::TagDirectory;
use crate::application::error::ApplicationError;
use crate::application::ports::{AudioTaggerPort, TagRequest};
use crate::domain::output_naming::{parse_track_stem, AUDIO_EXTENSION};

/// 批量标签结果
#[derive(Debug, Clone, Default)]
pub struct TagDirectoryReport {
    pub tagged: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

/// TagDirectory Handler - 递归为目录下的 MP3 写入标签
pub struct TagDirectoryHandler {
    tagger: Arc<dyn AudioTaggerPort>,
}

impl TagDirectoryHandler {
    pub fn new(tagger: Arc<dyn AudioTaggerPort>) -> Self {
        Self { tagger }
    }

    pub async fn handle(&self, cmd: TagDirectory) -> Result<TagDirectoryReport, ApplicationError> {
        if !cmd.dir.is_dir() {
            return Err(ApplicationError::validation(format!(
                "Not a directory: {}",
                cmd.dir.display()
            )));
        }

        let dir = cmd.dir.clone();
        let files = tokio::task::spawn_blocking(move || find_audio_files(&dir))
            .await
            .map_err(|e| ApplicationError::internal(e.to_string()))?;

        tracing::info!(dir = %cmd.dir.display(), files = files.len(), "Tagging directory");

        let mut report = TagDirectoryReport::default();
        for path in files {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let (track_number, chapter_title) = parse_track_stem(&stem);

            let request = TagRequest {
                path: path.clone(),
                author: cmd.author.clone(),
                book_title: cmd.book_title.clone(),
                chapter_title,
                track_number,
                cover_image: cmd.cover_image.clone(),
            };

            match self.tagger.tag(&request).await {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), track = ?track_number, "Tagged");
                    report.tagged.push(path);
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Tagging failed");
                    report.failed.push((path, e.to_string()));
                }
            }
        }

        Ok(report)
    }
}

/// 递归查找 MP3 文件，按路径排序
fn find_audio_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .map_or(false, |ext| ext.eq_ignore_ascii_case(AUDIO_EXTENSION))
        })
        .collect();
    files.sort();
    files
}
