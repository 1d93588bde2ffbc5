//! ID3 Tagger - 基于 id3 crate 的 MP3 标签写入
//!
//! 读取已有标签（没有则新建），覆盖 artist/album/title/track 和封面后以 ID3v2.4 写回。

use async_trait::async_trait;
use id3::frame::{Picture, PictureType};
use id3::{ErrorKind, Tag, TagLike, Version};
use std::path::Path;

use crate::application::ports::{AudioTaggerPort, TagRequest, TaggingError};

/// ID3 标签写入器
#[derive(Debug, Clone, Default)]
pub struct Id3Tagger;

impl Id3Tagger {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AudioTaggerPort for Id3Tagger {
    async fn tag(&self, request: &TagRequest) -> Result<(), TaggingError> {
        let request = request.clone();
        let path = request.path.display().to_string();

        tokio::task::spawn_blocking(move || write_tags(&request))
            .await
            .map_err(|e| TaggingError::WriteError {
                path,
                message: e.to_string(),
            })?
    }
}

fn write_tags(request: &TagRequest) -> Result<(), TaggingError> {
    let path = request.path.display().to_string();

    let mut tag = match Tag::read_from_path(&request.path) {
        Ok(tag) => tag,
        Err(e) if matches!(e.kind, ErrorKind::NoTag) => Tag::new(),
        Err(e) => {
            return Err(TaggingError::ReadError {
                path,
                message: e.to_string(),
            })
        }
    };

    tag.set_artist(request.author.as_str());
    tag.set_album(request.book_title.as_str());
    tag.set_title(request.chapter_title.as_str());
    if let Some(track) = request.track_number {
        tag.set_track(track);
    }

    if let Some(cover_path) = &request.cover_image {
        let data = std::fs::read(cover_path).map_err(|e| TaggingError::CoverError {
            path: cover_path.display().to_string(),
            message: e.to_string(),
        })?;
        tag.remove_picture_by_type(PictureType::CoverFront);
        tag.add_frame(Picture {
            mime_type: cover_mime_type(cover_path).to_string(),
            picture_type: PictureType::CoverFront,
            description: "Cover".to_string(),
            data,
        });
    }

    tag.write_to_path(&request.path, Version::Id3v24)
        .map_err(|e| TaggingError::WriteError {
            path: path.clone(),
            message: e.to_string(),
        })?;

    tracing::debug!(
        path = %path,
        track = ?request.track_number,
        title = %request.chapter_title,
        "Tags written"
    );

    Ok(())
}

fn cover_mime_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("png") => "image/png",
        _ => "image/jpeg",
    }
}
