//! EPUB Book Source - 基于 epub crate 的电子书读取
//!
//! 按 spine 阅读顺序读出全部条目，同时读取标题/作者元数据和封面。

use async_trait::async_trait;
use ::epub::doc::EpubDoc;
use std::path::Path;

use crate::application::ports::{BookSourceError, BookSourcePort, LoadedBook};
use crate::domain::book::{BookMetadata, CoverImage, DocumentItem};

/// EPUB 电子书读取器
#[derive(Debug, Clone, Default)]
pub struct EpubBookSource;

impl EpubBookSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BookSourcePort for EpubBookSource {
    async fn load(&self, path: &Path) -> Result<LoadedBook, BookSourceError> {
        let path = path.to_path_buf();
        let path_str = path.display().to_string();

        // epub crate 为同步 IO
        let book = tokio::task::spawn_blocking(move || read_epub(&path))
            .await
            .map_err(|e| BookSourceError::OpenError {
                path: path_str.clone(),
                message: e.to_string(),
            })??;

        if book.items.is_empty() {
            return Err(BookSourceError::Empty(path_str));
        }

        tracing::info!(
            path = %path_str,
            items = book.items.len(),
            title = ?book.metadata.title,
            has_cover = book.cover.is_some(),
            "Book loaded"
        );

        Ok(book)
    }
}

fn read_epub(path: &Path) -> Result<LoadedBook, BookSourceError> {
    let mut doc = EpubDoc::new(path).map_err(|e| BookSourceError::OpenError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let metadata = BookMetadata {
        title: non_empty(doc.mdata("title").map(|m| m.value.clone())),
        author: non_empty(doc.mdata("creator").map(|m| m.value.clone())),
    };

    let root_base = doc.root_base.clone();
    let spine: Vec<String> = doc.spine.iter().map(|item| item.idref.clone()).collect();

    let mut items = Vec::with_capacity(spine.len());
    for id in spine {
        let Some(resource) = doc.resources.get(&id) else {
            tracing::warn!(id = %id, "Spine entry missing from manifest, skipping");
            continue;
        };
        let name = item_name(&resource.path, &root_base);
        let media_type = resource.mime.clone();

        let (content, _mime) = doc
            .get_resource(&id)
            .ok_or_else(|| BookSourceError::ReadError {
                item: name.clone(),
                message: "resource not found in archive".to_string(),
            })?;

        items.push(DocumentItem::new(name, media_type, content));
    }

    let cover = read_cover(&mut doc);

    Ok(LoadedBook {
        metadata,
        items,
        cover,
    })
}

/// 封面：先按 `properties="cover-image"` 查找，再回退到 `<meta name="cover">`
fn read_cover<R: std::io::Read + std::io::Seek>(doc: &mut EpubDoc<R>) -> Option<CoverImage> {
    let (data, media_type) = doc.get_cover().or_else(|| {
        let id = doc.mdata("cover").map(|m| m.value.clone())?;
        doc.get_resource(&id)
    })?;
    Some(CoverImage { data, media_type })
}

/// 条目名称：相对于 OPF 所在目录的路径，统一使用 `/`
fn item_name(resource_path: &Path, root_base: &Path) -> String {
    let relative = resource_path.strip_prefix(root_base).unwrap_or(resource_path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
