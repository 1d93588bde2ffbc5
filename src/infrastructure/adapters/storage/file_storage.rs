//! File Storage - 文件系统音频存储实现
//!
//! 实现 AudioStoragePort trait

use async_trait::async_trait;
use std::path::Path;
use tokio::fs;

use crate::application::ports::{AudioStorageError, AudioStoragePort};

/// 文件系统音频存储
#[derive(Debug, Clone, Default)]
pub struct FileAudioStorage;

impl FileAudioStorage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AudioStoragePort for FileAudioStorage {
    async fn ensure_dir(&self, dir: &Path) -> Result<(), AudioStorageError> {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| AudioStorageError::IoError(format!("{}: {}", dir.display(), e)))
    }

    async fn save(&self, path: &Path, data: &[u8]) -> Result<(), AudioStorageError> {
        fs::write(path, data)
            .await
            .map_err(|e| AudioStorageError::IoError(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(path = %path.display(), size = data.len(), "Saved file");

        Ok(())
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>, AudioStorageError> {
        match fs::read(path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(
                AudioStorageError::FileNotFound(path.to_string_lossy().to_string()),
            ),
            Err(e) => Err(AudioStorageError::IoError(format!(
                "{}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }
}
