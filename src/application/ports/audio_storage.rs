//! Audio Storage Port - 出站端口
//!
//! 定义音频文件写入的抽象接口，路径由调用方预先计算

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// 音频存储错误
#[derive(Debug, Error)]
pub enum AudioStorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Audio Storage Port - 出站端口
#[async_trait]
pub trait AudioStoragePort: Send + Sync {
    /// 确保输出目录存在
    async fn ensure_dir(&self, dir: &Path) -> Result<(), AudioStorageError>;

    /// 将数据写入指定路径（覆盖已有文件）
    async fn save(&self, path: &Path, data: &[u8]) -> Result<(), AudioStorageError>;

    /// 读取文件
    async fn read(&self, path: &Path) -> Result<Vec<u8>, AudioStorageError>;

    /// 文件是否存在
    async fn exists(&self, path: &Path) -> bool;
}
