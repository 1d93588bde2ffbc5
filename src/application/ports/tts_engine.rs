//! TTS Engine Port - TTS 合成引擎抽象
//!
//! 定义 TTS 合成的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

/// TTS 错误
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl TtsError {
    /// 网络错误和超时可以重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, TtsError::NetworkError(_) | TtsError::Timeout)
    }
}

/// TTS 合成请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    /// 要合成的文本内容
    pub text: String,
    /// 音色短名，如 `en-US-BrianNeural`
    pub voice: String,
    /// 音高调整，如 `-10Hz`
    pub pitch: Option<String>,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>, voice: impl Into<String>, pitch: Option<String>) -> Self {
        Self {
            text: text.into(),
            voice: voice.into(),
            pitch,
        }
    }
}

/// TTS 合成响应
#[derive(Debug, Clone)]
pub struct SynthesisResponse {
    /// 编码后的音频数据（MP3）
    pub audio_data: Vec<u8>,
    /// 音频时长（毫秒）
    pub duration_ms: Option<u64>,
}

/// 音色信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceInfo {
    pub short_name: String,
    pub locale: String,
    pub gender: Option<String>,
}

/// TTS Engine Port
///
/// 外部 TTS 服务的抽象接口
#[async_trait]
pub trait TtsEnginePort: Send + Sync {
    /// 将文本合成为音频
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsError>;

    /// 列出服务支持的音色
    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, TtsError>;

    /// 检查 TTS 服务是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
