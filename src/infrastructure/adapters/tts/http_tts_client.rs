//! HTTP TTS Client - 调用外部 TTS HTTP 服务
//!
//! 实现 TtsEnginePort trait，通过 HTTP 调用外部 TTS 服务
//!
//! 外部 TTS API:
//! POST {base_url}/api/tts/synthesize
//! Request: {"text": "...", "voice": "en-US-BrianNeural", "pitch": "-10Hz"}  (JSON)
//! Response: audio/mpeg binary, 时长在 X-TTS-Duration-Ms header
//!
//! GET {base_url}/api/tts/voices
//! Response: [{"ShortName": "...", "Locale": "...", "Gender": "..."}]

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{
    SynthesisRequest, SynthesisResponse, TtsEnginePort, TtsError, VoiceInfo,
};

/// TTS 合成请求体 (JSON)
#[derive(Debug, Serialize)]
struct TtsHttpRequest<'a> {
    /// 要合成的文本
    text: &'a str,
    /// 音色短名
    voice: &'a str,
    /// 音高调整
    #[serde(skip_serializing_if = "Option::is_none")]
    pitch: Option<&'a str>,
}

/// 音色列表条目
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct VoiceEntry {
    short_name: String,
    locale: String,
    #[serde(default)]
    gender: Option<String>,
}

impl From<VoiceEntry> for VoiceInfo {
    fn from(entry: VoiceEntry) -> Self {
        Self {
            short_name: entry.short_name,
            locale: entry.locale,
            gender: entry.gender,
        }
    }
}

/// HTTP TTS 客户端配置
#[derive(Debug, Clone)]
pub struct HttpTtsClientConfig {
    /// TTS 服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 网络错误/超时的重试次数
    pub max_retries: u32,
    /// 重试间隔基数（毫秒），第 n 次重试等待 n 倍
    pub retry_backoff_ms: u64,
}

impl Default for HttpTtsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 120,
            max_retries: 0,
            retry_backoff_ms: 500,
        }
    }
}

impl HttpTtsClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_retries(mut self, max_retries: u32, backoff_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff_ms = backoff_ms;
        self
    }
}

/// HTTP TTS 客户端
///
/// 通过 HTTP 调用外部 TTS 服务
pub struct HttpTtsClient {
    client: Client,
    config: HttpTtsClientConfig,
}

impl HttpTtsClient {
    /// 创建新的 HTTP TTS 客户端
    pub fn new(config: HttpTtsClientConfig) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// 获取合成 URL
    fn synthesize_url(&self) -> String {
        format!("{}/api/tts/synthesize", self.base_url())
    }

    /// 获取音色列表 URL
    fn voices_url(&self) -> String {
        format!("{}/api/tts/voices", self.base_url())
    }

    /// 获取健康检查 URL
    fn health_url(&self) -> String {
        format!("{}/health", self.base_url())
    }

    async fn synthesize_once(
        &self,
        request: &SynthesisRequest,
    ) -> Result<SynthesisResponse, TtsError> {
        let http_request = TtsHttpRequest {
            text: &request.text,
            voice: &request.voice,
            pitch: request.pitch.as_deref(),
        };

        tracing::debug!(
            url = %self.synthesize_url(),
            text_len = http_request.text.len(),
            voice = %http_request.voice,
            pitch = ?http_request.pitch,
            "Sending TTS synthesize request"
        );

        let response = self
            .client
            .post(self.synthesize_url())
            .json(&http_request)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TtsError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let duration_ms = response
            .headers()
            .get("X-TTS-Duration-Ms")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());

        // 直接获取音频字节
        let audio_data = response
            .bytes()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Failed to read audio: {}", e)))?
            .to_vec();

        if audio_data.is_empty() {
            return Err(TtsError::InvalidResponse("Empty audio body".to_string()));
        }

        tracing::debug!(
            duration_ms = ?duration_ms,
            audio_size = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(SynthesisResponse {
            audio_data,
            duration_ms,
        })
    }
}

fn map_send_error(e: reqwest::Error) -> TtsError {
    if e.is_timeout() {
        TtsError::Timeout
    } else if e.is_connect() {
        TtsError::NetworkError(format!("Cannot connect to TTS service: {}", e))
    } else {
        TtsError::NetworkError(e.to_string())
    }
}

#[async_trait]
impl TtsEnginePort for HttpTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsError> {
        let mut attempt = 0;
        loop {
            match self.synthesize_once(&request).await {
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let backoff = Duration::from_millis(self.config.retry_backoff_ms * attempt as u64);
                    tracing::warn!(
                        attempt,
                        max_retries = self.config.max_retries,
                        error = %e,
                        "TTS request failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
                result => return result,
            }
        }
    }

    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, TtsError> {
        let response = self
            .client
            .get(self.voices_url())
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TtsError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let entries: Vec<VoiceEntry> = response
            .json()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Invalid voice list: {}", e)))?;

        Ok(entries.into_iter().map(VoiceInfo::from).collect())
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.health_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
