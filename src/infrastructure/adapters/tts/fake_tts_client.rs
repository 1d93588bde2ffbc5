//! Fake TTS Client - 离线 TTS 客户端
//!
//! 始终返回固定的音频数据，不实际调用 TTS 服务。
//! 用于测试和 `tts.fake_audio` 配置下的离线演练。

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::application::ports::{
    SynthesisRequest, SynthesisResponse, TtsEnginePort, TtsError, VoiceInfo,
};

/// Fake TTS Client
pub struct FakeTtsClient {
    /// 固定返回的音频数据
    audio_data: Vec<u8>,
    voices: Vec<VoiceInfo>,
    /// 模拟合成延迟
    latency: Duration,
    /// 文本包含该片段时返回错误
    fail_pattern: Option<String>,
    requests: Mutex<Vec<SynthesisRequest>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeTtsClient {
    pub fn new(audio_data: Vec<u8>) -> Self {
        Self {
            audio_data,
            voices: Vec::new(),
            latency: Duration::ZERO,
            fail_pattern: None,
            requests: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// 从文件读取固定返回的音频
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let audio_data = std::fs::read(path)?;
        tracing::info!(
            path = %path.display(),
            audio_size = audio_data.len(),
            "FakeTtsClient initialized"
        );
        Ok(Self::new(audio_data))
    }

    pub fn with_voices(mut self, voices: Vec<VoiceInfo>) -> Self {
        self.voices = voices;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn fail_when_text_contains(mut self, pattern: impl Into<String>) -> Self {
        self.fail_pattern = Some(pattern.into());
        self
    }

    /// 已收到的合成请求
    pub fn requests(&self) -> Vec<SynthesisRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// 观察到的最大并发请求数
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TtsEnginePort for FakeTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        tracing::debug!(
            text_len = request.text.len(),
            voice = %request.voice,
            "FakeTtsClient: returning fixed audio"
        );

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let failed = self
            .fail_pattern
            .as_deref()
            .map_or(false, |pattern| request.text.contains(pattern));

        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if failed {
            return Err(TtsError::ServiceError("simulated failure".to_string()));
        }

        Ok(SynthesisResponse {
            audio_data: self.audio_data.clone(),
            duration_ms: None,
        })
    }

    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, TtsError> {
        Ok(self.voices.clone())
    }
}
