//! Speak Command Handlers

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::commands::SpeakText;
use crate::application::error::ApplicationError;
use crate::application::ports::{AudioStoragePort, SynthesisRequest, TtsEnginePort};

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// SpeakText 响应
#[derive(Debug, Clone)]
pub struct SpeakTextResponse {
    pub output_path: PathBuf,
    pub audio_size: usize,
    pub duration_ms: Option<u64>,
}

/// SpeakText Handler - 单个文本文件合成为单个音频
pub struct SpeakTextHandler {
    tts_engine: Arc<dyn TtsEnginePort>,
    storage: Arc<dyn AudioStoragePort>,
}

impl SpeakTextHandler {
    pub fn new(tts_engine: Arc<dyn TtsEnginePort>, storage: Arc<dyn AudioStoragePort>) -> Self {
        Self {
            tts_engine,
            storage,
        }
    }

    pub async fn handle(&self, cmd: SpeakText) -> Result<SpeakTextResponse, ApplicationError> {
        let bytes = self.storage.read(&cmd.input_path).await?;
        let text = String::from_utf8(bytes).map_err(|_| {
            ApplicationError::validation(format!(
                "Input is not valid UTF-8: {}",
                cmd.input_path.display()
            ))
        })?;
        let text = text.trim_start_matches(BYTE_ORDER_MARK);

        if text.trim().is_empty() {
            return Err(ApplicationError::validation(format!(
                "Input is empty: {}",
                cmd.input_path.display()
            )));
        }

        if let Some(parent) = cmd.output_path.parent() {
            self.storage.ensure_dir(parent).await?;
        }

        let request = SynthesisRequest::new(text, &cmd.voice, cmd.pitch.clone());
        let response = self.tts_engine.synthesize(request).await?;
        self.storage.save(&cmd.output_path, &response.audio_data).await?;

        tracing::info!(
            input = %cmd.input_path.display(),
            output = %cmd.output_path.display(),
            audio_size = response.audio_data.len(),
            "File saved"
        );

        Ok(SpeakTextResponse {
            output_path: cmd.output_path,
            audio_size: response.audio_data.len(),
            duration_ms: response.duration_ms,
        })
    }
}
