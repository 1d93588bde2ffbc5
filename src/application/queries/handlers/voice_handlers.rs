//! Voice Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{TtsEnginePort, VoiceInfo};
use crate::application::queries::ListVoices;

/// ListVoices Handler - 按区域过滤并排序
pub struct ListVoicesHandler {
    tts_engine: Arc<dyn TtsEnginePort>,
}

impl ListVoicesHandler {
    pub fn new(tts_engine: Arc<dyn TtsEnginePort>) -> Self {
        Self { tts_engine }
    }

    pub async fn handle(&self, query: ListVoices) -> Result<Vec<VoiceInfo>, ApplicationError> {
        let voices = self.tts_engine.list_voices().await?;
        let total = voices.len();

        let mut voices: Vec<VoiceInfo> = voices
            .into_iter()
            .filter(|voice| {
                query.locales.is_empty()
                    || query
                        .locales
                        .iter()
                        .any(|locale| locale.eq_ignore_ascii_case(&voice.locale))
            })
            .collect();
        voices.sort_by(|a, b| a.short_name.cmp(&b.short_name));

        tracing::debug!(total, matched = voices.len(), locales = ?query.locales, "Voices listed");

        Ok(voices)
    }
}
