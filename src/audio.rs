use std::time::Duration;

use async_openai::types::{CreateSpeechRequest, CreateSpeechRequestArgs, SpeechModel, Voice};

use crate::error::MediaError;
use crate::provider::ModelProvider;

pub const NARRATION_SPEED: f32 = 0.95; // Slightly slower for dramatic effect.

// Deep, dramatic voice for the Dungeon Master.
pub fn speech_request(text: &str) -> Result<CreateSpeechRequest, MediaError> {
    Ok(CreateSpeechRequestArgs::default()
        .input(text)
        .voice(Voice::Onyx)
        .model(SpeechModel::Tts1)
        .speed(NARRATION_SPEED)
        .build()?)
}

pub async fn text_to_speech(
    provider: &dyn ModelProvider,
    wait: Duration,
    text: &str,
) -> Result<Vec<u8>, MediaError> {
    if text.trim().is_empty() {
        return Err(MediaError::EmptyText);
    }

    let audio = tokio::time::timeout(wait, provider.speech(speech_request(text)?))
        .await
        .map_err(|_| MediaError::Timeout)??;
    log::debug!("Generated {} bytes of narration audio", audio.len());
    Ok(audio)
}
