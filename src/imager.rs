use std::time::Duration;

use async_openai::types::{
    CreateImageRequest, CreateImageRequestArgs, ImageModel, ImageQuality, ImageResponseFormat,
    ImageSize,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::error::MediaError;
use crate::game_state::Metadata;
use crate::provider::ModelProvider;

// Longest wait for one image or speech generation call.
pub const DEFAULT_MEDIA_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ImageKind {
    Character,
    Scene,
    Enemy,
    Item,
    Moment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerationRequest {
    #[serde(rename = "type")]
    pub kind: ImageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enemy_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub id: String,
    pub campaign_id: String,
    #[serde(rename = "type")]
    pub kind: ImageKind,
    pub prompt: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    pub generated_at: DateTime<Utc>,
}

pub fn portrait_prompt(character_name: &str, character_type: &str, appearance: &str) -> String {
    format!(
        "Portrait of {character_name}, a {character_type}. {appearance}. \
         D&D character portrait, fantasy art, digital painting, detailed, high quality, \
         dramatic lighting, heroic pose."
    )
}

// One standard-quality 1024x1024 DALL-E 3 image, returned as a hosted URL.
pub fn portrait_request(prompt: &str) -> Result<CreateImageRequest, MediaError> {
    Ok(CreateImageRequestArgs::default()
        .prompt(prompt)
        .model(ImageModel::DallE3)
        .n(1)
        .size(ImageSize::S1024x1024)
        .quality(ImageQuality::Standard)
        .response_format(ImageResponseFormat::Url)
        .build()?)
}

pub async fn generate_character_portrait(
    provider: &dyn ModelProvider,
    wait: Duration,
    character_name: &str,
    character_type: &str,
    appearance: &str,
) -> Result<String, MediaError> {
    let prompt = portrait_prompt(character_name, character_type, appearance);
    log::info!("Requesting portrait for {character_name}");

    let urls = tokio::time::timeout(wait, provider.generate_image(portrait_request(&prompt)?))
        .await
        .map_err(|_| MediaError::Timeout)??;
    urls.into_iter().next().ok_or(MediaError::NoImage)
}
