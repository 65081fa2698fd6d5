// The hosted model provider seam: everything that crosses the network goes through here.
use std::time::Duration;

use async_openai::{
    Client,
    config::OpenAIConfig,
    error::OpenAIError,
    types::{CreateChatCompletionRequest, CreateImageRequest, CreateSpeechRequest, Image},
};
use async_trait::async_trait;
use futures::{StreamExt, future, stream::BoxStream};

use crate::error::AppError;
use crate::settings::Settings;

/// Ordered text deltas of one streamed chat completion.
pub type TextStream = BoxStream<'static, Result<String, OpenAIError>>;

/// A hosted model provider.
///
/// `stream_chat` may fail either when called or on the first streamed item, since some clients
/// only contact the server once the stream is polled. Callers must treat both the same way.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn stream_chat(
        &self,
        request: CreateChatCompletionRequest,
    ) -> Result<TextStream, OpenAIError>;

    // Returns the URLs of the generated images.
    async fn generate_image(&self, request: CreateImageRequest) -> Result<Vec<String>, OpenAIError>;

    // Returns the encoded audio bytes.
    async fn speech(&self, request: CreateSpeechRequest) -> Result<Vec<u8>, OpenAIError>;
}

pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
}

impl OpenAiProvider {
    pub fn new(settings: &Settings) -> Result<Self, AppError> {
        let api_key = settings
            .openai_api_key
            .clone()
            .ok_or(AppError::MissingApiKey)?;

        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .build()?;

        let openai_config = OpenAIConfig::new().with_api_key(api_key);
        let client = Client::with_config(openai_config).with_http_client(http_client);

        Ok(Self { client })
    }

    pub fn from_client(client: Client<OpenAIConfig>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    async fn stream_chat(
        &self,
        request: CreateChatCompletionRequest,
    ) -> Result<TextStream, OpenAIError> {
        let stream = self.client.chat().create_stream(request).await?;

        // One chunk may carry several choices; only the text deltas matter here.
        let deltas = stream.filter_map(|chunk| {
            future::ready(match chunk {
                Ok(response) => {
                    let text: String = response
                        .choices
                        .iter()
                        .filter_map(|choice| choice.delta.content.as_deref())
                        .collect();
                    (!text.is_empty()).then_some(Ok(text))
                }
                Err(e) => Some(Err(e)),
            })
        });

        Ok(deltas.boxed())
    }

    async fn generate_image(&self, request: CreateImageRequest) -> Result<Vec<String>, OpenAIError> {
        let response = self.client.images().create(request).await?;

        Ok(response
            .data
            .iter()
            .filter_map(|image| match image.as_ref() {
                Image::Url { url, .. } => Some(url.clone()),
                _ => None,
            })
            .collect())
    }

    async fn speech(&self, request: CreateSpeechRequest) -> Result<Vec<u8>, OpenAIError> {
        let response = self.client.audio().speech(request).await?;
        Ok(response.bytes.to_vec())
    }
}
