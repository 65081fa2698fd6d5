use thiserror::Error;

// Enum for handling application-level errors surfaced by the binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Narration error: {0}")]
    Narration(#[from] NarrationError), // Errors raised while narrating a player action.

    #[error("Media error: {0}")]
    Media(#[from] MediaError), // Errors from portrait or speech generation.

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error), // Errors related to settings (de)serialization.

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error), // Input/output errors, including socket binding.

    #[error("OpenAI API error: {0}")]
    OpenAI(#[from] async_openai::error::OpenAIError), // Errors from the hosted model API.

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error), // Errors while building the upstream HTTP client.

    #[error("Logger error: {0}")]
    Logger(#[from] log::SetLoggerError), // The global logger could not be installed.

    #[error("Missing OpenAI API key")]
    MissingApiKey,
}

/// Errors produced by the narration gateway.
///
/// Only [`NarrationError::ClientInput`] is the caller's fault; every other variant is an upstream
/// or transport failure and is reported to end users with a fixed generic message.
#[derive(Debug, Error)]
pub enum NarrationError {
    #[error("Player action is required")]
    ClientInput,

    // The hosted call could not be initiated: auth, network, malformed request.
    #[error("Upstream request failed: {0}")]
    UpstreamRequest(#[from] async_openai::error::OpenAIError),

    // The hosted call started streaming, then failed.
    #[error("Upstream stream interrupted: {0}")]
    UpstreamStream(String),

    #[error("Timeout occurred")]
    Timeout,

    #[error("Narration cancelled")]
    Cancelled,
}

impl NarrationError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, NarrationError::ClientInput)
    }
}

// Errors from the optional image and speech endpoints.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("OpenAI API error: {0}")]
    OpenAI(#[from] async_openai::error::OpenAIError),

    #[error("No image URLs received")]
    NoImage,

    #[error("Text for speech is empty")]
    EmptyText,

    #[error("Timeout occurred")]
    Timeout,
}
