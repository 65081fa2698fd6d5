//! The narration gateway: turns a game snapshot and a player action into a streamed narration.
//!
//! A request is opened eagerly, up to and including the first streamed fragment, so that failures
//! to reach the model are reported before the caller commits to a response. After that the
//! returned [`NarrationStream`] relays fragments one at a time as the caller polls it; dropping
//! the stream or cancelling its token stops the upstream request.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
};
use futures::{Stream, StreamExt, stream, stream::BoxStream};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::NarrationError;
use crate::game_state::GameContext;
use crate::history::{ChatMessage, DEFAULT_HISTORY_LIMIT, Role, prune_history};
use crate::prompt::render_system_prompt;
use crate::provider::{ModelProvider, TextStream};
use crate::settings::Settings;

pub const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";
pub const DEFAULT_TEMPERATURE: f32 = 0.8; // Favors varied storytelling over determinism.
pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct NarrationOptions {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub idle_timeout: Duration, // Longest wait for the next fragment, including the first.
    pub history_limit: usize,
}

impl Default for NarrationOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl From<&Settings> for NarrationOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            idle_timeout: Duration::from_secs(settings.idle_timeout_secs),
            history_limit: settings.history_limit,
        }
    }
}

pub struct Narrator {
    provider: Arc<dyn ModelProvider>,
    options: NarrationOptions,
}

impl Narrator {
    pub fn new(provider: Arc<dyn ModelProvider>, options: NarrationOptions) -> Self {
        Self { provider, options }
    }

    pub fn provider(&self) -> &Arc<dyn ModelProvider> {
        &self.provider
    }

    pub fn options(&self) -> &NarrationOptions {
        &self.options
    }

    /// Narrate one player action. The request carries exactly two messages: the rendered system
    /// prompt and the action as the user message.
    pub async fn narrate(
        &self,
        context: &GameContext,
        action: &str,
        cancel: CancellationToken,
    ) -> Result<NarrationStream, NarrationError> {
        self.narrate_with_history(context, Vec::new(), action, cancel)
            .await
    }

    /// Narrate one player action after earlier turns of the conversation.
    ///
    /// The history is pruned to the configured limit and its system messages are dropped, since
    /// the rendered game prompt takes their place.
    pub async fn narrate_with_history(
        &self,
        context: &GameContext,
        history: Vec<ChatMessage>,
        action: &str,
        cancel: CancellationToken,
    ) -> Result<NarrationStream, NarrationError> {
        if action.is_empty() {
            return Err(NarrationError::ClientInput);
        }

        let history = prune_history(history, self.options.history_limit);
        let request = self.chat_request(context, &history, action)?;
        let request_id = Uuid::new_v4();

        log::info!(
            "[{request_id}] Narrating for campaign '{}' at '{}' ({} history messages)",
            context.campaign.name,
            context.location,
            history.iter().filter(|m| !m.is_system()).count()
        );

        let (upstream, first) = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::info!("[{request_id}] Cancelled before the narration started");
                return Err(NarrationError::Cancelled);
            }
            opened = self.open(request) => opened.inspect_err(|e| {
                log::error!("[{request_id}] Failed to start narration: {e:#?}");
            })?,
        };

        Ok(NarrationStream::relay(Relay {
            upstream,
            pending: first,
            cancel,
            idle_timeout: self.options.idle_timeout,
            request_id,
            delivered: 0,
            finished: false,
        }))
    }

    // Build the chat-completion request for a snapshot, prior turns, and the new action.
    #[allow(deprecated)]
    pub fn chat_request(
        &self,
        context: &GameContext,
        history: &[ChatMessage],
        action: &str,
    ) -> Result<CreateChatCompletionRequest, NarrationError> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(history.len() + 2);

        messages.push(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(render_system_prompt(context))
                .build()?
                .into(),
        );

        for message in history.iter().filter(|m| !m.is_system()) {
            messages.push(match message.role {
                Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                    .content(message.content.clone())
                    .build()?
                    .into(),
                _ => ChatCompletionRequestUserMessageArgs::default()
                    .content(message.content.clone())
                    .build()?
                    .into(),
            });
        }

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(action.to_string())
                .build()?
                .into(),
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.options.model)
            .messages(messages)
            .stream(true)
            .temperature(self.options.temperature)
            .max_tokens(self.options.max_tokens)
            .build()?;

        Ok(request)
    }

    // Issue the request and wait for the first fragment, so connection and auth failures surface
    // here rather than mid-stream.
    async fn open(
        &self,
        request: CreateChatCompletionRequest,
    ) -> Result<(TextStream, Option<String>), NarrationError> {
        let mut upstream = self.provider.stream_chat(request).await?;

        let first = timeout(self.options.idle_timeout, upstream.next())
            .await
            .map_err(|_| NarrationError::Timeout)?;

        match first {
            Some(Ok(fragment)) => Ok((upstream, Some(fragment))),
            Some(Err(e)) => Err(NarrationError::UpstreamRequest(e)),
            None => Ok((upstream, None)),
        }
    }
}

// State carried between fragments of one narration.
struct Relay {
    upstream: TextStream,
    pending: Option<String>,
    cancel: CancellationToken,
    idle_timeout: Duration,
    request_id: Uuid,
    delivered: usize,
    finished: bool,
}

impl Relay {
    async fn next_fragment(&mut self) -> Option<Result<String, NarrationError>> {
        if self.finished {
            return None;
        }
        if let Some(fragment) = self.pending.take() {
            self.delivered += 1;
            return Some(Ok(fragment));
        }

        let next = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                log::info!(
                    "[{}] Narration cancelled after {} fragments",
                    self.request_id, self.delivered
                );
                self.finished = true;
                return None;
            }
            next = timeout(self.idle_timeout, self.upstream.next()) => next,
        };

        match next {
            Ok(Some(Ok(fragment))) => {
                self.delivered += 1;
                Some(Ok(fragment))
            }
            Ok(Some(Err(e))) => {
                log::error!(
                    "[{}] Narration interrupted after {} fragments: {e:#?}",
                    self.request_id,
                    self.delivered
                );
                self.finished = true;
                Some(Err(NarrationError::UpstreamStream(e.to_string())))
            }
            Ok(None) => {
                log::info!(
                    "[{}] Narration complete ({} fragments)",
                    self.request_id,
                    self.delivered
                );
                self.finished = true;
                None
            }
            Err(_) => {
                log::error!(
                    "[{}] No fragment within {:?}, giving up",
                    self.request_id,
                    self.idle_timeout
                );
                self.finished = true;
                Some(Err(NarrationError::UpstreamStream(
                    "idle timeout waiting for the next fragment".to_string(),
                )))
            }
        }
    }
}

/// The fragments of one narration, in arrival order.
///
/// Single use. Ends when the model finishes, after a single [`NarrationError::UpstreamStream`]
/// item if the upstream fails, or silently once its cancellation token fires.
pub struct NarrationStream {
    inner: BoxStream<'static, Result<String, NarrationError>>,
}

impl NarrationStream {
    fn relay(relay: Relay) -> Self {
        let inner = stream::unfold(relay, |mut relay| async move {
            let item = relay.next_fragment().await?;
            Some((item, relay))
        });
        Self {
            inner: inner.boxed(),
        }
    }
}

impl Stream for NarrationStream {
    type Item = Result<String, NarrationError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}
