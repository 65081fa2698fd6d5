//! HTTP surface served to the browser client.
//!
//! Every failure is logged here and turned into one of a few fixed responses; internal error
//! detail never reaches the client.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use futures::StreamExt;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

use crate::audio::text_to_speech;
use crate::error::NarrationError;
use crate::game_state::GameContext;
use crate::history::ChatMessage;
use crate::imager::{DEFAULT_MEDIA_TIMEOUT, generate_character_portrait};
use crate::narrator::{NarrationStream, Narrator};

pub const NARRATION_FAILED: &str = "Failed to get DM narration";
pub const PORTRAIT_FAILED: &str = "Failed to generate portrait";
pub const SPEECH_FAILED: &str = "Failed to generate speech";
pub const ACTION_REQUIRED: &str = "Player action is required";
pub const TEXT_REQUIRED: &str = "Text is required";
pub const INVALID_REQUEST: &str = "Invalid request body";

// Appended to the body when the model fails after narration has started.
pub const INTERRUPTED_MARKER: &str = "\n[narration interrupted]";

#[derive(Clone)]
pub struct AppState {
    narrator: Arc<Narrator>,
    media_timeout: Duration,
}

impl AppState {
    pub fn new(narrator: Arc<Narrator>) -> Self {
        Self {
            narrator,
            media_timeout: DEFAULT_MEDIA_TIMEOUT,
        }
    }

    // Bound on each portrait or speech call.
    pub fn with_media_timeout(mut self, media_timeout: Duration) -> Self {
        self.media_timeout = media_timeout;
        self
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/dm/narrate", post(narrate_handler))
        .route("/api/dm/portrait", post(portrait_handler))
        .route("/api/dm/speech", post(speech_handler))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NarrateRequest {
    game_context: GameContext,
    #[serde(default)]
    history: Vec<ChatMessage>,
}

async fn narrate_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let value: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            log::error!("DM narration error: malformed body: {e}");
            return server_error(NARRATION_FAILED);
        }
    };

    // The action is checked before the rest of the body is validated.
    let action = value
        .get("playerAction")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    if action.is_empty() {
        return client_error(ACTION_REQUIRED);
    }

    let request: NarrateRequest = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(e) => {
            log::error!("DM narration error: invalid game context: {e}");
            return server_error(NARRATION_FAILED);
        }
    };

    let cancel = CancellationToken::new();
    match state
        .narrator
        .narrate_with_history(
            &request.game_context,
            request.history,
            &action,
            cancel.clone(),
        )
        .await
    {
        Ok(narration) => stream_response(narration, cancel),
        Err(e) => narration_error(e),
    }
}

// Relay fragments as they arrive. Dropping the body, e.g. when the client disconnects, cancels
// the narration and with it the upstream request.
fn stream_response(narration: NarrationStream, cancel: CancellationToken) -> Response {
    let guard = cancel.drop_guard();
    let body = narration.map(move |item| {
        let _guard = &guard;
        Ok::<_, Infallible>(match item {
            Ok(fragment) => Bytes::from(fragment),
            Err(e) => {
                log::warn!("DM narration ended early: {e}");
                Bytes::from_static(INTERRUPTED_MARKER.as_bytes())
            }
        })
    });

    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(body),
    )
        .into_response()
}

fn narration_error(error: NarrationError) -> Response {
    if error.is_client_error() {
        return client_error(ACTION_REQUIRED);
    }
    log::error!("DM narration error: {error:#?}");
    server_error(NARRATION_FAILED)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PortraitRequest {
    character_name: String,
    character_type: String,
    #[serde(default)]
    appearance: String,
}

async fn portrait_handler(
    State(state): State<AppState>,
    payload: Result<Json<PortraitRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected_body("Portrait", rejection),
    };

    match generate_character_portrait(
        state.narrator.provider().as_ref(),
        state.media_timeout,
        &request.character_name,
        &request.character_type,
        &request.appearance,
    )
    .await
    {
        Ok(url) => Json(json!({ "url": url })).into_response(),
        Err(e) => {
            log::error!("Portrait generation error: {e:#?}");
            server_error(PORTRAIT_FAILED)
        }
    }
}

#[derive(Deserialize)]
struct SpeechRequest {
    #[serde(default)]
    text: String,
}

async fn speech_handler(
    State(state): State<AppState>,
    payload: Result<Json<SpeechRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected_body("Speech", rejection),
    };
    if request.text.trim().is_empty() {
        return client_error(TEXT_REQUIRED);
    }

    match text_to_speech(
        state.narrator.provider().as_ref(),
        state.media_timeout,
        &request.text,
    )
    .await
    {
        Ok(audio) => ([(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response(),
        Err(e) => {
            log::error!("Speech generation error: {e:#?}");
            server_error(SPEECH_FAILED)
        }
    }
}

fn client_error(message: &'static str) -> Response {
    (StatusCode::BAD_REQUEST, message).into_response()
}

fn rejected_body(endpoint: &str, rejection: JsonRejection) -> Response {
    log::warn!("{endpoint} request rejected: {}", rejection.body_text());
    client_error(INVALID_REQUEST)
}

fn server_error(message: &'static str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}
