//! API Handlers
//!
//! HTTP request handlers for the webhook and operational endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, warn};

use crate::bot::{parse_mention, respond, ChatClient};
use crate::error::Result;
use crate::models::{ChallengeResponse, EventPayload, HealthResponse, MessageEvent, StatsResponse};
use crate::pool::PoolManager;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The meme pool core
    pub manager: Arc<PoolManager>,
    /// Outbound chat boundary
    pub chat: Arc<dyn ChatClient>,
    /// Bot user id for mention matching
    pub bot_id: String,
}

impl AppState {
    /// Creates a new AppState over the wired collaborators.
    pub fn new(manager: Arc<PoolManager>, chat: Arc<dyn ChatClient>, bot_id: impl Into<String>) -> Self {
        Self {
            manager,
            chat,
            bot_id: bot_id.into(),
        }
    }
}

/// Handler for POST /slack/events
///
/// Answers the URL verification handshake with its challenge, and
/// dispatches plain user messages that mention the bot. The webhook
/// always acknowledges with 200 once the payload parses; reply delivery
/// failures are logged, not surfaced, so the platform does not retry a
/// dispense that already shrank the pool.
pub async fn events_handler(
    State(state): State<AppState>,
    Json(payload): Json<EventPayload>,
) -> Response {
    match payload {
        EventPayload::UrlVerification { challenge } => {
            info!("answering url verification challenge");
            Json(ChallengeResponse::new(challenge)).into_response()
        }
        EventPayload::EventCallback { event } => {
            handle_message(&state, event).await;
            StatusCode::OK.into_response()
        }
    }
}

/// Dispatches one message event: mention check, keyword match, reply.
async fn handle_message(state: &AppState, event: MessageEvent) {
    if !event.is_user_message() {
        return;
    }

    let Some(command) = parse_mention(&event.text, &state.bot_id) else {
        return;
    };

    let reply = respond(&state.manager, &command).await;

    if let Err(e) = state.chat.post_message(&event.channel, &reply).await {
        warn!(channel = %event.channel, error = %e, "failed to post reply");
    }
}

/// Handler for GET /stats
///
/// Reports how many items remain in the stored pool.
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let remaining = state.manager.remaining().await?;
    Ok(Json(StatsResponse::new(remaining)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
