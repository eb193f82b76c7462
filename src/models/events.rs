//! Incoming Event DTOs
//!
//! Slack Events API payloads delivered to the webhook: the one-time URL
//! verification handshake and message event callbacks.

use serde::Deserialize;

/// Top-level webhook payload, discriminated by its `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    /// Endpoint ownership handshake; the challenge must be echoed back.
    UrlVerification { challenge: String },
    /// A subscribed event wrapped in its callback envelope.
    EventCallback { event: MessageEvent },
}

/// A channel message event.
///
/// Subtyped messages (edits, joins) and messages from other bots carry
/// `subtype`/`bot_id` and are ignored by the dispatcher.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageEvent {
    /// Event kind; only `"message"` is dispatched
    #[serde(rename = "type")]
    pub kind: String,
    /// Message subtype, absent for plain user messages
    #[serde(default)]
    pub subtype: Option<String>,
    /// Set when the sender is a bot
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub channel: String,
}

impl MessageEvent {
    /// Returns true for a plain user-authored channel message.
    pub fn is_user_message(&self) -> bool {
        self.kind == "message" && self.subtype.is_none() && self.bot_id.is_none()
    }
}
