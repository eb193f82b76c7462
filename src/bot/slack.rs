//! Slack Chat Client
//!
//! Posts replies back to a channel through the Slack Web API. The chat
//! platform stays behind the `ChatClient` trait so the dispatcher and the
//! webhook handlers can be exercised without a workspace.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

// == Chat Client ==
/// Outbound chat boundary: deliver one message to one channel.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn post_message(&self, channel: &str, text: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

// == Slack Web Client ==
/// ChatClient over `chat.postMessage` with a bearer token.
pub struct SlackWebClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl SlackWebClient {
    pub fn new(client: reqwest::Client, token: impl Into<String>) -> Self {
        Self {
            client,
            token: token.into(),
            base_url: "https://slack.com/api".to_string(),
        }
    }
}

#[async_trait]
impl ChatClient for SlackWebClient {
    async fn post_message(&self, channel: &str, text: &str) -> anyhow::Result<()> {
        let response: PostMessageResponse = self
            .client
            .post(format!("{}/chat.postMessage", self.base_url))
            .bearer_auth(&self.token)
            .json(&json!({
                "channel": channel,
                "text": text,
            }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !response.ok {
            anyhow::bail!(
                "chat.postMessage failed: {}",
                response.error.unwrap_or_else(|| "unknown".to_string())
            );
        }
        Ok(())
    }
}
