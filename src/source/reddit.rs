//! Reddit Source
//!
//! ContentSource implementation over Reddit's public JSON listing API:
//! `GET https://www.reddit.com/r/{category}/top.json?t=week&limit=N`.

use async_trait::async_trait;
use serde::Deserialize;

use super::{Candidate, ContentSource};

const USER_AGENT: &str = "memebot/0.1";

// == Listing DTOs ==
// Only the fields the pool cares about; everything else in the listing
// payload is ignored.
#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    id: String,
    title: String,
    /// Self posts have no outbound link; the empty default gets rejected
    /// by the validator downstream.
    #[serde(default)]
    url: String,
}

// == Reddit Source ==
/// Fetches top-of-week posts for a subreddit.
pub struct RedditSource {
    client: reqwest::Client,
    base_url: String,
}

impl RedditSource {
    /// Creates a source over the shared HTTP client.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: "https://www.reddit.com".to_string(),
        }
    }
}

#[async_trait]
impl ContentSource for RedditSource {
    async fn list_top(&self, category: &str, limit: u32) -> anyhow::Result<Vec<Candidate>> {
        let url = format!(
            "{}/r/{}/top.json?t=week&limit={}",
            self.base_url, category, limit
        );

        let listing: Listing = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(listing
            .data
            .children
            .into_iter()
            .map(|child| Candidate {
                id: child.data.id,
                title: child.data.title,
                url: child.data.url,
            })
            .collect())
    }
}
