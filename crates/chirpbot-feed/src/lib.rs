//! chirpbot-feed: Twitter-like timeline API client.
//!
//! The [`FeedApi`] trait is the seam the bot logic depends on; the HTTP
//! implementation lives in [`api`]. All network failures surface as
//! [`FeedError`] so callers can treat a poll cycle as a no-op.

pub mod api;
pub mod timestamp;

pub use api::HttpFeedApi;

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

use chirpbot_types::FeedItem;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("feed API rejected request: HTTP {0}")]
    Status(u16),
}

/// Client capability for the feed service.
#[async_trait]
pub trait FeedApi: Send + Sync {
    /// Posts from followed accounts, newest first.
    async fn fetch_timeline(&self) -> Result<Vec<FeedItem>, FeedError>;

    /// Account names the authenticated user currently follows.
    async fn fetch_following(&self) -> Result<HashSet<String>, FeedError>;

    /// Start following `name`.
    async fn add_follow(&self, name: &str) -> Result<(), FeedError>;

    /// Stop following `name`.
    async fn remove_follow(&self, name: &str) -> Result<(), FeedError>;
}
