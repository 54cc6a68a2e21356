//! Feed relay state machine.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use chirpbot_feed::{FeedApi, timestamp};

use crate::ChatSink;

/// Relays new timeline items into the chat channel, deduplicating with a
/// watermark: the creation time of the most recently relayed item.
///
/// The timeline is assumed sorted newest-first; scanning stops at the
/// first item not strictly newer than the watermark. An unsorted feed
/// would silently miss items behind the boundary — known limitation,
/// inherited from the feed contract.
pub struct FeedRelay<F, C> {
    api: Arc<F>,
    chat: Arc<C>,
    channel: String,
    watermark: DateTime<Utc>,
}

impl<F: FeedApi, C: ChatSink> FeedRelay<F, C> {
    /// Create a relay with the watermark set to now: only items posted
    /// after startup get relayed.
    pub fn new(api: Arc<F>, chat: Arc<C>, channel: String) -> Self {
        Self {
            api,
            chat,
            channel,
            watermark: Utc::now(),
        }
    }

    /// Run one poll cycle.
    ///
    /// A feed fetch failure is logged and skips the cycle; the watermark
    /// is untouched, so the missed items are picked up next time. Items
    /// are relayed in feed order (newest first) — callers must not assume
    /// chronological emission.
    pub async fn poll(&mut self) -> anyhow::Result<()> {
        let items = match self.api.fetch_timeline().await {
            Ok(items) => items,
            Err(e) => {
                warn!("Feed fetch failed, skipping cycle: {e}");
                return Ok(());
            }
        };
        debug!(items = items.len(), "Polled timeline");

        for item in &items {
            let Some(ts) = timestamp::parse_created_at(&item.created_at) else {
                continue;
            };
            if ts > self.watermark {
                info!(author = %item.author, "Relaying feed item");
                self.chat
                    .send(&self.channel, &format!("=^_^= {} {}", item.author, item.body))
                    .await?;
                self.watermark = ts;
            } else {
                // Sorted newest-first: nothing further can be newer.
                break;
            }
        }
        Ok(())
    }
}
