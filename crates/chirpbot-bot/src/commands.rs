//! Chat command dispatcher: `follow <name>`, `unfollow <name>`, help.

use std::sync::Arc;

use tracing::{debug, info};

use chirpbot_feed::FeedApi;
use chirpbot_types::ChatEvent;

use crate::ChatSink;

const HELP_TEXT: &str = "=^_^= Hi! I'm Twitterbot! You can (follow <name>) \
     to make me follow a user or (unfollow <name>) to make me stop.";

/// Parses inbound chat messages and executes follow/unfollow commands.
pub struct CommandDispatcher<F, C> {
    api: Arc<F>,
    chat: Arc<C>,
    channel: String,
}

impl<F: FeedApi, C: ChatSink> CommandDispatcher<F, C> {
    pub fn new(api: Arc<F>, chat: Arc<C>, channel: String) -> Self {
        Self { api, chat, channel }
    }

    /// Dispatch one chat message.
    ///
    /// Whitespace-only input is a no-op; a recognized verb without its
    /// argument falls through to the help reply, like any unknown verb.
    pub async fn handle(&self, event: &ChatEvent) -> anyhow::Result<()> {
        let mut tokens = event.text.split_whitespace();
        let Some(verb) = tokens.next() else {
            return Ok(());
        };

        match (verb, tokens.next()) {
            ("follow", Some(name)) => self.follow(&event.sender, name).await,
            ("unfollow", Some(name)) => self.unfollow(&event.sender, name).await,
            _ => {
                debug!(sender = %event.sender, verb, "Unrecognized command");
                self.chat.send(&event.sender, HELP_TEXT).await
            }
        }
    }

    /// Start following `name`, unless already following.
    ///
    /// The following set is queried live on every command — never cached —
    /// so membership checks cannot go stale.
    async fn follow(&self, sender: &str, name: &str) -> anyhow::Result<()> {
        let following = self.api.fetch_following().await?;
        debug!(count = following.len(), "Fetched current following set");

        if following.contains(name) {
            self.chat
                .send(sender, &format!("=O_o= I'm already following {name}."))
                .await
        } else {
            self.api.add_follow(name).await?;
            info!(name, sender, "Now following");
            self.chat
                .send(sender, &format!("=^_^= Okay! I'm now following {name}."))
                .await?;
            self.chat
                .send(
                    &self.channel,
                    &format!("=o_o= {sender} has asked me to start following {name}"),
                )
                .await
        }
    }

    /// Mirror of `follow`: stop following `name`, unless not following.
    async fn unfollow(&self, sender: &str, name: &str) -> anyhow::Result<()> {
        let following = self.api.fetch_following().await?;
        debug!(count = following.len(), "Fetched current following set");

        if !following.contains(name) {
            self.chat
                .send(sender, &format!("=O_o= I'm not following {name}."))
                .await
        } else {
            self.api.remove_follow(name).await?;
            info!(name, sender, "Stopped following");
            self.chat
                .send(sender, &format!("=^_^= Okay! I've stopped following {name}."))
                .await?;
            self.chat
                .send(
                    &self.channel,
                    &format!("=o_o= {sender} has asked me to stop following {name}"),
                )
                .await
        }
    }
}
