//! chirpbot-bot: bot logic wiring the chat transport to the feed API.
//!
//! Two recurring tasks drive the bot: a fast tick that drains pending chat
//! events into the command dispatcher, and a slow tick that polls the feed
//! timeline through the relay state machine. Both run on the scheduler's
//! single execution context, so bot state never needs locking.

pub mod commands;
pub mod relay;

pub use commands::CommandDispatcher;
pub use relay::FeedRelay;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use chirpbot_feed::FeedApi;
use chirpbot_sched::{Scheduler, Task};
use chirpbot_types::ChatEvent;

/// How often pending chat events are drained.
pub const EVENTS_PERIOD: Duration = Duration::from_secs(1);
/// How often the feed timeline is polled.
pub const POLL_PERIOD: Duration = Duration::from_secs(60);

/// Outbound chat capability implemented by the transport.
///
/// Implementations should use interior mutability; the bot shares one sink
/// between the relay and the dispatcher.
#[async_trait]
pub trait ChatSink: Send + Sync {
    /// Deliver `text` to a channel or user.
    async fn send(&self, target: &str, text: &str) -> anyhow::Result<()>;
}

/// Fast tick: drain pending chat events and dispatch each one.
///
/// Dispatch failures are logged per message so one bad command cannot
/// block the rest of the queue.
pub struct ProcessEventsTask<F, C> {
    events: mpsc::UnboundedReceiver<ChatEvent>,
    dispatcher: CommandDispatcher<F, C>,
}

impl<F, C> ProcessEventsTask<F, C> {
    pub fn new(
        events: mpsc::UnboundedReceiver<ChatEvent>,
        dispatcher: CommandDispatcher<F, C>,
    ) -> Self {
        Self { events, dispatcher }
    }
}

#[async_trait]
impl<F: FeedApi, C: ChatSink> Task for ProcessEventsTask<F, C> {
    fn name(&self) -> &str {
        "process-events"
    }

    async fn run(&mut self) -> anyhow::Result<()> {
        while let Ok(event) = self.events.try_recv() {
            debug!(sender = %event.sender, "Handling chat message");
            if let Err(e) = self.dispatcher.handle(&event).await {
                warn!(sender = %event.sender, "Command handling failed: {e:#}");
            }
        }
        Ok(())
    }
}

/// Slow tick: run one feed poll cycle.
pub struct PollFeedTask<F, C> {
    relay: FeedRelay<F, C>,
}

impl<F, C> PollFeedTask<F, C> {
    pub fn new(relay: FeedRelay<F, C>) -> Self {
        Self { relay }
    }
}

#[async_trait]
impl<F: FeedApi, C: ChatSink> Task for PollFeedTask<F, C> {
    fn name(&self) -> &str {
        "poll-feed"
    }

    async fn run(&mut self) -> anyhow::Result<()> {
        self.relay.poll().await
    }
}

/// Register the two bot tasks and drive the scheduler until cancelled.
pub async fn run_bot<F, C>(
    api: Arc<F>,
    chat: Arc<C>,
    channel: &str,
    events: mpsc::UnboundedReceiver<ChatEvent>,
    cancel: CancellationToken,
) where
    F: FeedApi + 'static,
    C: ChatSink + 'static,
{
    let dispatcher = CommandDispatcher::new(api.clone(), chat.clone(), channel.to_string());
    let relay = FeedRelay::new(api, chat, channel.to_string());

    let mut sched = Scheduler::new();
    sched.add(EVENTS_PERIOD, Box::new(ProcessEventsTask::new(events, dispatcher)));
    sched.add(POLL_PERIOD, Box::new(PollFeedTask::new(relay)));
    sched.run(cancel).await;
}
