use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;

use chirpbot_feed::HttpFeedApi;
use chirpbot_irc::IrcClient;

#[derive(Parser)]
#[command(name = "chirpbot", about = "Relays a feed timeline into an IRC channel")]
struct Cli {
    /// Path to the JSON5 config file
    #[arg(default_value = chirpbot_config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = chirpbot_config::load_config(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let cancel = CancellationToken::new();
        {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Interrupt received, shutting down");
                    cancel.cancel();
                }
            });
        }

        let api = Arc::new(HttpFeedApi::new(
            &config.feed.api_base,
            &config.feed.username,
            &config.feed.password,
        ));

        let (irc, events) = IrcClient::connect(&config.irc, cancel.clone()).await?;

        chirpbot_bot::run_bot(api, Arc::new(irc), &config.irc.channel, events, cancel).await;
        Ok(())
    })
}
