//! chirpbot-irc: minimal IRC client transport.
//!
//! `IrcClient::connect` opens the TCP connection, registers the nick, and
//! spawns a connection task that answers `PING`s, joins the configured
//! channel once the server welcomes us, and forwards `PRIVMSG`s as
//! [`ChatEvent`]s over an mpsc channel. Outbound lines go through an
//! unbounded queue so sending never blocks bot logic.
//!
//! Reconnect logic is out of scope: when the connection drops, the task
//! exits and subsequent sends fail.

pub mod proto;

use anyhow::Context;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use chirpbot_bot::ChatSink;
use chirpbot_config::IrcConfig;
use chirpbot_types::ChatEvent;

use proto::ServerMessage;

/// Handle to a live IRC connection.
pub struct IrcClient {
    out_tx: mpsc::UnboundedSender<String>,
}

impl IrcClient {
    /// Connect, register, and spawn the connection task.
    ///
    /// Returns the client handle and the stream of inbound chat events.
    /// The task exits when `cancel` is cancelled (sending `QUIT` first)
    /// or when the server closes the connection.
    pub async fn connect(
        config: &IrcConfig,
        cancel: CancellationToken,
    ) -> anyhow::Result<(Self, mpsc::UnboundedReceiver<ChatEvent>)> {
        let stream = TcpStream::connect((config.server.as_str(), config.port))
            .await
            .with_context(|| format!("IRC connect to {}:{} failed", config.server, config.port))?;
        info!(server = %config.server, port = config.port, "IRC connected");

        let (read_half, mut write_half) = stream.into_split();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
        let (event_tx, event_rx) = mpsc::unbounded_channel::<ChatEvent>();

        let nick = config.nick.clone();
        send_line(&mut write_half, &format!("NICK {nick}")).await?;
        send_line(&mut write_half, &format!("USER {nick} 0 * :{nick}")).await?;

        let channel = config.channel.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(read_half).lines();
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        let _ = send_line(&mut write_half, "QUIT :shutting down").await;
                        info!("IRC connection task stopped");
                        return;
                    }
                    cmd = out_rx.recv() => {
                        let Some(cmd) = cmd else { return };
                        if let Err(e) = send_line(&mut write_half, &cmd).await {
                            warn!("IRC write failed: {e}");
                            return;
                        }
                    }
                    line = lines.next_line() => {
                        let line = match line {
                            Ok(Some(line)) => line,
                            Ok(None) => {
                                info!("IRC connection closed by server");
                                return;
                            }
                            Err(e) => {
                                warn!("IRC read failed: {e}");
                                return;
                            }
                        };
                        match proto::parse_line(line.trim_end()) {
                            ServerMessage::Ping { token } => {
                                if let Err(e) =
                                    send_line(&mut write_half, &format!("PONG :{token}")).await
                                {
                                    warn!("IRC write failed: {e}");
                                    return;
                                }
                            }
                            ServerMessage::Welcome => {
                                info!(channel = %channel, "Registered, joining channel");
                                if let Err(e) =
                                    send_line(&mut write_half, &format!("JOIN {channel}")).await
                                {
                                    warn!("IRC write failed: {e}");
                                    return;
                                }
                            }
                            ServerMessage::Privmsg { sender, target, text } => {
                                debug!(%sender, %target, "Inbound chat message");
                                // Receiver gone means the bot is shutting down.
                                if event_tx.send(ChatEvent { sender, target, text }).is_err() {
                                    return;
                                }
                            }
                            ServerMessage::Other => {}
                        }
                    }
                }
            }
        });

        Ok((Self { out_tx }, event_rx))
    }

    /// Queue a `PRIVMSG` for delivery.
    pub fn privmsg(&self, target: &str, text: &str) -> anyhow::Result<()> {
        self.out_tx
            .send(format!("PRIVMSG {target} :{text}"))
            .map_err(|_| anyhow::anyhow!("IRC connection task has shut down"))
    }
}

async fn send_line(write_half: &mut OwnedWriteHalf, line: &str) -> std::io::Result<()> {
    debug!(line, "IRC send");
    write_half.write_all(line.as_bytes()).await?;
    write_half.write_all(b"\r\n").await
}

#[async_trait]
impl ChatSink for IrcClient {
    async fn send(&self, target: &str, text: &str) -> anyhow::Result<()> {
        self.privmsg(target, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    async fn accept_registration(listener: TcpListener) -> (TcpStream, String) {
        let (mut sock, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 1024];
        let mut got = String::new();
        // NICK and USER arrive before anything else.
        while !got.contains("USER") {
            let n = sock.read(&mut buf).await.unwrap();
            assert!(n > 0, "client closed during registration");
            got.push_str(std::str::from_utf8(&buf[..n]).unwrap());
        }
        (sock, got)
    }

    fn test_config(port: u16) -> IrcConfig {
        IrcConfig {
            server: "127.0.0.1".into(),
            port,
            nick: "twitterbot".into(),
            channel: "#feeds".into(),
        }
    }

    #[tokio::test]
    async fn test_connect_registers_joins_and_relays_privmsg() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (mut sock, got) = accept_registration(listener).await;
            assert!(got.contains("NICK twitterbot"));

            sock.write_all(b":irc.test 001 twitterbot :Welcome\r\n")
                .await
                .unwrap();

            // Expect the JOIN triggered by 001.
            let mut buf = vec![0u8; 1024];
            let mut got = String::new();
            while !got.contains("JOIN #feeds") {
                let n = sock.read(&mut buf).await.unwrap();
                assert!(n > 0, "client closed before JOIN");
                got.push_str(std::str::from_utf8(&buf[..n]).unwrap());
            }

            sock.write_all(b":alice!a@h PRIVMSG #feeds :follow bob\r\n")
                .await
                .unwrap();
            sock
        });

        let cancel = CancellationToken::new();
        let (_client, mut events) = IrcClient::connect(&test_config(port), cancel.clone())
            .await
            .unwrap();

        let event = tokio::time::timeout(std::time::Duration::from_secs(5), events.recv())
            .await
            .expect("timed out waiting for chat event")
            .expect("event channel closed");
        assert_eq!(event.sender, "alice");
        assert_eq!(event.target, "#feeds");
        assert_eq!(event.text, "follow bob");

        cancel.cancel();
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_privmsg_and_pong_written_to_wire() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (mut sock, pre) = accept_registration(listener).await;
            sock.write_all(b"PING :token123\r\n").await.unwrap();

            let mut buf = vec![0u8; 1024];
            // Keep bytes already read during registration: the queued
            // PRIVMSG can arrive in the same read as NICK/USER.
            let mut got = pre;
            while !(got.contains("PONG :token123") && got.contains("PRIVMSG #feeds :hello")) {
                let n = sock.read(&mut buf).await.unwrap();
                assert!(n > 0, "client closed early");
                got.push_str(std::str::from_utf8(&buf[..n]).unwrap());
            }
        });

        let cancel = CancellationToken::new();
        let (client, _events) = IrcClient::connect(&test_config(port), cancel.clone())
            .await
            .unwrap();
        client.privmsg("#feeds", "hello").unwrap();

        tokio::time::timeout(std::time::Duration::from_secs(5), server)
            .await
            .expect("timed out waiting for wire output")
            .unwrap();
        cancel.cancel();
    }

    #[tokio::test]
    async fn test_send_fails_after_connection_task_exits() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (sock, _) = accept_registration(listener).await;
            drop(sock); // server hangs up
        });

        let cancel = CancellationToken::new();
        let (client, mut events) = IrcClient::connect(&test_config(port), cancel)
            .await
            .unwrap();
        server.await.unwrap();

        // Event stream ends once the connection task exits.
        assert!(events.recv().await.is_none());
        assert!(client.send("#feeds", "hello").await.is_err());
    }
}
