//! IRC line parsing — only the handful of messages the bot cares about.

/// A server line reduced to what the bot reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// `PING` — must be answered with `PONG <token>`.
    Ping { token: String },
    /// Numeric 001, registration complete; safe to join channels.
    Welcome,
    /// A `PRIVMSG` to a channel or to the bot directly.
    Privmsg {
        sender: String,
        target: String,
        text: String,
    },
    /// Anything else.
    Other,
}

/// Parse one CRLF-stripped server line.
pub fn parse_line(line: &str) -> ServerMessage {
    if let Some(rest) = line.strip_prefix("PING") {
        return ServerMessage::Ping {
            token: rest.trim().trim_start_matches(':').to_string(),
        };
    }

    let (prefix, rest) = match line.strip_prefix(':') {
        Some(prefixed) => match prefixed.split_once(' ') {
            Some((prefix, rest)) => (Some(prefix), rest),
            None => return ServerMessage::Other,
        },
        None => (None, line),
    };

    let mut parts = rest.splitn(2, ' ');
    let command = parts.next().unwrap_or("");
    let params = parts.next().unwrap_or("");

    match command {
        "001" => ServerMessage::Welcome,
        "PRIVMSG" => {
            let Some(prefix) = prefix else {
                return ServerMessage::Other;
            };
            let Some((target, text)) = params.split_once(' ') else {
                return ServerMessage::Other;
            };
            ServerMessage::Privmsg {
                sender: nick_of(prefix).to_string(),
                target: target.to_string(),
                text: text.trim_start_matches(':').to_string(),
            }
        }
        _ => ServerMessage::Other,
    }
}

/// Nick portion of a `nick!user@host` prefix.
fn nick_of(prefix: &str) -> &str {
    prefix.split('!').next().unwrap_or(prefix)
}
