use serde::{Deserialize, Serialize};

/// A parsed inbound chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEvent {
    /// Nick of the user who sent the message.
    pub sender: String,
    /// Where the message was delivered (channel name or the bot's nick).
    pub target: String,
    /// Message body.
    pub text: String,
}

/// One entry from the feed timeline.
///
/// `created_at` is kept as the wire string; callers parse it when they
/// need an ordered timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItem {
    /// Account name of the post's author.
    pub author: String,
    /// Post text.
    pub body: String,
    /// Creation time as reported by the feed API.
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_event_serde() {
        let evt = ChatEvent {
            sender: "alice".into(),
            target: "#feeds".into(),
            text: "follow bob".into(),
        };
        let json = serde_json::to_string(&evt).unwrap();
        let parsed: ChatEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.sender, "alice");
        assert_eq!(parsed.text, "follow bob");
    }

    #[test]
    fn test_feed_item_serde() {
        let json = r#"{"author":"bob","body":"hello world","created_at":"Thu Aug 27 07:14:00 +0000 2026"}"#;
        let item: FeedItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.author, "bob");
        assert_eq!(item.created_at, "Thu Aug 27 07:14:00 +0000 2026");
    }
}
