//! HTTP client for the timeline API.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use chirpbot_types::FeedItem;

use crate::{FeedApi, FeedError};

/// A status entry as returned by the timeline endpoints.
#[derive(Debug, Deserialize)]
struct Status {
    text: String,
    created_at: String,
    user: Account,
}

#[derive(Debug, Deserialize)]
struct Account {
    screen_name: String,
}

/// Basic-auth HTTP client for the timeline API.
pub struct HttpFeedApi {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl HttpFeedApi {
    pub fn new(base_url: &str, username: &str, password: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build reqwest client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, FeedError> {
        let resp = self
            .client
            .get(format!("{}{path}", self.base_url))
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(FeedError::Status(resp.status().as_u16()));
        }
        Ok(resp.json().await?)
    }

    async fn post(&self, path: &str) -> Result<(), FeedError> {
        let resp = self
            .client
            .post(format!("{}{path}", self.base_url))
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(FeedError::Status(resp.status().as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl FeedApi for HttpFeedApi {
    async fn fetch_timeline(&self) -> Result<Vec<FeedItem>, FeedError> {
        let statuses: Vec<Status> = self.get_json("/statuses/friends_timeline.json").await?;
        Ok(statuses
            .into_iter()
            .map(|s| FeedItem {
                author: s.user.screen_name,
                body: s.text,
                created_at: s.created_at,
            })
            .collect())
    }

    async fn fetch_following(&self) -> Result<HashSet<String>, FeedError> {
        let friends: Vec<Account> = self.get_json("/statuses/friends.json").await?;
        Ok(friends.into_iter().map(|f| f.screen_name).collect())
    }

    async fn add_follow(&self, name: &str) -> Result<(), FeedError> {
        self.post(&format!("/friendships/create/{name}.json")).await
    }

    async fn remove_follow(&self, name: &str) -> Result<(), FeedError> {
        self.post(&format!("/friendships/destroy/{name}.json"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = HttpFeedApi::new("http://localhost:8080/", "bot", "pw");
        assert_eq!(api.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_status_deserialization() {
        let json = r#"{
            "text": "hello world",
            "created_at": "Thu Aug 27 07:14:00 +0000 2026",
            "user": { "screen_name": "bob" }
        }"#;
        let status: Status = serde_json::from_str(json).unwrap();
        assert_eq!(status.user.screen_name, "bob");
        assert_eq!(status.text, "hello world");
    }
}
