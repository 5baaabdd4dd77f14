//! Broadcast of created bookmarks onto a named pub/sub topic.
//!
//! # Responsibility
//! - Define the `Publisher` capability injected into the creation path.
//! - Build the `bookmark_created` message carried to subscribers.
//!
//! # Invariants
//! - Delivery is fire-and-forget; a publish never waits for subscribers.
//! - Topic names are non-empty and limited to `[a-z0-9._-]`.

use super::{HookError, PostCommitHook};
use crate::model::bookmark::DomainBookmark;
use log::debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Event type carried by messages published on bookmark creation.
pub const BOOKMARK_CREATED_EVENT: &str = "bookmark_created";

const HOOK_NAME: &str = "broadcast";
const MAX_TOPIC_LEN: usize = 100;

/// Message delivered to topic subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastMessage {
    pub topic: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub bookmark: DomainBookmark,
}

impl BroadcastMessage {
    pub fn bookmark_created(topic: impl Into<String>, bookmark: &DomainBookmark) -> Self {
        Self {
            topic: topic.into(),
            event_type: BOOKMARK_CREATED_EVENT.to_string(),
            bookmark: bookmark.clone(),
        }
    }

    /// JSON rendering for transports that carry text frames.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Publish failures surfaced by a `Publisher`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    InvalidTopic(String),
    Unavailable(String),
}

impl Display for PublishError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTopic(topic) => write!(f, "invalid broadcast topic `{topic}`"),
            Self::Unavailable(reason) => write!(f, "broadcast transport unavailable: {reason}"),
        }
    }
}

impl Error for PublishError {}

/// Pub/sub transport capability.
pub trait Publisher: Send + Sync {
    /// Publishes one message on `message.topic`; returns the delivered count.
    fn publish(&self, message: BroadcastMessage) -> Result<usize, PublishError>;
}

/// Checks a topic name against the accepted character set.
pub fn validate_topic(topic: &str) -> Result<(), PublishError> {
    let valid = !topic.is_empty()
        && topic.len() <= MAX_TOPIC_LEN
        && topic.chars().all(|ch| {
            ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '.' | '_' | '-')
        });
    if valid {
        Ok(())
    } else {
        Err(PublishError::InvalidTopic(topic.to_string()))
    }
}

/// Publishes every created bookmark on one topic.
pub struct BroadcastHook {
    publisher: Arc<dyn Publisher>,
    topic: String,
}

impl BroadcastHook {
    pub fn new(
        publisher: Arc<dyn Publisher>,
        topic: impl Into<String>,
    ) -> Result<Self, PublishError> {
        let topic = topic.into();
        validate_topic(&topic)?;
        Ok(Self { publisher, topic })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl PostCommitHook for BroadcastHook {
    fn name(&self) -> &str {
        HOOK_NAME
    }

    fn on_bookmark_created(&self, bookmark: &DomainBookmark) -> Result<(), HookError> {
        let message = BroadcastMessage::bookmark_created(self.topic.as_str(), bookmark);
        let delivered = self.publisher.publish(message)?;
        debug!(
            "event=broadcast_publish module=hooks status=ok topic={} delivered={}",
            self.topic, delivered
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_topic, BroadcastHook, BroadcastMessage, PublishError};
    use crate::hooks::channel_layer::ChannelLayer;
    use crate::hooks::PostCommitHook;
    use crate::model::bookmark::DomainBookmark;
    use chrono::NaiveDate;
    use std::sync::Arc;

    #[test]
    fn topic_validation_rejects_blank_and_uppercase() {
        assert!(validate_topic("bookmarks").is_ok());
        assert!(validate_topic("barky.bookmarks_v2-live").is_ok());
        assert_eq!(
            validate_topic(""),
            Err(PublishError::InvalidTopic(String::new()))
        );
        assert!(validate_topic("Bookmarks").is_err());
        assert!(validate_topic("book marks").is_err());
    }

    #[test]
    fn hook_publishes_on_its_configured_topic() {
        let layer = Arc::new(ChannelLayer::new());
        let subscription = layer.subscribe("bookmarks.live", 2).unwrap();
        assert!(BroadcastHook::new(layer.clone(), "Bookmarks").is_err());

        let hook = BroadcastHook::new(layer, "bookmarks.live").unwrap();
        assert_eq!(hook.topic(), "bookmarks.live");
        hook.on_bookmark_created(&DomainBookmark::new("t", "u", "n").with_id(9)).unwrap();

        let message = subscription.try_recv().unwrap();
        assert_eq!(message.topic, hook.topic());
        assert_eq!(message.bookmark.id, Some(9));
    }

    #[test]
    fn message_json_carries_type_and_bookmark_fields() {
        let bookmark = DomainBookmark::dated(
            "Test Bookmark",
            "http://www.example.com",
            "Test notes",
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        )
        .with_id(3);
        let json = BroadcastMessage::bookmark_created("bookmarks", &bookmark)
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["type"], "bookmark_created");
        assert_eq!(value["topic"], "bookmarks");
        assert_eq!(value["bookmark"]["id"], 3);
        assert_eq!(value["bookmark"]["title"], "Test Bookmark");
        assert_eq!(value["bookmark"]["date_added"], "2024-01-02");
    }
}
