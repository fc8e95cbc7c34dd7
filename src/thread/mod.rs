pub mod manager;
pub mod store;

pub use manager::ThreadManager;
pub use store::ThreadStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sender id recorded on turns authored by the bot itself.
pub const BOT_SENDER_ID: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn inside a conversation thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub role: Role,
    #[serde(rename = "fromId")]
    pub from_id: i64,
    pub content: String,
    /// Base64 image payloads. Only ever attached to user turns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl ThreadMessage {
    pub fn user(from_id: i64, content: impl Into<String>, images: Vec<String>) -> Self {
        Self {
            role: Role::User,
            from_id,
            content: content.into(),
            images,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            from_id: BOT_SENDER_ID,
            content: content.into(),
            images: Vec::new(),
        }
    }
}

/// Persisted conversational memory for one `(chat, topic)` pair.
///
/// Once created, every later exchange in the topic appends to this same
/// thread; it is never forked. There is no cross-exchange locking: two
/// exchanges racing on the same topic can lose one update (accepted
/// limitation, see the store adapter).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationThread {
    #[serde(rename = "chatId")]
    pub chat_id: i64,
    #[serde(rename = "topicId")]
    pub topic_id: i32,
    pub messages: Vec<ThreadMessage>,
    #[serde(rename = "createdAt", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt", default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl ConversationThread {
    pub fn new(chat_id: i64, topic_id: i32, messages: Vec<ThreadMessage>) -> Self {
        Self {
            chat_id,
            topic_id,
            messages,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assistant_turn_carries_bot_sender_id() {
        let msg = ThreadMessage::assistant("hi there");
        assert_eq!(msg.from_id, BOT_SENDER_ID);
        assert_eq!(msg.role, Role::Assistant);
        assert!(msg.images.is_empty());
    }

    #[test]
    fn role_serializes_lowercase() {
        let msg = ThreadMessage::user(42, "hello", vec![]);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["fromId"], 42);
        // empty image list is omitted on the wire
        assert!(json.get("images").is_none());
    }

    #[test]
    fn message_roundtrips_through_json() {
        let msg = ThreadMessage::user(7, "caption", vec!["aGVsbG8=".into()]);
        let json = serde_json::to_string(&msg).unwrap();
        let back: ThreadMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
