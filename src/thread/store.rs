use crate::thread::{ConversationThread, ThreadMessage};
use anyhow::Result;
use async_trait::async_trait;

/// Storage backend for conversation threads, keyed by `(chat_id, topic_id)`.
///
/// `update` fully replaces the stored message sequence — callers always
/// supply the complete new sequence, never a delta. Implementations must
/// make single-key writes atomic, but no cross-exchange serialization is
/// provided: overlapping exchanges on the same topic can overwrite each
/// other's update.
#[async_trait]
pub trait ThreadStore: Send + Sync {
    async fn get(&self, chat_id: i64, topic_id: i32) -> Result<Option<ConversationThread>>;

    async fn create(
        &self,
        chat_id: i64,
        topic_id: i32,
        messages: Vec<ThreadMessage>,
    ) -> Result<ConversationThread>;

    async fn update(&self, chat_id: i64, topic_id: i32, messages: Vec<ThreadMessage>)
    -> Result<()>;
}
