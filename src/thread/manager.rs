use crate::thread::store::ThreadStore;
use crate::thread::{ConversationThread, ThreadMessage};
use crate::utils::{atomic_write, ensure_dir, safe_filename};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lru::LruCache;
use serde_json::Value;
use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tokio::sync::Mutex;

const MAX_CACHED_THREADS: usize = 64;

/// File-backed thread store: one JSONL file per `(chat, topic)` key under
/// `threads_dir`, with an LRU cache in front. The first line is thread
/// metadata, each following line one message.
pub struct ThreadManager {
    threads_dir: PathBuf,
    cache: Mutex<LruCache<(i64, i32), ConversationThread>>,
}

impl ThreadManager {
    pub fn new(threads_dir: PathBuf) -> Result<Self> {
        let threads_dir = ensure_dir(threads_dir)?;
        Ok(Self {
            threads_dir,
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(MAX_CACHED_THREADS).expect("MAX_CACHED_THREADS must be > 0"),
            )),
        })
    }

    fn thread_path(&self, chat_id: i64, topic_id: i32) -> PathBuf {
        let name = safe_filename(&format!("{chat_id}_{topic_id}"));
        self.threads_dir.join(format!("{name}.jsonl"))
    }

    fn load(&self, chat_id: i64, topic_id: i32) -> Result<Option<ConversationThread>> {
        let path = self.thread_path(chat_id, topic_id);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read thread file: {}", path.display()))?;

        let mut messages = Vec::new();
        let mut created_at = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let data: Value =
                serde_json::from_str(line).with_context(|| "Failed to parse thread JSON line")?;

            if data.get("_type") == Some(&Value::String("metadata".to_string())) {
                if let Some(ts) = data.get("createdAt").and_then(|v| v.as_str()) {
                    created_at = DateTime::parse_from_rfc3339(ts)
                        .ok()
                        .map(|dt| dt.with_timezone(&Utc));
                }
            } else {
                let msg: ThreadMessage = serde_json::from_value(data)
                    .with_context(|| "Failed to parse thread message line")?;
                messages.push(msg);
            }
        }

        Ok(Some(ConversationThread {
            chat_id,
            topic_id,
            messages,
            created_at: created_at.unwrap_or_else(Utc::now),
            updated_at: Utc::now(),
        }))
    }

    fn save(&self, thread: &ConversationThread) -> Result<()> {
        let path = self.thread_path(thread.chat_id, thread.topic_id);

        let mut content = String::new();
        let metadata = serde_json::json!({
            "_type": "metadata",
            "chatId": thread.chat_id,
            "topicId": thread.topic_id,
            "createdAt": thread.created_at.to_rfc3339(),
            "updatedAt": thread.updated_at.to_rfc3339(),
        });
        content.push_str(&serde_json::to_string(&metadata)?);
        content.push('\n');

        for msg in &thread.messages {
            content.push_str(&serde_json::to_string(msg)?);
            content.push('\n');
        }

        atomic_write(&path, &content)
            .with_context(|| format!("Failed to write thread file: {}", path.display()))
    }

    async fn cache_put(&self, thread: ConversationThread) {
        let mut cache = self.cache.lock().await;
        cache.put((thread.chat_id, thread.topic_id), thread);
    }
}

#[async_trait]
impl ThreadStore for ThreadManager {
    async fn get(&self, chat_id: i64, topic_id: i32) -> Result<Option<ConversationThread>> {
        {
            let mut cache = self.cache.lock().await;
            if let Some(thread) = cache.get(&(chat_id, topic_id)) {
                return Ok(Some(thread.clone()));
            }
        }

        let Some(thread) = self.load(chat_id, topic_id)? else {
            return Ok(None);
        };
        self.cache_put(thread.clone()).await;
        Ok(Some(thread))
    }

    async fn create(
        &self,
        chat_id: i64,
        topic_id: i32,
        messages: Vec<ThreadMessage>,
    ) -> Result<ConversationThread> {
        let thread = ConversationThread::new(chat_id, topic_id, messages);
        self.save(&thread)?;
        self.cache_put(thread.clone()).await;
        Ok(thread)
    }

    async fn update(
        &self,
        chat_id: i64,
        topic_id: i32,
        messages: Vec<ThreadMessage>,
    ) -> Result<()> {
        // Full replace of the message sequence; created_at survives.
        let mut thread = match self.get(chat_id, topic_id).await? {
            Some(existing) => existing,
            None => ConversationThread::new(chat_id, topic_id, Vec::new()),
        };
        thread.messages = messages;
        thread.updated_at = Utc::now();

        self.save(&thread)?;
        self.cache_put(thread).await;
        Ok(())
    }
}
