//! Shared test doubles for the exchange flow tests.

#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use leylo::generator::{GenerateRequest, GeneratedExchange, ResponseGenerator, UserTurn};
use leylo::telegram::{ChatPort, MessageEvent, PresenceAction, ReplyRequest, ReplyTo, SentReply};
use leylo::thread::{ConversationThread, ThreadMessage, ThreadStore};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Generator double: scripted exchanges, recorded requests.
#[derive(Default)]
pub struct MockGenerator {
    responses: Mutex<VecDeque<Result<GeneratedExchange>>>,
    pub requests: Mutex<Vec<GenerateRequest>>,
}

impl MockGenerator {
    pub fn with_response(response: &str) -> Self {
        let mock = Self::default();
        mock.push_response(response);
        mock
    }

    pub fn push_response(&self, response: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(GeneratedExchange {
                response: response.to_string(),
                user_turn: UserTurn {
                    content: String::new(),
                    images: Vec::new(),
                },
            }));
    }

    pub fn push_failure(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(anyhow!("{message}")));
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ResponseGenerator for MockGenerator {
    async fn respond(&self, req: GenerateRequest) -> Result<GeneratedExchange> {
        let echoed = UserTurn {
            content: format!("{}\n\nSender: {}", req.message, req.sender_name),
            images: req.images.clone(),
        };
        self.requests.lock().unwrap().push(req);
        let mut exchange = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("no scripted response left")))?;
        exchange.user_turn = echoed;
        Ok(exchange)
    }
}

/// Chat-platform double: scripted delivery outcomes, recorded traffic.
#[derive(Default)]
pub struct MockChatPort {
    send_outcomes: Mutex<VecDeque<Result<SentReply>>>,
    pub sent: Mutex<Vec<ReplyRequest>>,
    pub actions: Mutex<Vec<PresenceAction>>,
    pub downloads: Mutex<Vec<String>>,
    pub download_result: Mutex<Option<Result<String>>>,
}

impl MockChatPort {
    pub fn delivering_to(topic_id: Option<i32>) -> Self {
        let port = Self::default();
        port.push_send_ok(topic_id);
        port
    }

    pub fn push_send_ok(&self, topic_id: Option<i32>) {
        self.send_outcomes
            .lock()
            .unwrap()
            .push_back(Ok(SentReply { topic_id }));
    }

    pub fn push_send_failure(&self, message: &str) {
        self.send_outcomes
            .lock()
            .unwrap()
            .push_back(Err(anyhow!("{message}")));
    }

    pub fn set_download(&self, result: Result<String>) {
        *self.download_result.lock().unwrap() = Some(result);
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatPort for MockChatPort {
    async fn send_reply(&self, req: &ReplyRequest) -> Result<SentReply> {
        self.sent.lock().unwrap().push(req.clone());
        self.send_outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("no scripted delivery outcome left")))
    }

    async fn chat_action(&self, _chat_id: i64, action: PresenceAction) -> Result<()> {
        self.actions.lock().unwrap().push(action);
        Ok(())
    }

    async fn download_photo(&self, file_id: &str) -> Result<String> {
        self.downloads.lock().unwrap().push(file_id.to_string());
        self.download_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok("bWltaWM=".to_string()))
    }
}

/// Store operations a test can assert on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Get { chat_id: i64, topic_id: i32 },
    Create { chat_id: i64, topic_id: i32 },
    Update { chat_id: i64, topic_id: i32 },
}

/// In-memory store double recording every call.
#[derive(Default)]
pub struct RecordingThreadStore {
    pub threads: Mutex<Vec<ConversationThread>>,
    pub ops: Mutex<Vec<StoreOp>>,
}

impl RecordingThreadStore {
    pub fn with_thread(chat_id: i64, topic_id: i32, messages: Vec<ThreadMessage>) -> Self {
        let store = Self::default();
        store
            .threads
            .lock()
            .unwrap()
            .push(ConversationThread::new(chat_id, topic_id, messages));
        store
    }

    pub fn write_count(&self) -> usize {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| !matches!(op, StoreOp::Get { .. }))
            .count()
    }

    pub fn stored_messages(&self, chat_id: i64, topic_id: i32) -> Option<Vec<ThreadMessage>> {
        self.threads
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.chat_id == chat_id && t.topic_id == topic_id)
            .map(|t| t.messages.clone())
    }
}

#[async_trait]
impl ThreadStore for RecordingThreadStore {
    async fn get(&self, chat_id: i64, topic_id: i32) -> Result<Option<ConversationThread>> {
        self.ops
            .lock()
            .unwrap()
            .push(StoreOp::Get { chat_id, topic_id });
        Ok(self
            .threads
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.chat_id == chat_id && t.topic_id == topic_id)
            .cloned())
    }

    async fn create(
        &self,
        chat_id: i64,
        topic_id: i32,
        messages: Vec<ThreadMessage>,
    ) -> Result<ConversationThread> {
        self.ops
            .lock()
            .unwrap()
            .push(StoreOp::Create { chat_id, topic_id });
        let thread = ConversationThread::new(chat_id, topic_id, messages);
        self.threads.lock().unwrap().push(thread.clone());
        Ok(thread)
    }

    async fn update(&self, chat_id: i64, topic_id: i32, messages: Vec<ThreadMessage>) -> Result<()> {
        self.ops
            .lock()
            .unwrap()
            .push(StoreOp::Update { chat_id, topic_id });
        let mut threads = self.threads.lock().unwrap();
        if let Some(thread) = threads
            .iter_mut()
            .find(|t| t.chat_id == chat_id && t.topic_id == topic_id)
        {
            thread.messages = messages;
        } else {
            threads.push(ConversationThread::new(chat_id, topic_id, messages));
        }
        Ok(())
    }
}

/// A plain wake-word message in a topic-less group chat.
pub fn wake_event(text: &str) -> MessageEvent {
    MessageEvent {
        chat_id: -100_123,
        message_id: 500,
        sender_id: 42,
        sender_name: "Ann".to_string(),
        text: text.to_string(),
        quote: None,
        reply_to: None,
        topic_id: None,
        photo_file_id: None,
        is_topic_message: false,
    }
}

/// The same message arriving inside a forum topic.
pub fn topic_event(text: &str, topic_id: i32) -> MessageEvent {
    MessageEvent {
        topic_id: Some(topic_id),
        is_topic_message: true,
        ..wake_event(text)
    }
}

pub fn reply_to(sender_id: Option<i64>, text: Option<&str>) -> ReplyTo {
    ReplyTo {
        sender_id,
        text: text.map(str::to_string),
    }
}
