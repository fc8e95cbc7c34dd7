use crate::generator::ResponseGenerator;
use crate::telegram::event::MessageEvent;
use crate::telegram::handler::MessageHandler;
use crate::thread::ThreadStore;
use crate::utils::http::{DEFAULT_MAX_BODY_BYTES, default_http_client};
use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine as _;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{
    ChatAction, FileId, Message, MessageId, ParseMode, ReplyParameters, ThreadId,
};

const TELEGRAM_FILE_URL: &str = "https://api.telegram.org/file";

/// Presence indicators shown while an exchange is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceAction {
    Typing,
    UploadingPhoto,
}

/// One outbound reply attempt.
#[derive(Debug, Clone)]
pub struct ReplyRequest {
    pub chat_id: i64,
    pub text: String,
    /// Soft reference: delivery must not fail if this message is gone.
    pub reply_to_message_id: i32,
    /// Topic to route into; `None` for non-topic chats.
    pub topic_id: Option<i32>,
    /// Rich-text formatting on the first attempt, disabled on the fallback.
    pub formatted: bool,
}

/// What the platform resolved for a delivered reply.
#[derive(Debug, Clone)]
pub struct SentReply {
    /// Topic the reply actually landed in. Drives thread persistence.
    pub topic_id: Option<i32>,
}

/// Outbound side of the chat platform: reply delivery, presence signaling,
/// and attachment retrieval.
#[async_trait]
pub trait ChatPort: Send + Sync {
    async fn send_reply(&self, req: &ReplyRequest) -> Result<SentReply>;

    async fn chat_action(&self, chat_id: i64, action: PresenceAction) -> Result<()>;

    /// Fetch a photo by file id and return its bytes base64-encoded.
    async fn download_photo(&self, file_id: &str) -> Result<String>;
}

/// Telegram implementation of [`ChatPort`] plus the inbound dispatcher.
pub struct TelegramChannel {
    bot: Bot,
    token: String,
    http: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            bot: Bot::new(&token),
            token,
            http: default_http_client(),
        }
    }

    /// Resolve the bot identity, wire up the message handler, and run the
    /// long-polling dispatcher until shutdown.
    pub async fn dispatch(
        self: Arc<Self>,
        store: Arc<dyn ThreadStore>,
        generator: Arc<dyn ResponseGenerator>,
    ) -> Result<()> {
        let me = self
            .bot
            .get_me()
            .await
            .context("Failed to fetch bot identity")?;
        let bot_id = me.user.id.0 as i64;
        tracing::info!("Starting Telegram dispatcher as bot {}", bot_id);

        let handler = Arc::new(MessageHandler::new(
            store,
            generator,
            self.clone() as Arc<dyn ChatPort>,
            bot_id,
        ));

        let endpoint = Update::filter_message().endpoint(move |msg: Message| {
            let handler = handler.clone();
            async move {
                if let Some(event) = MessageEvent::from_message(&msg) {
                    if let Err(e) = handler.handle(event).await {
                        tracing::error!("Exchange failed: {e}");
                    }
                }
                Ok::<(), anyhow::Error>(())
            }
        });

        Dispatcher::builder(self.bot.clone(), endpoint)
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        Ok(())
    }
}

#[async_trait]
impl ChatPort for TelegramChannel {
    async fn send_reply(&self, req: &ReplyRequest) -> Result<SentReply> {
        let mut request = self
            .bot
            .send_message(ChatId(req.chat_id), &req.text)
            .reply_parameters(
                ReplyParameters::new(MessageId(req.reply_to_message_id))
                    .allow_sending_without_reply(),
            );
        if let Some(topic) = req.topic_id {
            request = request.message_thread_id(ThreadId(MessageId(topic)));
        }
        if req.formatted {
            request = request.parse_mode(ParseMode::Markdown);
        }

        let sent = request.await.context("Failed to send reply")?;
        Ok(SentReply {
            topic_id: sent.thread_id.map(|t| t.0.0),
        })
    }

    async fn chat_action(&self, chat_id: i64, action: PresenceAction) -> Result<()> {
        let action = match action {
            PresenceAction::Typing => ChatAction::Typing,
            PresenceAction::UploadingPhoto => ChatAction::UploadPhoto,
        };
        self.bot
            .send_chat_action(ChatId(chat_id), action)
            .await
            .context("Failed to send chat action")?;
        Ok(())
    }

    async fn download_photo(&self, file_id: &str) -> Result<String> {
        let file = self
            .bot
            .get_file(FileId(file_id.to_string()))
            .await
            .context("Failed to resolve file path")?;

        let url = format!("{TELEGRAM_FILE_URL}/bot{}/{}", self.token, file.path);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to download file")?
            .error_for_status()
            .context("File download returned an error status")?;

        let bytes = crate::utils::http::limited_body(resp, DEFAULT_MAX_BODY_BYTES).await?;
        Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
    }
}
