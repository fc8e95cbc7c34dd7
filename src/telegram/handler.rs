use crate::errors::{ExchangeError, ExchangeResult};
use crate::generator::{GenerateRequest, ResponseGenerator};
use crate::history;
use crate::telegram::channel::{ChatPort, PresenceAction, ReplyRequest, SentReply};
use crate::telegram::event::MessageEvent;
use crate::thread::{ThreadMessage, ThreadStore};
use crate::trigger;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Delivery attempts: formatted first, then once more with formatting off.
const MAX_DELIVERY_ATTEMPTS: usize = 2;

/// Orchestrates one exchange: trigger decision, history assembly, response
/// generation, delivery with the formatting fallback, thread persistence.
///
/// One call per inbound event; no locks are held across awaits, so two
/// overlapping exchanges on the same topic can race on the thread (accepted,
/// see [`ThreadStore`]).
pub struct MessageHandler {
    store: Arc<dyn ThreadStore>,
    generator: Arc<dyn ResponseGenerator>,
    port: Arc<dyn ChatPort>,
    bot_id: i64,
}

impl MessageHandler {
    pub fn new(
        store: Arc<dyn ThreadStore>,
        generator: Arc<dyn ResponseGenerator>,
        port: Arc<dyn ChatPort>,
        bot_id: i64,
    ) -> Self {
        Self {
            store,
            generator,
            port,
            bot_id,
        }
    }

    pub async fn handle(&self, event: MessageEvent) -> ExchangeResult<()> {
        let clean = trigger::sanitize(&event.text);

        let thread = match event.topic_id {
            Some(topic) => self.store.get(event.chat_id, topic).await?,
            None => None,
        };

        let reply_sender = event.reply_to.as_ref().and_then(|r| r.sender_id);
        if !trigger::should_engage(&clean, thread.is_some(), reply_sender, self.bot_id) {
            return Ok(());
        }
        debug!(
            chat_id = event.chat_id,
            topic_id = event.topic_id,
            has_thread = thread.is_some(),
            "Engaging"
        );

        let history = history::assemble(thread.as_ref(), event.reply_to.as_ref());

        // The user sent the image on purpose: a failed download is fatal for
        // the exchange rather than silently degrading to text-only context.
        let mut images = Vec::new();
        if let Some(file_id) = &event.photo_file_id {
            self.signal(event.chat_id, PresenceAction::UploadingPhoto)
                .await;
            let image = self
                .port
                .download_photo(file_id)
                .await
                .map_err(|e| ExchangeError::AttachmentDownload(e.to_string()))?;
            images.push(image);
        }

        self.signal(event.chat_id, PresenceAction::Typing).await;

        let model_text = match &event.quote {
            Some(quote) => format!("> Quote: `{quote}`\n{clean}"),
            None => clean,
        };
        let exchange = self
            .generator
            .respond(GenerateRequest {
                history: history.clone(),
                message: model_text,
                sender_name: event.sender_name.clone(),
                images,
            })
            .await
            .map_err(|e| ExchangeError::Generator(e.to_string()))?;

        let Some(sent) = self.deliver(&event, &exchange.response).await else {
            // Both delivery attempts failed: logged, nothing persisted.
            return Ok(());
        };

        let mut new_messages = history;
        new_messages.push(ThreadMessage::user(
            event.sender_id,
            exchange.user_turn.content,
            exchange.user_turn.images,
        ));
        new_messages.push(ThreadMessage::assistant(exchange.response));

        // Conversation memory exists only for topic-scoped chats; the topic
        // the delivered reply resolved to is authoritative.
        let Some(topic) = sent.topic_id else {
            return Ok(());
        };
        if thread.is_none() {
            self.store
                .create(event.chat_id, topic, new_messages.clone())
                .await
                .map_err(|e| ExchangeError::Persistence(e.to_string()))?;
        }
        self.store
            .update(event.chat_id, topic, new_messages)
            .await
            .map_err(|e| ExchangeError::Persistence(e.to_string()))?;

        info!(
            chat_id = event.chat_id,
            topic_id = topic,
            "Exchange persisted"
        );
        Ok(())
    }

    /// Deliver with the formatting fallback: formatted first, on failure one
    /// retry with formatting off. A second failure abandons the exchange.
    async fn deliver(&self, event: &MessageEvent, text: &str) -> Option<SentReply> {
        for attempt in 0..MAX_DELIVERY_ATTEMPTS {
            let formatted = attempt == 0;
            let req = ReplyRequest {
                chat_id: event.chat_id,
                text: text.to_string(),
                reply_to_message_id: event.message_id,
                topic_id: if event.is_topic_message {
                    event.topic_id
                } else {
                    None
                },
                formatted,
            };
            match self.port.send_reply(&req).await {
                Ok(sent) => return Some(sent),
                Err(e) if formatted => {
                    warn!("Formatted delivery failed, retrying without formatting: {e}");
                }
                Err(e) => {
                    error!("Failed to deliver reply: {e}");
                }
            }
        }
        None
    }

    /// Presence indicators are fire-and-forget: failures are logged, never
    /// fatal.
    async fn signal(&self, chat_id: i64, action: PresenceAction) {
        if let Err(e) = self.port.chat_action(chat_id, action).await {
            debug!("Presence signal failed: {e}");
        }
    }
}
