use teloxide::types::Message;

/// The replied-to message, as far as the trigger and history logic care.
#[derive(Debug, Clone)]
pub struct ReplyTo {
    pub sender_id: Option<i64>,
    /// Text or caption of the replied-to message.
    pub text: Option<String>,
}

/// Inbound message event, extracted from the Telegram update. Read-only to
/// the rest of the core.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub chat_id: i64,
    pub message_id: i32,
    pub sender_id: i64,
    pub sender_name: String,
    /// Raw text or caption.
    pub text: String,
    /// Quoted excerpt, when the message quotes part of another one.
    pub quote: Option<String>,
    pub reply_to: Option<ReplyTo>,
    /// Topic the message arrived in, for forum-style supergroups.
    pub topic_id: Option<i32>,
    /// File id of the largest size of an attached photo.
    pub photo_file_id: Option<String>,
    pub is_topic_message: bool,
}

impl MessageEvent {
    /// Extract an event from a Telegram message. Returns `None` for anything
    /// the core does not handle: non-group chats and messages without text
    /// or caption.
    pub fn from_message(msg: &Message) -> Option<Self> {
        if !(msg.chat.is_group() || msg.chat.is_supergroup()) {
            return None;
        }
        let text = msg.text().or_else(|| msg.caption())?.to_string();
        let from = msg.from.as_ref()?;

        let reply_to = msg.reply_to_message().map(|replied| ReplyTo {
            sender_id: replied.from.as_ref().map(|u| u.id.0 as i64),
            text: replied
                .text()
                .or_else(|| replied.caption())
                .map(str::to_string),
        });

        Some(Self {
            chat_id: msg.chat.id.0,
            message_id: msg.id.0,
            sender_id: from.id.0 as i64,
            sender_name: from.first_name.clone(),
            text,
            quote: msg.quote().map(|q| q.text.clone()),
            reply_to,
            topic_id: msg.thread_id.map(|t| t.0.0),
            photo_file_id: msg
                .photo()
                .and_then(|sizes| sizes.last())
                .map(|photo| photo.file.id.0.clone()),
            is_topic_message: msg.is_topic_message,
        })
    }
}
