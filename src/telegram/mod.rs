pub mod channel;
pub mod event;
pub mod handler;

pub use channel::{ChatPort, PresenceAction, ReplyRequest, SentReply, TelegramChannel};
pub use event::{MessageEvent, ReplyTo};
pub use handler::MessageHandler;
