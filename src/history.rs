//! Assembles the prior turns handed to the response generator.

use crate::telegram::event::ReplyTo;
use crate::thread::{ConversationThread, ThreadMessage};

/// Stand-in content when a replied-to message has neither text nor caption.
pub const UNSUPPORTED_MESSAGE: &str = "<unsupported message>";

/// Build the ordered history for one exchange.
///
/// An existing thread wins: its stored sequence is returned verbatim. With
/// no thread, a reply to another message seeds the history with a single
/// synthesized user turn built from the replied-to message; that seed is
/// only ever persisted once folded into a real exchange. Otherwise the
/// history is empty.
pub fn assemble(
    thread: Option<&ConversationThread>,
    reply_to: Option<&ReplyTo>,
) -> Vec<ThreadMessage> {
    if let Some(thread) = thread {
        return thread.messages.clone();
    }

    let Some(reply) = reply_to else {
        return Vec::new();
    };
    let Some(sender_id) = reply.sender_id else {
        return Vec::new();
    };

    let content = reply
        .text
        .clone()
        .unwrap_or_else(|| UNSUPPORTED_MESSAGE.to_string());
    vec![ThreadMessage::user(sender_id, content, Vec::new())]
}
