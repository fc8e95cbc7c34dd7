use crate::thread::ThreadMessage;
use anyhow::Result;
use async_trait::async_trait;

/// Input for one generation call.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Prior turns, oldest first.
    pub history: Vec<ThreadMessage>,
    /// Cleaned message text (markup already stripped, quote preamble added).
    pub message: String,
    pub sender_name: String,
    /// Base64 image payloads attached to the inbound message.
    pub images: Vec<String>,
}

/// The user turn as the generator constructed it. This echo is authoritative
/// for persistence — the generator owns content normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct UserTurn {
    pub content: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct GeneratedExchange {
    pub response: String,
    pub user_turn: UserTurn,
}

/// The language-model seam. Retry/backoff, if any, lives behind this trait;
/// callers treat a failure as fatal for the current exchange.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn respond(&self, req: GenerateRequest) -> Result<GeneratedExchange>;
}
