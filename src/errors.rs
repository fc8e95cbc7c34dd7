use thiserror::Error;

/// Typed failure taxonomy for a single message exchange.
///
/// Used at the orchestrator boundary; leaf functions keep `anyhow::Result`
/// and convert through the `Internal` variant via `?`.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The user sent a photo and we could not fetch its bytes. Fatal for the
    /// exchange — no text-only fallback is attempted.
    #[error("attachment download failed: {0}")]
    AttachmentDownload(String),

    /// The response generator failed. Retry/backoff belongs to the generator
    /// implementation, not here.
    #[error("response generation failed: {0}")]
    Generator(String),

    /// The thread write failed after the reply was already delivered. The
    /// user saw a reply the bot will not remember.
    #[error("thread persistence failed: {0}")]
    Persistence(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ExchangeResult<T> = std::result::Result<T, ExchangeError>;
