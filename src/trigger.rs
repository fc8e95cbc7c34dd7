//! Engagement decision for inbound group messages.
//!
//! Pure functions: text cleaning and the should-reply rules. The same
//! cleaning is applied to the text matched against the wake word and to the
//! text forwarded to the generator, so markup the bot itself injects (see
//! [`crate::generator::prompt`]) is invisible to both.

use crate::generator::prompt::{METADATA_FIELDS, TAG_SPECIAL_SEQUENCE};
use regex::Regex;
use std::sync::LazyLock;

/// Accepted wake-word spellings, lowercase, Latin transliterations and
/// Cyrillic. A message engages the bot when it starts with one of these
/// followed by a comma and at least one more character.
pub const WAKE_NAMES: &[&str] = &["laylo", "leylo", "lailo", "leilo", "лейло", "леило"];

static QUOTE_PREAMBLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:> Quote: `[^`]*`\n)+").expect("quote preamble pattern is valid")
});

static TAG_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    let marker = regex::escape(TAG_SPECIAL_SEQUENCE);
    Regex::new(&format!("(?is){marker}.+?{marker}")).expect("tag pair pattern is valid")
});

static METADATA_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    let fields = METADATA_FIELDS
        .iter()
        .map(|f| regex::escape(f))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)(?:\n+(?:{fields}): [^\n]*)+\s*$"))
        .expect("metadata block pattern is valid")
});

/// Strip bot-injected markup from message text: tag-delimited substrings,
/// bare tag markers, the quoted-reply preamble, and the trailing
/// metadata-field block. Idempotent.
///
/// Tag removal runs first. The preamble and metadata anchors only match once
/// no marker can expose a fresh prefix or suffix, so one pass reaches the
/// fixpoint.
pub fn sanitize(text: &str) -> String {
    let text = TAG_PAIR_RE.replace_all(text, "");
    let text = text.replace(TAG_SPECIAL_SEQUENCE, "");
    let text = QUOTE_PREAMBLE_RE.replace(&text, "");
    METADATA_BLOCK_RE.replace(&text, "").into_owned()
}

/// Whether cleaned text starts with a wake-word invocation: one of
/// [`WAKE_NAMES`] (case-insensitive), a comma, and at least one character.
pub fn matches_wake_word(text: &str) -> bool {
    let lower = text.to_lowercase();
    WAKE_NAMES.iter().any(|name| {
        lower
            .strip_prefix(name)
            .and_then(|rest| rest.strip_prefix(','))
            .is_some_and(|rest| !rest.is_empty())
    })
}

/// The should-reply decision, in priority order: an existing thread always
/// engages; a direct reply to the bot engages; otherwise the wake word
/// decides.
pub fn should_engage(
    clean_text: &str,
    has_thread: bool,
    reply_to_sender_id: Option<i64>,
    bot_id: i64,
) -> bool {
    if has_thread {
        return true;
    }
    if reply_to_sender_id == Some(bot_id) {
        return true;
    }
    matches_wake_word(clean_text)
}
