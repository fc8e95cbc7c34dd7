#![warn(clippy::pedantic)]
// Noisy doc/signature lints — would require annotating most pub functions
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Telegram ids cross i64/i32/u64 boundaries at the transport seam
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod errors;
pub mod generator;
pub mod history;
pub mod telegram;
pub mod thread;
pub mod trigger;
pub mod utils;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
