pub mod base;
pub mod openai;
pub mod prompt;

pub use base::{GenerateRequest, GeneratedExchange, ResponseGenerator, UserTurn};
pub use openai::OpenAiGenerator;
