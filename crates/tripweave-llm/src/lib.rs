pub mod advisor;
mod client;
mod error;
#[cfg(test)]
mod mock;
pub mod search;
mod types;

pub use client::{
    ChatBackend, DEFAULT_BASE_URL, DEFAULT_MODEL, GenerationOptions, LlmClient, LlmConfig,
    generate,
};
pub use error::{AdviceError, ConfigurationError, GenerationError, ParseError};
pub use types::{ChatRequest, ChatResponse, Choice, Message, Usage};
