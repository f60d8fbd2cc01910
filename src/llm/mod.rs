pub mod client;
pub mod openai;
pub mod suggestions;

pub use client::{LLMClient, LLMError};
pub use openai::{OpenAIClient, SYSTEM_PROMPT};
pub use suggestions::parse_commands;
