use std::io;
use thiserror::Error;

// Import module-level errors for AppError
use crate::config::settings::ConfigError;
use crate::llm::client::LLMError;
use crate::shell::executor::ExecError;

/// Top-level application error that wraps all module-specific errors
///
/// Only configuration problems and console or log-file I/O failures reach
/// the top level; the assistant loop recovers from the rest. All module
/// errors convert to AppError via the `From` trait.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("LLM error: {0}")]
    Llm(#[from] LLMError),

    #[error("Execution error: {0}")]
    Exec(#[from] ExecError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for application-level operations
pub type AppResult<T> = std::result::Result<T, AppError>;
