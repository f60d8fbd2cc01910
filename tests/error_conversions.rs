use std::error::Error;
use taskpilot::config::ConfigError;
use taskpilot::error::{AppError, AppResult};
use taskpilot::llm::LLMError;
use taskpilot::shell::ExecError;

/// Test that ConfigError converts to AppError::Config
#[test]
fn test_config_error_converts_to_app_error() {
    let app_err: AppError = ConfigError::DirectoryNotFound.into();
    assert!(matches!(app_err, AppError::Config(_)));
}

/// Test that LLMError converts to AppError::Llm
#[test]
fn test_llm_error_converts_to_app_error() {
    let app_err: AppError = LLMError::InvalidResponse("empty".to_string()).into();
    assert!(matches!(app_err, AppError::Llm(_)));
}

/// Test that ExecError converts to AppError::Exec
#[test]
fn test_exec_error_converts_to_app_error() {
    let exec_err = ExecError::Credential(std::io::Error::new(
        std::io::ErrorKind::UnexpectedEof,
        "no tty",
    ));
    let app_err: AppError = exec_err.into();
    assert!(matches!(app_err, AppError::Exec(_)));
}

/// Test that std::io::Error converts to AppError::Io
#[test]
fn test_io_error_converts_to_app_error() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
    let app_err: AppError = io_err.into();
    assert!(matches!(app_err, AppError::Io(_)));
}

/// Test that `?` works across module errors in AppResult functions
#[test]
fn test_question_mark_propagation() {
    fn load() -> AppResult<()> {
        Err(ConfigError::InvalidValue("llm.timeout_seconds".to_string()))?;
        Ok(())
    }

    let err = load().unwrap_err();
    assert!(err.to_string().contains("llm.timeout_seconds"));
}

/// Test that error sources are preserved through the chain
#[test]
fn test_error_source_chain() {
    let spawn = ExecError::Spawn {
        command: "echo hi".to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such shell"),
    };
    assert!(spawn.source().is_some());
    assert!(spawn.to_string().contains("echo hi"));

    let app_err: AppError = spawn.into();
    let source = app_err.source().expect("AppError should expose its source");
    assert!(source.to_string().contains("Failed to spawn"));
}

/// Test error messages are human readable
#[test]
fn test_error_messages() {
    assert_eq!(
        LLMError::MissingApiKey("OPENAI_API_KEY".to_string()).to_string(),
        "No API key configured (set OPENAI_API_KEY or llm.api_key)"
    );
    assert_eq!(
        LLMError::ApiError("API returned status 401".to_string()).to_string(),
        "API request failed: API returned status 401"
    );
    assert_eq!(
        ConfigError::DirectoryNotFound.to_string(),
        "Config directory not found"
    );
}
