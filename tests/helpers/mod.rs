#![allow(dead_code)]

use async_trait::async_trait;
use std::cell::Cell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use taskpilot::assistant::{Assistant, ScriptedConsole};
use taskpilot::audit::SessionLogger;
use taskpilot::llm::{LLMClient, LLMError};
use taskpilot::shell::{CredentialSource, EscalationSession, NullSink};
use tempfile::TempDir;

/// Completion client returning a canned reply
pub struct MockLLMClient {
    pub response: Result<String, String>,
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn suggest(&self, _task: &str) -> Result<String, LLMError> {
        self.response.clone().map_err(LLMError::ApiError)
    }
}

/// Credential source that counts prompts
pub struct CountingSource {
    pub secret: String,
    pub calls: Rc<Cell<usize>>,
}

impl CredentialSource for CountingSource {
    fn obtain(&mut self) -> io::Result<String> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.secret.clone())
    }
}

/// Session whose prompt count can be observed
pub fn counting_session(secret: &str) -> (EscalationSession, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let session = EscalationSession::new(Box::new(CountingSource {
        secret: secret.to_string(),
        calls: calls.clone(),
    }));
    (session, calls)
}

/// Assistant wired to a mock client, scripted input and a temp log
pub fn create_assistant(
    reply: &str,
    input: &[&str],
) -> (TempDir, PathBuf, Assistant<ScriptedConsole>, Rc<Cell<usize>>) {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("ai_command_log.txt");
    let logger = SessionLogger::with_path(&log_path).unwrap();
    let (session, calls) = counting_session("pw");

    let assistant = Assistant::new(
        Box::new(MockLLMClient {
            response: Ok(reply.to_string()),
        }),
        ScriptedConsole::new(input.iter().copied()),
        logger,
    )
    .with_session(session)
    .with_sink(Box::new(NullSink));

    (temp_dir, log_path, assistant, calls)
}
