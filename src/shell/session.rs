use std::fmt;
use std::io;

/// Source of the privilege-escalation password
pub trait CredentialSource {
    fn obtain(&mut self) -> io::Result<String>;
}

/// Prompts on the controlling terminal without echo
pub struct TerminalPrompt {
    prompt: String,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            prompt: "[sudo] password: ".to_string(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialSource for TerminalPrompt {
    fn obtain(&mut self) -> io::Result<String> {
        rpassword::prompt_password(&self.prompt)
    }
}

/// A cached secret. Never printed.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Per-run escalation state
///
/// The credential is acquired on first use and reused for the lifetime of the
/// session. It is never written anywhere.
pub struct EscalationSession {
    source: Box<dyn CredentialSource>,
    cached: Option<Credential>,
}

impl EscalationSession {
    pub fn new(source: Box<dyn CredentialSource>) -> Self {
        Self {
            source,
            cached: None,
        }
    }

    /// Session that prompts on the terminal
    pub fn interactive() -> Self {
        Self::new(Box::new(TerminalPrompt::new()))
    }

    /// Return the cached credential, prompting for it the first time
    pub fn credential(&mut self) -> io::Result<&Credential> {
        if self.cached.is_none() {
            tracing::debug!("acquiring escalation credential");
            let secret = self.source.obtain()?;
            self.cached = Some(Credential(secret));
        }

        self.cached
            .as_ref()
            .ok_or_else(|| io::Error::other("credential cache empty"))
    }

    pub fn has_credential(&self) -> bool {
        self.cached.is_some()
    }
}

impl fmt::Debug for EscalationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EscalationSession")
            .field("cached", &self.cached)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingSource {
        calls: Rc<Cell<usize>>,
    }

    impl CredentialSource for CountingSource {
        fn obtain(&mut self) -> io::Result<String> {
            self.calls.set(self.calls.get() + 1);
            Ok("hunter2".to_string())
        }
    }

    struct FailingSource;

    impl CredentialSource for FailingSource {
        fn obtain(&mut self) -> io::Result<String> {
            Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no tty"))
        }
    }

    #[test]
    fn test_credential_prompted_once() {
        let calls = Rc::new(Cell::new(0));
        let mut session = EscalationSession::new(Box::new(CountingSource {
            calls: calls.clone(),
        }));

        assert!(!session.has_credential());
        assert_eq!(session.credential().unwrap().expose(), "hunter2");
        assert_eq!(session.credential().unwrap().expose(), "hunter2");
        assert!(session.has_credential());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_failed_prompt_is_not_cached() {
        let mut session = EscalationSession::new(Box::new(FailingSource));
        assert!(session.credential().is_err());
        assert!(!session.has_credential());
    }

    #[test]
    fn test_debug_is_redacted() {
        let calls = Rc::new(Cell::new(0));
        let mut session = EscalationSession::new(Box::new(CountingSource { calls }));
        session.credential().unwrap();

        let debug = format!("{:?}", session);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("***"));
    }
}
