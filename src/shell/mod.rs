pub mod executor;
pub mod output;
pub mod session;

// Re-export commonly used types
pub use executor::{CommandExecutor, EscalationPolicy, ExecError, ExecOutcome};
pub use output::{ConsoleSink, NullSink, OutputLines, OutputSink};
pub use session::{Credential, CredentialSource, EscalationSession, TerminalPrompt};
