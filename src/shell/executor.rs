use crate::shell::output::{OutputLines, OutputSink};
use crate::shell::session::EscalationSession;
use std::io::{self, Read, Write};
use std::process::{Command, Stdio};
use thiserror::Error;

/// Errors that can occur while running a command
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to obtain escalation credential: {0}")]
    Credential(#[source] io::Error),

    /// The process ran and was reaped, but its I/O failed part way
    #[error("I/O error while running '{command}': {source}")]
    Interrupted {
        command: String,
        output: String,
        exit_code: Option<i32>,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ExecError {
    /// Output streamed before the failure, if the process got that far
    pub fn partial_output(&self) -> Option<&str> {
        match self {
            ExecError::Interrupted { output, .. } => Some(output),
            _ => None,
        }
    }
}

/// Result of running a command
#[derive(Debug, Clone)]
pub struct ExecOutcome {
    /// Merged stdout/stderr, exactly as streamed
    pub output: String,
    /// `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
}

impl ExecOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// How privileged commands are recognised and rewritten
///
/// A command whose trimmed text starts with `keyword` has the first
/// occurrence of `keyword` replaced by `replacement`, and the cached
/// credential is written to its stdin.
#[derive(Debug, Clone)]
pub struct EscalationPolicy {
    pub keyword: String,
    pub replacement: String,
}

impl EscalationPolicy {
    pub fn new(keyword: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            replacement: replacement.into(),
        }
    }

    /// Returns the rewritten command if it needs escalation
    pub fn rewrite(&self, command: &str) -> Option<String> {
        if command.trim().starts_with(self.keyword.as_str()) {
            Some(command.replacen(self.keyword.as_str(), &self.replacement, 1))
        } else {
            None
        }
    }
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self::new("sudo", "sudo -S")
    }
}

/// Runs single shell commands through a shell interpreter
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    shell: String,
    escalation: EscalationPolicy,
}

impl CommandExecutor {
    /// Executor using `sh -c` and `sudo -S`
    pub fn new() -> Self {
        Self::with_shell("sh", EscalationPolicy::default())
    }

    pub fn with_shell(shell: impl Into<String>, escalation: EscalationPolicy) -> Self {
        Self {
            shell: shell.into(),
            escalation,
        }
    }

    /// Execute a command, streaming its output to `sink`
    ///
    /// Blocks until the process exits. There is no timeout: a command that
    /// never exits stalls the caller.
    pub fn execute(
        &self,
        command: &str,
        session: &mut EscalationSession,
        sink: &mut dyn OutputSink,
    ) -> Result<ExecOutcome, ExecError> {
        let (command, secret) = match self.escalation.rewrite(command) {
            Some(rewritten) => {
                let credential = session.credential().map_err(ExecError::Credential)?;
                tracing::debug!(command = rewritten.as_str(), "escalating");
                (rewritten, Some(credential.clone()))
            }
            None => (command.to_string(), None),
        };

        sink.command_started(&command);

        // stdout and stderr share one pipe so lines interleave as emitted
        let (reader, writer) = io::pipe()?;
        // `cmd` holds the parent's write ends; it must be dropped before reading
        let mut child = {
            let mut cmd = Command::new(&self.shell);
            cmd.arg("-c")
                .arg(&command)
                .stdin(Stdio::piped())
                .stdout(writer.try_clone()?)
                .stderr(writer);
            cmd.spawn().map_err(|source| ExecError::Spawn {
                command: command.clone(),
                source,
            })?
        };

        // stdin is closed once this block ends, with or without a credential
        let mut failure = None;
        if let Some(mut stdin) = child.stdin.take()
            && let Some(ref secret) = secret
        {
            match writeln!(stdin, "{}", secret.expose()).and_then(|_| stdin.flush()) {
                Ok(()) => {}
                // Child exited without reading its input
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                    tracing::debug!("child closed stdin before credential was written");
                }
                Err(e) => failure = Some(e),
            }
        }

        // The read end is dropped before waiting, so a child still writing gets EPIPE
        let (output, read_error) = collect_output(reader, sink);

        let status = child.wait()?;
        tracing::debug!(command = command.as_str(), exit_code = ?status.code(), "command finished");

        if let Some(source) = failure.or(read_error) {
            tracing::warn!(command = command.as_str(), error = %source, "command I/O failed");
            return Err(ExecError::Interrupted {
                command,
                output,
                exit_code: status.code(),
                source,
            });
        }

        Ok(ExecOutcome {
            output,
            exit_code: status.code(),
        })
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    pub fn escalation(&self) -> &EscalationPolicy {
        &self.escalation
    }
}

/// Stream lines to `sink` until EOF or the first read error
fn collect_output<R: Read>(reader: R, sink: &mut dyn OutputSink) -> (String, Option<io::Error>) {
    let mut output = String::new();
    for line in OutputLines::new(reader) {
        match line {
            Ok(line) => {
                sink.line(&line);
                output.push_str(&line);
            }
            Err(e) => return (output, Some(e)),
        }
    }
    (output, None)
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}
