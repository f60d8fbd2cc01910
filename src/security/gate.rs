use crate::security::{DEFAULT_ALLOWED_PREFIXES, DEFAULT_DENIED_PATTERNS};
use crossterm::style::Stylize;
use std::fmt;

/// Why a command was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockReason {
    /// The command contains a denylisted fragment
    Denied { pattern: String },
    /// No allowlisted prefix matched
    NotAllowed,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::Denied { .. } => write!(f, "BLOCKED - blacklist"),
            BlockReason::NotAllowed => write!(f, "BLOCKED - not whitelisted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Permitted,
    Blocked(BlockReason),
}

impl Verdict {
    pub fn is_permitted(&self) -> bool {
        matches!(self, Verdict::Permitted)
    }
}

/// Allow/deny gate for suggested shell commands
///
/// The gate does not parse shell syntax. Chaining (`;`, `&&`, `|`), quoting,
/// substitution and variable expansion are invisible to it, so
/// `echo ok; <anything>` passes unless a denied fragment shows up in the text.
#[derive(Debug, Clone)]
pub struct SafetyGate {
    allowed_prefixes: Vec<String>,
    denied_patterns: Vec<String>,
}

impl SafetyGate {
    /// Create a gate with the built-in lists
    pub fn new() -> Self {
        Self::with_lists(
            DEFAULT_ALLOWED_PREFIXES.iter().map(|s| s.to_string()).collect(),
            DEFAULT_DENIED_PATTERNS.iter().map(|s| s.to_string()).collect(),
        )
    }

    pub fn with_lists(allowed_prefixes: Vec<String>, denied_patterns: Vec<String>) -> Self {
        Self {
            allowed_prefixes,
            denied_patterns,
        }
    }

    /// Classify a command without printing anything
    pub fn classify(&self, command: &str) -> Verdict {
        // Deny wins over allow
        if let Some(pattern) = self
            .denied_patterns
            .iter()
            .find(|pattern| command.contains(pattern.as_str()))
        {
            return Verdict::Blocked(BlockReason::Denied {
                pattern: pattern.clone(),
            });
        }

        if self
            .allowed_prefixes
            .iter()
            .any(|prefix| command.starts_with(prefix.as_str()))
        {
            Verdict::Permitted
        } else {
            Verdict::Blocked(BlockReason::NotAllowed)
        }
    }

    /// Classify a command and print the reason when it is blocked
    pub fn check(&self, command: &str) -> bool {
        match self.classify(command) {
            Verdict::Permitted => true,
            Verdict::Blocked(reason) => {
                if let BlockReason::Denied { ref pattern } = reason {
                    tracing::debug!(command, pattern = pattern.as_str(), "denylist match");
                }
                println!("{} {}", format!("[{}]", reason).red(), command);
                false
            }
        }
    }

    pub fn allowed_prefixes(&self) -> &[String] {
        &self.allowed_prefixes
    }

    pub fn denied_patterns(&self) -> &[String] {
        &self.denied_patterns
    }
}

impl Default for SafetyGate {
    fn default() -> Self {
        Self::new()
    }
}
