pub mod gate;

pub use gate::{BlockReason, SafetyGate, Verdict};

/// Default allowlist of command prefixes
///
/// A command is permitted only when its text starts with one of these strings.
/// Matching is a plain prefix check, so `mkdirfoo` matches `mkdir`.
pub const DEFAULT_ALLOWED_PREFIXES: &[&str] = &[
    // Package and service management
    "sudo apt",
    "apt",
    "systemctl",
    "service",
    // File operations
    "mkdir",
    "rm",
    "cp",
    "mv",
    "echo",
    "cat",
    "nano",
    "touch",
    // Permissions
    "chmod",
    "chown",
];

/// Default denylist of dangerous fragments
///
/// A command containing any of these anywhere in its text is blocked,
/// even if it also starts with an allowed prefix.
pub const DEFAULT_DENIED_PATTERNS: &[&str] = &[
    "rm -rf /",
    "mkfs",
    "dd if=",
    ":(){:|:&};:",
    "shutdown",
    "reboot",
    "poweroff",
];
