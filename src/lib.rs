pub mod assistant;
pub mod audit;
pub mod config;
pub mod error;
pub mod llm;
pub mod preview;
pub mod security;
pub mod shell;

// Re-export commonly used types for convenience
pub use assistant::{Assistant, AssistantState, TaskOutcome};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use security::{SafetyGate, Verdict};
pub use shell::{CommandExecutor, EscalationSession};
