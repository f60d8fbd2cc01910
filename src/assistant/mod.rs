pub mod console;
pub mod session;

pub use console::{Console, ScriptedConsole, TerminalConsole};
pub use session::{Assistant, AssistantState, TaskOutcome};
