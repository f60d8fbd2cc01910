pub mod logger;

pub use logger::{CommandResult, SessionLogger};
