/// errand library
///
/// Natural-language command interpretation for tasks, notes, reminders
/// and calendar events, plus the SQLite-backed host that applies it.

pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod interpreter;

// Re-exports for convenience
pub use config::Config;
pub use db::Database;
pub use error::{ErrandError, Result};
pub use interpreter::{CommandProcessor, CommandResult, ConversationContext, Snapshot};
