/// Natural-language command interpretation
///
/// Text in, `CommandResult` out. No I/O happens below this module.

pub mod command;
pub mod context;
pub mod fuzzy;
pub mod inference;
pub mod normalizer;
pub mod patterns;
pub mod processor;
pub mod slots;
pub mod snapshot;
pub mod suggestions;
pub mod temporal;

pub use command::{Action, CommandResult, Slot, SlotSource, TaskRef};
pub use context::{ContextEntry, ConversationContext};
pub use patterns::{IntentKind, IntentTable};
pub use processor::CommandProcessor;
pub use snapshot::Snapshot;
pub use suggestions::{SmartSuggestion, SuggestionEngine};
pub use temporal::DateResolver;
