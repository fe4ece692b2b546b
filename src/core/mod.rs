/// Host-side functionality
///
/// Applies interpreted commands to the SQLite store, computes
/// productivity reports, and ties a conversation together.

pub mod analytics;
pub mod dispatcher;
pub mod session;

pub use analytics::{Period, ProductivityReport};
pub use dispatcher::{DayAgenda, Dispatcher, Outcome};
pub use session::{Exchange, Session};
