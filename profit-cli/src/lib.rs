pub mod commands;
pub mod logging;
pub mod render;
pub mod session;
pub mod tracker;
pub mod utils;

pub use session::{Session, SessionError, SessionReply};
pub use tracker::{GoalTracker, LogEntry, ProgressSummary};
