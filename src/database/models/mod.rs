//! Database models.

pub mod member;
pub mod selection;
pub mod stats;

pub use member::Member;
pub use selection::{Commit, Selection};
pub use stats::{ChatSummary, DailyWinner, Ranking, StatsEntry};
