//! Derived statistics models. Computed on demand, never stored.

use super::Member;

/// A member and how many days they won in their chat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsEntry {
    pub member: Member,
    pub wins: u64,
}

/// Ranked win counts for a chat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ranking {
    /// No members recorded or no day ever committed.
    Empty,
    /// Every member, most wins first.
    Entries(Vec<StatsEntry>),
}

/// Member of the day, resolved against the membership rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DailyWinner {
    pub selection: super::Selection,
    pub member: Member,
}

/// Overview of a chat for `/info`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatSummary {
    pub members: usize,
    pub days_played: usize,
    pub today: Option<DailyWinner>,
}
