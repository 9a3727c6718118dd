//! Daily selection model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The committed winner of one chat on one calendar day.
///
/// At most one exists per (chat_id, day); once written it never changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub chat_id: i64,
    /// Calendar day, serialized as `YYYY-MM-DD`.
    pub day: NaiveDate,
    /// Winning member's user ID.
    pub user_id: u64,
    pub committed_at: DateTime<Utc>,
}

impl Selection {
    pub fn new(chat_id: i64, day: NaiveDate, user_id: u64, committed_at: DateTime<Utc>) -> Self {
        Self {
            chat_id,
            day,
            user_id,
            committed_at,
        }
    }
}

/// Result of an insert-if-absent against the (chat, day) key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    /// The row the store holds after the attempt.
    pub selection: Selection,
    /// `true` if this attempt created the row, `false` if one already existed.
    pub was_first: bool,
}
