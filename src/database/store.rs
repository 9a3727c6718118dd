//! Storage seams for members and selections.
//!
//! The MongoDB repositories and the in-process `MemoryStore` both implement
//! these traits; everything above the database module only sees the traits.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::StoreError;
use super::models::{Commit, Member, Selection};

/// Members observed per chat. Monotonic: there is no delete.
#[async_trait]
pub trait MemberStore: Send + Sync {
    /// Insert or refresh a member's display fields. Idempotent.
    async fn record(&self, member: &Member) -> Result<(), StoreError>;

    /// All known members of a chat, in no particular order.
    async fn list_active(&self, chat_id: i64) -> Result<Vec<Member>, StoreError>;

    async fn get(&self, chat_id: i64, user_id: u64) -> Result<Option<Member>, StoreError>;
}

/// Committed winners, at most one per (chat, day).
#[async_trait]
pub trait SelectionStore: Send + Sync {
    /// Atomically insert `candidate` unless its (chat, day) is taken.
    ///
    /// Never overwrites. Losing the race is not an error: the returned commit
    /// carries the existing row with `was_first == false`.
    async fn try_commit(&self, candidate: &Selection) -> Result<Commit, StoreError>;

    /// The committed selection for a day, or `None` if nobody was picked yet.
    async fn get(&self, chat_id: i64, day: NaiveDate) -> Result<Option<Selection>, StoreError>;

    /// Every selection ever committed in a chat.
    async fn list_by_chat(&self, chat_id: i64) -> Result<Vec<Selection>, StoreError>;
}
