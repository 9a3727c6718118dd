//! In-process store backed by `DashMap`.
//!
//! Used for `STORAGE=memory` and in tests. Uniqueness comes from the map keys,
//! and `try_commit` goes through the entry API so the check and the insert
//! happen under one shard lock.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use super::error::StoreError;
use super::models::{Commit, Member, Selection};
use super::store::{MemberStore, SelectionStore};

/// Members and selections held in memory. Clones share the same maps.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    members: Arc<DashMap<(i64, u64), Member>>,
    selections: Arc<DashMap<(i64, NaiveDate), Selection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of selection rows across all chats.
    #[cfg(test)]
    pub fn selection_count(&self) -> usize {
        self.selections.len()
    }

    /// Number of member rows across all chats.
    #[cfg(test)]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

#[async_trait]
impl MemberStore for MemoryStore {
    async fn record(&self, member: &Member) -> Result<(), StoreError> {
        self.members
            .insert((member.chat_id, member.user_id), member.clone());
        Ok(())
    }

    async fn list_active(&self, chat_id: i64) -> Result<Vec<Member>, StoreError> {
        Ok(self
            .members
            .iter()
            .filter(|entry| entry.key().0 == chat_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn get(&self, chat_id: i64, user_id: u64) -> Result<Option<Member>, StoreError> {
        Ok(self.members.get(&(chat_id, user_id)).map(|m| m.clone()))
    }
}

#[async_trait]
impl SelectionStore for MemoryStore {
    async fn try_commit(&self, candidate: &Selection) -> Result<Commit, StoreError> {
        let commit = match self.selections.entry((candidate.chat_id, candidate.day)) {
            Entry::Occupied(existing) => Commit {
                selection: existing.get().clone(),
                was_first: false,
            },
            Entry::Vacant(slot) => {
                slot.insert(candidate.clone());
                Commit {
                    selection: candidate.clone(),
                    was_first: true,
                }
            }
        };

        debug!(
            "try_commit chat={} day={} first={}",
            candidate.chat_id, candidate.day, commit.was_first
        );
        Ok(commit)
    }

    async fn get(&self, chat_id: i64, day: NaiveDate) -> Result<Option<Selection>, StoreError> {
        Ok(self.selections.get(&(chat_id, day)).map(|s| s.clone()))
    }

    async fn list_by_chat(&self, chat_id: i64) -> Result<Vec<Selection>, StoreError> {
        let mut selections: Vec<Selection> = self
            .selections
            .iter()
            .filter(|entry| entry.key().0 == chat_id)
            .map(|entry| entry.value().clone())
            .collect();
        selections.sort_by_key(|s| s.day);
        Ok(selections)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[tokio::test]
    async fn test_record_same_identity_twice_keeps_one_row() {
        let store = MemoryStore::new();

        store
            .record(&Member::new(-100, 1, "Alice", None, None))
            .await
            .unwrap();
        store
            .record(&Member::new(-100, 1, "Alicia", Some("Smith".into()), Some("alicia".into())))
            .await
            .unwrap();

        let members = store.list_active(-100).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].display_name(), "Alicia Smith (@alicia)");
        assert_eq!(store.member_count(), 1);
    }

    #[tokio::test]
    async fn test_members_are_scoped_per_chat() {
        let store = MemoryStore::new();
        store.record(&Member::new(-1, 1, "A", None, None)).await.unwrap();
        store.record(&Member::new(-2, 1, "A", None, None)).await.unwrap();
        store.record(&Member::new(-2, 2, "B", None, None)).await.unwrap();

        assert_eq!(store.list_active(-1).await.unwrap().len(), 1);
        assert_eq!(store.list_active(-2).await.unwrap().len(), 2);
        assert!(store.list_active(-3).await.unwrap().is_empty());
        assert!(MemberStore::get(&store, -1, 2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_try_commit_keeps_first_writer() {
        let store = MemoryStore::new();
        let first = Selection::new(-100, day(1), 1, Utc::now());
        let second = Selection::new(-100, day(1), 2, Utc::now());

        let a = store.try_commit(&first).await.unwrap();
        let b = store.try_commit(&second).await.unwrap();

        assert!(a.was_first);
        assert!(!b.was_first);
        assert_eq!(b.selection.user_id, 1);
        assert_eq!(
            SelectionStore::get(&store, -100, day(1)).await.unwrap().map(|s| s.user_id),
            Some(1)
        );
        assert_eq!(store.selection_count(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_day_is_none() {
        let store = MemoryStore::new();
        assert!(SelectionStore::get(&store, -100, day(2)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_by_chat_sorted_by_day() {
        let store = MemoryStore::new();
        for d in [3, 1, 2] {
            store
                .try_commit(&Selection::new(-100, day(d), 1, Utc::now()))
                .await
                .unwrap();
        }
        store
            .try_commit(&Selection::new(-200, day(1), 1, Utc::now()))
            .await
            .unwrap();

        let days: Vec<_> = store
            .list_by_chat(-100)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.day)
            .collect();
        assert_eq!(days, vec![day(1), day(2), day(3)]);
    }
}
