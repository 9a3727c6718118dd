//! Shared test fixtures.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::database::{Commit, Member, MemberStore, MemoryStore, Selection, SelectionStore, StoreError};
use crate::selection::{FixedClock, SelectionEngine};

/// Member with only a first name.
pub fn member(chat_id: i64, user_id: u64, first_name: &str) -> Member {
    Member::new(chat_id, user_id, first_name, None, None)
}

/// Engine over an in-memory store with a pinned clock and seeded RNG.
pub fn engine_on(store: &MemoryStore, clock: FixedClock, seed: u64) -> SelectionEngine {
    SelectionEngine::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(clock),
        StdRng::seed_from_u64(seed),
    )
}

/// Yields to the scheduler before every store call so concurrent requests
/// interleave between the read and the commit.
pub struct YieldingStore(MemoryStore);

impl YieldingStore {
    pub fn new(store: MemoryStore) -> Self {
        Self(store)
    }
}

#[async_trait]
impl MemberStore for YieldingStore {
    async fn record(&self, member: &Member) -> Result<(), StoreError> {
        tokio::task::yield_now().await;
        self.0.record(member).await
    }

    async fn list_active(&self, chat_id: i64) -> Result<Vec<Member>, StoreError> {
        tokio::task::yield_now().await;
        self.0.list_active(chat_id).await
    }

    async fn get(&self, chat_id: i64, user_id: u64) -> Result<Option<Member>, StoreError> {
        tokio::task::yield_now().await;
        MemberStore::get(&self.0, chat_id, user_id).await
    }
}

#[async_trait]
impl SelectionStore for YieldingStore {
    async fn try_commit(&self, candidate: &Selection) -> Result<Commit, StoreError> {
        tokio::task::yield_now().await;
        self.0.try_commit(candidate).await
    }

    async fn get(&self, chat_id: i64, day: NaiveDate) -> Result<Option<Selection>, StoreError> {
        tokio::task::yield_now().await;
        SelectionStore::get(&self.0, chat_id, day).await
    }

    async fn list_by_chat(&self, chat_id: i64) -> Result<Vec<Selection>, StoreError> {
        tokio::task::yield_now().await;
        self.0.list_by_chat(chat_id).await
    }
}

/// Store whose every call fails, for error-path tests.
pub struct BrokenStore;

#[async_trait]
impl MemberStore for BrokenStore {
    async fn record(&self, _: &Member) -> Result<(), StoreError> {
        Err(StoreError::unavailable("record_member", "connection refused"))
    }

    async fn list_active(&self, _: i64) -> Result<Vec<Member>, StoreError> {
        Err(StoreError::unavailable("list_members", "connection refused"))
    }

    async fn get(&self, _: i64, _: u64) -> Result<Option<Member>, StoreError> {
        Err(StoreError::unavailable("get_member", "connection refused"))
    }
}

#[async_trait]
impl SelectionStore for BrokenStore {
    async fn try_commit(&self, _: &Selection) -> Result<Commit, StoreError> {
        Err(StoreError::unavailable("commit_selection", "connection refused"))
    }

    async fn get(&self, _: i64, _: NaiveDate) -> Result<Option<Selection>, StoreError> {
        Err(StoreError::unavailable("get_selection", "connection refused"))
    }

    async fn list_by_chat(&self, _: i64) -> Result<Vec<Selection>, StoreError> {
        Err(StoreError::unavailable("list_selections", "connection refused"))
    }
}
