//! Selection repository (MongoDB).
//!
//! `try_commit` is a plain `insert_one` against the (chat_id, day) unique
//! index: the server decides the winner, a duplicate-key error means another
//! writer got there first. Committed rows never change, so they are cached.

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::doc;
use tracing::{debug, info};

use super::member_repository::is_duplicate_key;
use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::database::mongo::ensure_unique_index;
use crate::database::{Commit, Database, Selection, SelectionStore, StoreError};

/// Repository for daily selections.
pub struct SelectionRepository {
    collection: Collection<Selection>,
    by_day: TypedCache<(i64, NaiveDate), Selection>,
}

/// Day key as stored, `YYYY-MM-DD`.
fn day_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

impl SelectionRepository {
    pub fn new(db: &Database, cache: &CacheRegistry) -> Self {
        Self {
            collection: db.collection("selections"),
            by_day: cache.get_or_create("selections_by_day", CacheConfig::immutable()),
        }
    }

    /// Create and verify the (chat_id, day) unique index.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        ensure_unique_index(
            &self.collection,
            "chat_day_unique",
            doc! { "chat_id": 1, "day": 1 },
        )
        .await
    }

    async fn fetch(&self, chat_id: i64, day: NaiveDate) -> Result<Option<Selection>, StoreError> {
        let found = self
            .collection
            .find_one(doc! { "chat_id": chat_id, "day": day_key(day) })
            .await
            .map_err(|e| StoreError::unavailable("get_selection", e))?;

        if let Some(selection) = &found {
            self.by_day.insert((chat_id, day), selection.clone());
        }
        Ok(found)
    }
}

#[async_trait]
impl SelectionStore for SelectionRepository {
    async fn try_commit(&self, candidate: &Selection) -> Result<Commit, StoreError> {
        match self.collection.insert_one(candidate).await {
            Ok(_) => {
                info!(
                    "Committed user {} for chat {} on {}",
                    candidate.user_id, candidate.chat_id, candidate.day
                );
                self.by_day
                    .insert((candidate.chat_id, candidate.day), candidate.clone());
                Ok(Commit {
                    selection: candidate.clone(),
                    was_first: true,
                })
            }
            Err(e) if is_duplicate_key(&e) => {
                debug!(
                    "Lost commit race for chat {} on {}",
                    candidate.chat_id, candidate.day
                );
                let existing = self
                    .fetch(candidate.chat_id, candidate.day)
                    .await?
                    .ok_or_else(|| {
                        StoreError::unavailable(
                            "commit_selection",
                            "duplicate key reported but no row found",
                        )
                    })?;
                Ok(Commit {
                    selection: existing,
                    was_first: false,
                })
            }
            Err(e) => Err(StoreError::unavailable("commit_selection", e)),
        }
    }

    async fn get(&self, chat_id: i64, day: NaiveDate) -> Result<Option<Selection>, StoreError> {
        if let Some(selection) = self.by_day.get(&(chat_id, day)) {
            return Ok(Some(selection));
        }
        self.fetch(chat_id, day).await
    }

    async fn list_by_chat(&self, chat_id: i64) -> Result<Vec<Selection>, StoreError> {
        self.collection
            .find(doc! { "chat_id": chat_id })
            .sort(doc! { "day": 1 })
            .await
            .map_err(|e| StoreError::unavailable("list_selections", e))?
            .try_collect()
            .await
            .map_err(|e| StoreError::unavailable("list_selections", e))
    }
}
