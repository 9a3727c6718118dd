//! Member repository (MongoDB).
//!
//! Every group message refreshes the sender's row, so writes whose display
//! fields match the last written row are skipped via a dedup cache.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use tracing::debug;

use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::database::mongo::ensure_unique_index;
use crate::database::{Database, Member, MemberStore, StoreError};

const DUPLICATE_KEY: i32 = 11000;

/// Repository for chat members.
pub struct MemberRepository {
    collection: Collection<Member>,
    /// (chat_id, user_id) -> last row written by this process.
    written: TypedCache<(i64, u64), Member>,
}

impl MemberRepository {
    pub fn new(db: &Database, cache: &CacheRegistry) -> Self {
        Self {
            collection: db.collection("members"),
            written: cache.get_or_create("members_written", CacheConfig::write_dedup()),
        }
    }

    /// Create and verify the (chat_id, user_id) unique index.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        ensure_unique_index(
            &self.collection,
            "chat_user_unique",
            doc! { "chat_id": 1, "user_id": 1 },
        )
        .await
    }

    async fn upsert(&self, member: &Member) -> Result<(), mongodb::error::Error> {
        let filter = doc! { "chat_id": member.chat_id, "user_id": member.user_id as i64 };
        let update = doc! {
            "$set": {
                "first_name": member.first_name.clone(),
                "last_name": member.last_name.clone(),
                "username": member.username.clone(),
                "updated_at": member.updated_at,
            }
        };

        match self
            .collection
            .update_one(filter.clone(), update.clone())
            .upsert(true)
            .await
        {
            Ok(_) => Ok(()),
            // Two concurrent upserts of a new row: the loser updates the winner's row.
            Err(e) if is_duplicate_key(&e) => {
                self.collection.update_one(filter, update).await?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

pub(super) fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl MemberStore for MemberRepository {
    async fn record(&self, member: &Member) -> Result<(), StoreError> {
        let key = (member.chat_id, member.user_id);
        if let Some(previous) = self.written.get(&key)
            && !previous.has_changed(member)
        {
            debug!("Member {} unchanged ({} hit)", member.user_id, self.written.name());
            return Ok(());
        }

        self.upsert(member)
            .await
            .map_err(|e| StoreError::unavailable("record_member", e))?;
        self.written.insert(key, member.clone());

        debug!("Recorded member {} in chat {}", member.user_id, member.chat_id);
        Ok(())
    }

    async fn list_active(&self, chat_id: i64) -> Result<Vec<Member>, StoreError> {
        self.collection
            .find(doc! { "chat_id": chat_id })
            .await
            .map_err(|e| StoreError::unavailable("list_members", e))?
            .try_collect()
            .await
            .map_err(|e| StoreError::unavailable("list_members", e))
    }

    async fn get(&self, chat_id: i64, user_id: u64) -> Result<Option<Member>, StoreError> {
        self.collection
            .find_one(doc! { "chat_id": chat_id, "user_id": user_id as i64 })
            .await
            .map_err(|e| StoreError::unavailable("get_member", e))
    }
}
