//! Member-of-the-day selection.
//!
//! Per (chat, day) there are two states, unset and committed, and the move
//! between them happens exactly once, inside `SelectionStore::try_commit`.
//! The engine reads, picks a candidate, and proposes it; whatever the store
//! ends up holding is what gets reported, even when the local candidate lost.

mod clock;

use std::sync::Arc;

use parking_lot::Mutex;
use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, info};

pub use clock::{Clock, SystemClock};
#[cfg(test)]
pub use clock::FixedClock;

use crate::database::{DailyWinner, Member, MemberStore, Selection, SelectionStore, StoreError};

/// Result of asking for today's member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Today was already decided, by an earlier call or a concurrent one.
    AlreadySelected(DailyWinner),
    /// This call committed today's winner.
    JustSelected(DailyWinner),
    /// Nobody has been seen in the chat yet.
    NoActiveMembers,
}

impl Outcome {
    pub fn winner(&self) -> Option<&DailyWinner> {
        match self {
            Self::AlreadySelected(w) | Self::JustSelected(w) => Some(w),
            Self::NoActiveMembers => None,
        }
    }
}

/// Picks and remembers one member per chat per day.
///
/// Holds no store state; safe to share behind an `Arc` across tasks.
pub struct SelectionEngine {
    members: Arc<dyn MemberStore>,
    selections: Arc<dyn SelectionStore>,
    clock: Arc<dyn Clock>,
    rng: Mutex<StdRng>,
}

impl SelectionEngine {
    pub fn new(
        members: Arc<dyn MemberStore>,
        selections: Arc<dyn SelectionStore>,
        clock: Arc<dyn Clock>,
        rng: StdRng,
    ) -> Self {
        Self {
            members,
            selections,
            clock,
            rng: Mutex::new(rng),
        }
    }

    /// Return today's committed member, committing a random one if needed.
    pub async fn select_for_today(&self, chat_id: i64) -> Result<Outcome, StoreError> {
        let day = self.clock.today();

        if let Some(existing) = self.selections.get(chat_id, day).await? {
            debug!("Chat {} already has a winner for {}", chat_id, day);
            let winner = self.resolve(existing, &[]).await?;
            return Ok(Outcome::AlreadySelected(winner));
        }

        let mut members = self.members.list_active(chat_id).await?;
        // Store order is unspecified; picks index into a stable order.
        members.sort_by_key(|m| m.user_id);
        let Some(candidate) = self.pick(&members) else {
            return Ok(Outcome::NoActiveMembers);
        };

        let proposal = Selection::new(chat_id, day, candidate.user_id, self.clock.now());
        let commit = self.selections.try_commit(&proposal).await?;
        let winner = self.resolve(commit.selection, &members).await?;

        if commit.was_first {
            info!(
                "Chat {} picked user {} for {} out of {} members",
                chat_id,
                winner.member.user_id,
                day,
                members.len()
            );
            Ok(Outcome::JustSelected(winner))
        } else {
            debug!("Chat {} lost the commit race for {}", chat_id, day);
            Ok(Outcome::AlreadySelected(winner))
        }
    }

    /// Today's winner, if one was committed. Never commits.
    pub async fn current(&self, chat_id: i64) -> Result<Option<DailyWinner>, StoreError> {
        match self.selections.get(chat_id, self.clock.today()).await? {
            Some(selection) => Ok(Some(self.resolve(selection, &[]).await?)),
            None => Ok(None),
        }
    }

    /// Attach the member row to a selection, looking in `known` first.
    async fn resolve(
        &self,
        selection: Selection,
        known: &[Member],
    ) -> Result<DailyWinner, StoreError> {
        let member = match known.iter().find(|m| m.user_id == selection.user_id) {
            Some(member) => member.clone(),
            None => self
                .members
                .get(selection.chat_id, selection.user_id)
                .await?
                .ok_or(StoreError::DanglingSelection {
                    chat_id: selection.chat_id,
                    user_id: selection.user_id,
                })?,
        };
        Ok(DailyWinner { selection, member })
    }

    fn pick<'a>(&self, members: &'a [Member]) -> Option<&'a Member> {
        let mut rng = self.rng.lock();
        pick_uniform(members, &mut *rng)
    }
}

/// Uniform choice over `members`; `None` when empty.
pub fn pick_uniform<'a, R: Rng + ?Sized>(members: &'a [Member], rng: &mut R) -> Option<&'a Member> {
    if members.is_empty() {
        return None;
    }
    members.get(rng.random_range(0..members.len()))
}
