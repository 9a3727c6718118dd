//! Win-count statistics.
//!
//! Rankings are derived on every request from the member and selection
//! stores; nothing here is persisted.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::database::{
    ChatSummary, DailyWinner, MemberStore, Ranking, SelectionStore, StatsEntry, StoreError,
};

/// Builds rankings and summaries for a chat.
pub struct StatsAggregator {
    members: Arc<dyn MemberStore>,
    selections: Arc<dyn SelectionStore>,
}

impl StatsAggregator {
    pub fn new(members: Arc<dyn MemberStore>, selections: Arc<dyn SelectionStore>) -> Self {
        Self {
            members,
            selections,
        }
    }

    /// Every member with their win count, most wins first.
    ///
    /// Ties are ordered by display name, then by user ID, so the same data
    /// always renders the same table.
    pub async fn rank(&self, chat_id: i64) -> Result<Ranking, StoreError> {
        let members = self.members.list_active(chat_id).await?;
        let selections = self.selections.list_by_chat(chat_id).await?;

        if members.is_empty() || selections.is_empty() {
            return Ok(Ranking::Empty);
        }

        let mut wins: HashMap<u64, u64> = HashMap::new();
        for selection in &selections {
            *wins.entry(selection.user_id).or_default() += 1;
        }

        let mut entries: Vec<StatsEntry> = members
            .into_iter()
            .map(|member| StatsEntry {
                wins: wins.get(&member.user_id).copied().unwrap_or(0),
                member,
            })
            .collect();
        entries.sort_by(compare_entries);

        Ok(Ranking::Entries(entries))
    }

    /// Member count, committed days, and today's winner (already resolved).
    pub async fn summary(
        &self,
        chat_id: i64,
        today: Option<DailyWinner>,
    ) -> Result<ChatSummary, StoreError> {
        let members = self.members.list_active(chat_id).await?.len();
        let days_played = self.selections.list_by_chat(chat_id).await?.len();

        Ok(ChatSummary {
            members,
            days_played,
            today,
        })
    }
}

fn compare_entries(a: &StatsEntry, b: &StatsEntry) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then_with(|| a.member.display_name().cmp(&b.member.display_name()))
        .then_with(|| a.member.user_id.cmp(&b.member.user_id))
}

/// Marker shown before a ranking position (1-based).
pub fn position_marker(position: usize) -> String {
    match position {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => format!("{}.", n),
    }
}

/// Date format used in user-facing text.
pub fn format_day(day: NaiveDate) -> String {
    day.format("%d.%m.%Y").to_string()
}
