//! /pick - choose (or recall) today's member of the day.

use tracing::info;

use crate::bot::dispatcher::AppState;
use crate::database::StoreError;
use crate::selection::Outcome;

/// Handle /pick.
///
/// Repeated calls on the same day return the stored winner.
pub async fn pick_command(chat_id: i64, state: &AppState) -> Result<String, StoreError> {
    let outcome = state.engine.select_for_today(chat_id).await?;

    match outcome.winner() {
        Some(winner) => info!(
            "Chat {} member of the day for {}: user {} (new: {})",
            chat_id,
            winner.selection.day,
            winner.member.user_id,
            matches!(outcome, Outcome::JustSelected(_))
        ),
        None => info!("Chat {} has no members to pick from", chat_id),
    }

    Ok(state.formatter.selection(&outcome))
}
