//! /stats - win counts for everyone in the chat.

use crate::bot::dispatcher::AppState;
use crate::database::StoreError;

pub async fn stats_command(chat_id: i64, state: &AppState) -> Result<String, StoreError> {
    let ranking = state.stats.rank(chat_id).await?;
    Ok(state.formatter.stats(&ranking))
}
