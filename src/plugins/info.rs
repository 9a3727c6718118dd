//! /info - chat summary with today's pick, if one was made.
//!
//! Never commits a selection.

use crate::bot::dispatcher::AppState;
use crate::database::StoreError;

pub async fn info_command(chat_id: i64, state: &AppState) -> Result<String, StoreError> {
    let today = state.engine.current(chat_id).await?;
    let summary = state.stats.summary(chat_id, today).await?;
    Ok(state.formatter.info(&summary))
}
