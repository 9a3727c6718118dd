//! /help and /start.

use crate::bot::dispatcher::AppState;

/// Usage text listing every command.
pub fn help_command(state: &AppState) -> String {
    state.formatter.help()
}
