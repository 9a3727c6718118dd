//! Bot module - Telegram transport.

pub mod dispatcher;
mod runtime;
mod webhook;

pub use dispatcher::{AppState, ThrottledBot, build_dispatcher, register_commands};
pub use runtime::run;
