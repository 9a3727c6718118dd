//! Store error type shared by every backend.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures at the persistence boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached or rejected the operation.
    #[error("store unavailable during {operation}: {source}")]
    Unavailable {
        operation: &'static str,
        #[source]
        source: BoxError,
    },

    /// A selection names a user with no member row in that chat.
    #[error("selection in chat {chat_id} references unknown member {user_id}")]
    DanglingSelection { chat_id: i64, user_id: u64 },
}

impl StoreError {
    pub fn unavailable(operation: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Unavailable {
            operation,
            source: source.into(),
        }
    }

    /// Name of the failing operation, for logs.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Unavailable { operation, .. } => operation,
            Self::DanglingSelection { .. } => "resolve_winner",
        }
    }
}
