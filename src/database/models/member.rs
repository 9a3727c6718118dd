//! Chat member model.
//!
//! One row per (chat, user). Refreshed whenever the user is seen posting.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A user observed posting in a group chat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Owning chat.
    pub chat_id: i64,
    /// Telegram user ID.
    pub user_id: u64,
    pub first_name: String,
    pub last_name: Option<String>,
    /// Username without @, original case.
    pub username: Option<String>,
    /// Unix timestamp of the last stored write. Unchanged display fields
    /// skip the write in the MongoDB backend, so this is not a last-seen time.
    pub updated_at: i64,
}

impl Member {
    /// Create a member row stamped with the current time.
    pub fn new(
        chat_id: i64,
        user_id: u64,
        first_name: impl Into<String>,
        last_name: Option<String>,
        username: Option<String>,
    ) -> Self {
        Self {
            chat_id,
            user_id,
            first_name: first_name.into(),
            last_name: last_name.filter(|s| !s.is_empty()),
            username: username.filter(|s| !s.is_empty()),
            updated_at: Utc::now().timestamp(),
        }
    }

    /// "First Last", or just "First".
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }

    /// "First Last (@handle)" with absent parts omitted.
    pub fn display_name(&self) -> String {
        match &self.username {
            Some(username) => format!("{} (@{})", self.full_name(), username),
            None => self.full_name(),
        }
    }

    /// Whether any display field differs from `other`.
    pub fn has_changed(&self, other: &Member) -> bool {
        self.first_name != other.first_name
            || self.last_name != other.last_name
            || self.username != other.username
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let full = Member::new(1, 1, "Ivan", Some("Petrov".into()), Some("ivan_petrov".into()));
        assert_eq!(full.display_name(), "Ivan Petrov (@ivan_petrov)");

        let first_and_handle = Member::new(1, 2, "Anna", None, Some("anna".into()));
        assert_eq!(first_and_handle.display_name(), "Anna (@anna)");

        let first_last = Member::new(1, 3, "Maria", Some("Sidorova".into()), None);
        assert_eq!(first_last.display_name(), "Maria Sidorova");

        let first_only = Member::new(1, 4, "Peter", Some(String::new()), Some(String::new()));
        assert_eq!(first_only.display_name(), "Peter");
    }

    #[test]
    fn test_has_changed_ignores_timestamp() {
        let a = Member::new(1, 1, "Ivan", None, None);
        let mut b = a.clone();
        b.updated_at += 60;
        assert!(!a.has_changed(&b));

        b.username = Some("ivan".into());
        assert!(a.has_changed(&b));
    }
}
