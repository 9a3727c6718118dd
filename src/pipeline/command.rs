//! Bot commands and their parsing.

use std::fmt;

/// Commands the bot answers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/help`, also `/start`.
    Help,
    Pick,
    Stats,
    Info,
    /// Any other `/command` addressed to us.
    Unknown(String),
}

impl Command {
    /// Entries for the Telegram command menu.
    pub const MENU: [(&'static str, &'static str); 4] = [
        ("pick", "Pick the member of the day"),
        ("stats", "Show win statistics"),
        ("info", "Show chat info and today's pick"),
        ("help", "Show help"),
    ];

    /// Parse the leading `/command[@bot] args...` of a message.
    ///
    /// Returns `None` for plain text and for commands addressed to another
    /// bot. Arguments are ignored.
    pub fn parse(text: &str, bot_username: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let word = word.strip_prefix('/')?;

        let name = match word.split_once('@') {
            Some((name, target)) if target.eq_ignore_ascii_case(bot_username) => name,
            Some(_) => return None,
            None => word,
        };
        if name.is_empty() {
            return None;
        }

        let command = match name.to_lowercase().as_str() {
            "help" | "start" => Self::Help,
            "pick" => Self::Pick,
            "stats" => Self::Stats,
            "info" => Self::Info,
            other => Self::Unknown(other.to_string()),
        };
        Some(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Help => write!(f, "/help"),
            Self::Pick => write!(f, "/pick"),
            Self::Stats => write!(f, "/stats"),
            Self::Info => write!(f, "/info"),
            Self::Unknown(name) => write!(f, "/{}", name),
        }
    }
}
