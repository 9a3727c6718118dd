//! Command plugins.
//!
//! One module per command. The pipeline's router parses the command and
//! calls into the matching plugin; plugins return the reply text and leave
//! error reporting to the router.
//!
//! Add a new command by:
//! 1. Creating a new file in this directory
//! 2. Adding `pub mod your_plugin;` below
//! 3. Adding a variant to `pipeline::Command` and routing it in `CommandRouter`

pub mod help;
pub mod info;
pub mod pick;
pub mod stats;

use crate::pipeline::Command;

/// Fragment for the generic error reply, describing what failed.
pub fn failure_detail(command: &Command) -> &'static str {
    match command {
        Command::Pick => "while picking the member of the day",
        Command::Stats => "while loading statistics",
        Command::Info => "while loading chat info",
        Command::Help | Command::Unknown(_) => "while handling the command",
    }
}
