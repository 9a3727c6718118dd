//! Pipeline stages, in the order they run.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{ChatKind, Command, Flow, RequestContext, Stage};
use crate::bot::dispatcher::AppState;
use crate::plugins;

/// Stops everything outside group chats with a fixed reply.
pub struct ChatTypeFilter;

#[async_trait]
impl Stage for ChatTypeFilter {
    fn name(&self) -> &'static str {
        "chat_type_filter"
    }

    async fn run(&self, ctx: &mut RequestContext, state: &AppState) -> Flow {
        if ctx.event.chat_kind == ChatKind::Group {
            return Flow::Continue;
        }

        debug!("Chat {} is not a group, replying group-only", ctx.event.chat_id);
        ctx.reply = Some(state.formatter.group_only());
        Flow::Halt
    }
}

/// Records the sender as a chat member before any command runs.
pub struct RecordMember;

#[async_trait]
impl Stage for RecordMember {
    fn name(&self) -> &'static str {
        "record_member"
    }

    async fn run(&self, ctx: &mut RequestContext, state: &AppState) -> Flow {
        let Some(sender) = &ctx.event.sender else {
            return Flow::Continue;
        };

        let member = sender.to_member(ctx.event.chat_id);
        if let Err(e) = state.members.record(&member).await {
            // Keep going: the command can still run against existing members.
            warn!(
                "Failed to record user {} in chat {} ({}): {}",
                member.user_id,
                member.chat_id,
                e.operation(),
                e
            );
        }
        Flow::Continue
    }
}

/// Parses the command and hands it to its plugin.
pub struct CommandRouter;

#[async_trait]
impl Stage for CommandRouter {
    fn name(&self) -> &'static str {
        "command_router"
    }

    async fn run(&self, ctx: &mut RequestContext, state: &AppState) -> Flow {
        let Some(command) = ctx
            .event
            .text
            .as_deref()
            .and_then(|text| Command::parse(text, &state.bot_username))
        else {
            return Flow::Halt;
        };

        let chat_id = ctx.event.chat_id;
        let user_id = ctx.event.sender.as_ref().map(|s| s.id).unwrap_or_default();
        info!("Command {} in chat {} by user {}", command, chat_id, user_id);

        let result = match &command {
            Command::Help => Ok(plugins::help::help_command(state)),
            Command::Pick => plugins::pick::pick_command(chat_id, state).await,
            Command::Stats => plugins::stats::stats_command(chat_id, state).await,
            Command::Info => plugins::info::info_command(chat_id, state).await,
            Command::Unknown(_) => Ok(state.formatter.unknown_command()),
        };

        ctx.reply = Some(match result {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    "Command {} failed in chat {} during {}: {}",
                    command,
                    chat_id,
                    e.operation(),
                    e
                );
                state.formatter.error(plugins::failure_detail(&command))
            }
        });
        Flow::Halt
    }
}
