//! Dispatch pipeline.
//!
//! Every inbound message runs through an ordered list of stages. A stage
//! either lets the message continue or halts with (optionally) a reply. The
//! pipeline knows nothing about Telegram; the bot module converts updates
//! into [`InboundEvent`]s and sends back whatever reply comes out.

mod command;
mod event;
mod stages;

pub use command::Command;
pub use event::{ChatKind, InboundEvent, Sender};
pub use stages::{ChatTypeFilter, CommandRouter, RecordMember};

use async_trait::async_trait;
use tracing::debug;

use crate::bot::dispatcher::AppState;

/// Per-message state passed through the stages.
#[derive(Debug)]
pub struct RequestContext {
    pub event: InboundEvent,
    /// Text to send back, if any.
    pub reply: Option<String>,
}

/// What happens after a stage ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

/// One step of message handling.
#[async_trait]
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, ctx: &mut RequestContext, state: &AppState) -> Flow;
}

/// Ordered stages for inbound messages.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Group filter, then member recording, then command routing.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(ChatTypeFilter),
            Box::new(RecordMember),
            Box::new(CommandRouter),
        ])
    }

    /// Run `event` through the stages and return the reply to send, if any.
    pub async fn handle(&self, event: InboundEvent, state: &AppState) -> Option<String> {
        let mut ctx = RequestContext { event, reply: None };

        for stage in &self.stages {
            if stage.run(&mut ctx, state).await == Flow::Halt {
                debug!("Pipeline halted at {}", stage.name());
                break;
            }
        }

        ctx.reply
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::database::{MemberStore, MemoryStore, SelectionStore};
    use crate::selection::FixedClock;
    use crate::templates::MessageFormatter;
    use crate::testing::BrokenStore;

    const CHAT: i64 = -1001;
    const BOT: &str = "daypick_bot";

    fn state_with(members: Arc<dyn MemberStore>, selections: Arc<dyn SelectionStore>) -> AppState {
        AppState::new(
            members,
            selections,
            Arc::new(FixedClock::on(2024, 5, 1)),
            StdRng::seed_from_u64(3),
            MessageFormatter::embedded().unwrap(),
            BOT.to_string(),
        )
    }

    fn state(store: &MemoryStore) -> AppState {
        state_with(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    fn group_message(user_id: u64, name: &str, text: &str) -> InboundEvent {
        InboundEvent {
            chat_id: CHAT,
            chat_kind: ChatKind::Group,
            sender: Some(Sender {
                id: user_id,
                first_name: name.to_string(),
                last_name: None,
                username: None,
            }),
            text: Some(text.to_string()),
        }
    }

    #[tokio::test]
    async fn test_private_chat_gets_group_only_reply() {
        let store = MemoryStore::new();
        let state = state(&store);
        let mut event = group_message(1, "Alice", "/pick");
        event.chat_id = 1;
        event.chat_kind = ChatKind::Private;

        let reply = Pipeline::standard().handle(event, &state).await;

        assert_eq!(reply, Some(state.formatter.group_only()));
        assert_eq!(store.member_count(), 0);
        assert_eq!(store.selection_count(), 0);
    }

    #[tokio::test]
    async fn test_plain_text_records_member_silently() {
        let store = MemoryStore::new();
        let state = state(&store);

        let reply = Pipeline::standard()
            .handle(group_message(1, "Alice", "good morning"), &state)
            .await;

        assert_eq!(reply, None);
        let members = store.list_active(CHAT).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].first_name, "Alice");
    }

    #[tokio::test]
    async fn test_event_without_text_or_sender() {
        let store = MemoryStore::new();
        let state = state(&store);
        let event = InboundEvent {
            chat_id: CHAT,
            chat_kind: ChatKind::Group,
            sender: None,
            text: None,
        };

        assert_eq!(Pipeline::standard().handle(event, &state).await, None);
        assert_eq!(store.member_count(), 0);
    }

    #[tokio::test]
    async fn test_pick_then_already_selected() {
        let store = MemoryStore::new();
        let state = state(&store);
        let pipeline = Pipeline::standard();

        let first = pipeline
            .handle(group_message(1, "Alice", "/pick"), &state)
            .await
            .unwrap();
        let second = pipeline
            .handle(group_message(1, "Alice", "/pick@DayPick_Bot"), &state)
            .await
            .unwrap();

        assert!(first.contains("Alice"));
        assert!(second.contains("Alice"));
        assert_ne!(first, second);
        assert_eq!(store.selection_count(), 1);
    }

    #[tokio::test]
    async fn test_sender_is_eligible_on_first_message() {
        let store = MemoryStore::new();
        let state = state(&store);

        let reply = Pipeline::standard()
            .handle(group_message(7, "Newcomer", "/pick"), &state)
            .await
            .unwrap();

        assert!(reply.contains("Newcomer"));
        assert_ne!(reply, state.formatter.selection(&crate::selection::Outcome::NoActiveMembers));
    }

    #[tokio::test]
    async fn test_unknown_command_and_other_bot() {
        let store = MemoryStore::new();
        let state = state(&store);
        let pipeline = Pipeline::standard();

        let unknown = pipeline
            .handle(group_message(1, "Alice", "/dance"), &state)
            .await;
        assert_eq!(unknown, Some(state.formatter.unknown_command()));

        let other = pipeline
            .handle(group_message(1, "Alice", "/pick@other_bot"), &state)
            .await;
        assert_eq!(other, None);
        assert_eq!(store.selection_count(), 0);
        // Still recorded as a member.
        assert_eq!(store.member_count(), 1);
    }

    #[tokio::test]
    async fn test_help_command() {
        let store = MemoryStore::new();
        let state = state(&store);

        let reply = Pipeline::standard()
            .handle(group_message(1, "Alice", "/start"), &state)
            .await;

        assert_eq!(reply, Some(state.formatter.help()));
    }

    #[tokio::test]
    async fn test_stats_and_info() {
        let store = MemoryStore::new();
        let state = state(&store);
        let pipeline = Pipeline::standard();

        let empty = pipeline
            .handle(group_message(1, "Alice", "/stats"), &state)
            .await
            .unwrap();
        assert_eq!(empty, state.formatter.stats(&crate::database::Ranking::Empty));

        pipeline
            .handle(group_message(2, "Bob", "hi"), &state)
            .await;
        let picked = pipeline
            .handle(group_message(1, "Alice", "/pick"), &state)
            .await
            .unwrap();
        let winner = if picked.contains("Alice") { "Alice" } else { "Bob" };

        let stats = pipeline
            .handle(group_message(1, "Alice", "/stats"), &state)
            .await
            .unwrap();
        assert!(stats.contains(winner));
        assert!(stats.contains("1 times"));

        let info = pipeline
            .handle(group_message(1, "Alice", "/info"), &state)
            .await
            .unwrap();
        assert!(info.contains(winner));
        assert!(info.contains("01.05.2024"));
    }

    #[tokio::test]
    async fn test_store_failure_becomes_error_reply() {
        let state = state_with(Arc::new(BrokenStore), Arc::new(BrokenStore));
        let pipeline = Pipeline::standard();

        for (text, detail) in [
            ("/pick", "while picking the member of the day"),
            ("/stats", "while loading statistics"),
            ("/info", "while loading chat info"),
        ] {
            let reply = pipeline
                .handle(group_message(1, "Alice", text), &state)
                .await;
            assert_eq!(reply, Some(state.formatter.error(detail)));
        }
    }

    #[tokio::test]
    async fn test_record_failure_does_not_block_help() {
        let state = state_with(Arc::new(BrokenStore), Arc::new(MemoryStore::new()));

        let reply = Pipeline::standard()
            .handle(group_message(1, "Alice", "/help"), &state)
            .await;

        assert_eq!(reply, Some(state.formatter.help()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_picks_name_one_winner() {
        let store = MemoryStore::new();
        let state = state(&store);
        let pipeline = Arc::new(Pipeline::standard());
        let names = ["Alice", "Bob", "Carol", "Dave", "Erin", "Frank"];

        let handles: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let pipeline = pipeline.clone();
                let state = state.clone();
                let event = group_message(i as u64 + 1, name, "/pick");
                tokio::spawn(async move { pipeline.handle(event, &state).await })
            })
            .collect();

        let mut replies = Vec::new();
        for handle in handles {
            replies.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(store.selection_count(), 1);
        let winner_id = store.list_by_chat(CHAT).await.unwrap()[0].user_id;
        let winner = names[winner_id as usize - 1];
        assert!(replies.iter().all(|r| r.contains(winner)));
    }
}
