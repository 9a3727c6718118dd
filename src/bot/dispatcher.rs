//! Message dispatcher setup.
//!
//! Converts Telegram updates into pipeline events and sends replies back.

use std::sync::Arc;

use rand::rngs::StdRng;
use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, LinkPreviewOptions, ReplyParameters};
use tracing::{info, warn};

use crate::database::{MemberStore, SelectionStore};
use crate::pipeline::{ChatKind, Command, InboundEvent, Pipeline, Sender};
use crate::selection::{Clock, SelectionEngine};
use crate::stats::StatsAggregator;
use crate::templates::MessageFormatter;

/// Bot type with Throttle adaptor for automatic rate limiting.
pub type ThrottledBot = Throttle<Bot>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Member store, written on every group message.
    pub members: Arc<dyn MemberStore>,

    /// Daily selection engine.
    pub engine: Arc<SelectionEngine>,

    /// Rankings and chat summaries.
    pub stats: Arc<StatsAggregator>,

    /// Reply text rendering.
    pub formatter: Arc<MessageFormatter>,

    /// Bot username (without @) for matching `/cmd@botname`.
    pub bot_username: String,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        members: Arc<dyn MemberStore>,
        selections: Arc<dyn SelectionStore>,
        clock: Arc<dyn Clock>,
        rng: StdRng,
        formatter: MessageFormatter,
        bot_username: String,
    ) -> Self {
        let engine = SelectionEngine::new(members.clone(), selections.clone(), clock, rng);
        let stats = StatsAggregator::new(members.clone(), selections);

        Self {
            members,
            engine: Arc::new(engine),
            stats: Arc::new(stats),
            formatter: Arc::new(formatter),
            bot_username,
        }
    }
}

/// Build the dispatcher with the message pipeline.
pub fn build_dispatcher(
    bot: ThrottledBot,
    state: AppState,
) -> Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey> {
    let pipeline = Arc::new(Pipeline::standard());

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state, pipeline])
        .enable_ctrlc_handler()
        .build()
}

/// Build the handler schema.
fn schema() -> UpdateHandler<anyhow::Error> {
    use teloxide::dispatching::UpdateFilterExt;

    Update::filter_message().endpoint(handle_message)
}

/// Run one message through the pipeline and deliver the reply.
async fn handle_message(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    pipeline: Arc<Pipeline>,
) -> anyhow::Result<()> {
    let event = inbound_event(&msg);

    if let Some(text) = pipeline.handle(event, &state).await {
        send_reply(&bot, &msg, text).await;
    }

    Ok(())
}

/// Register the command menu shown by Telegram clients.
pub async fn register_commands(bot: &ThrottledBot) {
    let commands: Vec<BotCommand> = Command::MENU
        .iter()
        .map(|(name, description)| BotCommand::new(*name, *description))
        .collect();

    match bot.set_my_commands(commands).await {
        Ok(_) => info!("Bot command menu registered"),
        Err(e) => warn!("Failed to register bot commands: {}", e),
    }
}

fn inbound_event(msg: &Message) -> InboundEvent {
    let chat_kind = if msg.chat.is_group() || msg.chat.is_supergroup() {
        ChatKind::Group
    } else if msg.chat.is_private() {
        ChatKind::Private
    } else {
        ChatKind::Other
    };

    // Anonymous admins and linked-channel posts carry a placeholder `from`
    // user; the real author is `sender_chat`, which is never a member.
    let sender = msg
        .from
        .as_ref()
        .filter(|_| msg.sender_chat.is_none())
        .map(|user| Sender {
            id: user.id.0,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
        });

    InboundEvent {
        chat_id: msg.chat.id.0,
        chat_kind,
        sender,
        text: msg.text().map(str::to_string),
    }
}

/// Reply to `msg`, staying in its forum topic.
///
/// Delivery failures are logged and dropped.
async fn send_reply(bot: &ThrottledBot, msg: &Message, text: String) {
    let mut request = bot
        .send_message(msg.chat.id, text)
        .reply_parameters(ReplyParameters::new(msg.id))
        .link_preview_options(no_link_preview());

    if let Some(thread_id) = msg.thread_id.filter(|_| msg.is_topic_message) {
        request = request.message_thread_id(thread_id);
    }

    if let Err(e) = request.await {
        warn!("Failed to send reply in chat {}: {}", msg.chat.id, e);
    }
}

fn no_link_preview() -> LinkPreviewOptions {
    LinkPreviewOptions {
        is_disabled: true,
        url: None,
        prefer_small_media: false,
        prefer_large_media: false,
        show_above_text: false,
    }
}
