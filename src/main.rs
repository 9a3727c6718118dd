//! Daypick - Member of the Day bot for Telegram groups.
//!
//! Once per chat per day, picks a random member among everyone who has
//! written in the chat, and keeps per-member win statistics.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `database` - Member and selection stores (MongoDB or in-memory)
//! - `cache` - Moka-backed caches for the MongoDB repositories
//! - `selection` - Daily pick with exactly-once commit
//! - `stats` - Win rankings and chat summaries
//! - `templates` - User-facing message catalog and rendering
//! - `pipeline` - Transport-neutral message handling stages
//! - `plugins` - Command handlers
//! - `bot` - Telegram transport (with Throttle for API rate limiting)

mod bot;
mod cache;
mod config;
mod database;
mod pipeline;
mod plugins;
mod selection;
mod stats;
mod templates;
#[cfg(test)]
mod testing;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::Context;
use rand::SeedableRng;
use rand::rngs::StdRng;
use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bot::AppState;
use cache::CacheRegistry;
use config::{Config, StorageBackend};
use database::{
    Database, MemberRepository, MemberStore, MemoryStore, SelectionRepository, SelectionStore,
};
use selection::SystemClock;
use templates::MessageFormatter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first so DEBUG can pick the log level
    let config = Config::from_env()?;

    // RUST_LOG wins over DEBUG when set
    let default_filter = if config.debug {
        "daypick=debug,teloxide=info"
    } else {
        "daypick=info,teloxide=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting daypick bot...");
    info!("Bot mode: {:?}", config.bot_mode);
    info!("Storage: {:?}", config.storage);

    let (members, selections) = open_stores(&config).await?;

    let formatter = MessageFormatter::embedded().context("message templates are invalid")?;

    // Initialize bot with Throttle for automatic rate limiting
    let bot = Bot::new(&config.bot_token).throttle(Limits::default());
    info!("Bot initialized with rate limiting (Throttle)");

    // Bot username from config, or from getMe
    let bot_username = match config.bot_username.clone() {
        Some(username) => username,
        None => bot.get_me().await?.username().to_string(),
    };
    info!("Using bot username: @{}", bot_username);

    bot::register_commands(&bot).await;

    let state = AppState::new(
        members,
        selections,
        Arc::new(SystemClock),
        StdRng::from_os_rng(),
        formatter,
        bot_username,
    );

    let dispatcher = bot::build_dispatcher(bot.clone(), state);
    bot::run(&config, dispatcher, bot).await?;

    info!("Bot stopped");
    Ok(())
}

/// Open the configured storage backend.
async fn open_stores(
    config: &Config,
) -> anyhow::Result<(Arc<dyn MemberStore>, Arc<dyn SelectionStore>)> {
    match config.storage {
        StorageBackend::Mongodb => {
            let uri = config
                .mongodb_uri
                .as_deref()
                .context("MONGODB_URI must be set for mongodb storage")?;

            info!("Connecting to MongoDB...");
            let db = Database::connect(uri, &config.mongodb_database).await?;
            info!("Database connected");

            let cache = CacheRegistry::new();
            let members = MemberRepository::new(&db, &cache);
            let selections = SelectionRepository::new(&db, &cache);

            members.ensure_schema().await?;
            selections.ensure_schema().await?;
            info!("Unique indexes verified");

            Ok((Arc::new(members), Arc::new(selections)))
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on restart");
            let store = MemoryStore::new();
            Ok((Arc::new(store.clone()), Arc::new(store)))
        }
    }
}
