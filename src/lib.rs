//! # taskbot
//!
//! A chat tutor offering three small exercises on integer arrays:
//!
//! - **Задание 1**: pairwise reconciliation of two arrays
//! - **Задание 4**: addition and subtraction of numbers written as digit arrays (memoized)
//! - **Задание 5**: counting contiguous subarrays with a given sum
//!
//! ```text
//! Transport → runner → Dispatcher (sessions × intents) → exercises / cache → Reply → Transport
//! ```

pub mod bench;
pub mod cache;
pub mod config;
pub mod dialog;
pub mod exercises;
pub mod logging;
pub mod runner;
pub mod session;
pub mod transport;

use crate::cache::DigitCache;
use crate::config::{Config, ConfigError, TransportKind, TOKEN_ENV};
use crate::dialog::Dispatcher;
use crate::session::{InMemorySessionStore, SessionStore};
use crate::transport::{ConsoleTransport, TelegramTransport, Transport};
use tracing::info;

/// Builds the transport and dispatcher from `config` and serves until Ctrl-C.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let mut transport: Box<dyn Transport> = match config.transport.kind {
        TransportKind::Telegram => {
            let token = config
                .bot_token
                .as_deref()
                .ok_or(ConfigError::MissingToken(TOKEN_ENV))?;
            Box::new(TelegramTransport::new(&config.transport, token)?)
        }
        TransportKind::Console => Box::new(ConsoleTransport::stdio(config.transport.console_user_id)),
    };

    let mut dispatcher = Dispatcher::new(
        InMemorySessionStore::new(config.sessions.max_sessions),
        DigitCache::new(&config.cache),
    );

    info!(
        transport = transport.name(),
        cache_capacity = config.cache.capacity,
        max_sessions = config.sessions.max_sessions,
        "Bot started"
    );
    runner::run_until(transport.as_mut(), &mut dispatcher, runner::ctrl_c()).await?;

    let stats = dispatcher.cache_stats();
    info!(
        sessions = dispatcher.sessions().len(),
        cache_hits = stats.hits,
        cache_misses = stats.misses,
        "Bot stopped"
    );
    Ok(())
}
