//! Chat transports: where messages come from and where replies go.

pub mod console;
pub mod telegram;

pub use console::ConsoleTransport;
pub use telegram::TelegramTransport;

use crate::dialog::Reply;
use crate::session::UserId;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incoming {
    pub user_id: UserId,
    pub chat_id: i64,
    pub text: String,
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Telegram API error ({code:?}): {description}")]
    Api {
        code: Option<i64>,
        description: String,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Transport closed")]
    Closed,
}

impl TransportError {
    /// Worth another attempt: network trouble, rate limiting, server errors.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Http(_) => true,
            TransportError::Api { code, .. } => matches!(code, Some(429) | Some(500..=599)),
            TransportError::Io(_) | TransportError::Closed => false,
        }
    }
}

#[async_trait]
pub trait Transport: Send {
    /// Waits for the next batch of messages. An empty batch means the wait
    /// timed out with nothing to do.
    async fn recv(&mut self) -> Result<Vec<Incoming>, TransportError>;

    async fn send(&mut self, chat_id: i64, reply: &Reply) -> Result<(), TransportError>;

    fn name(&self) -> &'static str;
}
