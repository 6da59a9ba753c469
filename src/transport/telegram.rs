//! Telegram Bot API over long polling.

use super::{Incoming, Transport, TransportError};
use crate::config::TransportConfig;
use crate::dialog::{Keyboard, Reply};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const RETRY_DELAY_MS: u64 = 1000;

#[derive(Deserialize, Debug)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T, TransportError> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(TransportError::Api {
                code: self.error_code,
                description: self
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            }),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Deserialize, Debug)]
pub struct Message {
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct Chat {
    pub id: i64,
}

#[derive(Deserialize, Debug)]
pub struct User {
    pub id: i64,
}

#[derive(Serialize, Debug)]
struct GetUpdates {
    offset: i64,
    timeout: u64,
    allowed_updates: [&'static str; 1],
}

#[derive(Serialize, Debug)]
pub struct SendMessage<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyKeyboardMarkup>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ReplyKeyboardMarkup {
    pub keyboard: Vec<Vec<KeyboardButton>>,
    pub resize_keyboard: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct KeyboardButton {
    pub text: String,
}

impl From<Keyboard> for ReplyKeyboardMarkup {
    fn from(keyboard: Keyboard) -> Self {
        Self {
            keyboard: keyboard
                .buttons()
                .iter()
                .map(|label| {
                    vec![KeyboardButton {
                        text: label.to_string(),
                    }]
                })
                .collect(),
            resize_keyboard: true,
        }
    }
}

/// Runs `attempt` until it succeeds, fails with a non-retryable error or has
/// been tried `max_retries` times. The n-th failure waits `n * RETRY_DELAY_MS`.
pub async fn with_retries<T, F, Fut>(max_retries: u32, mut attempt: F) -> Result<T, TransportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TransportError>>,
{
    let mut tries = 1;
    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) if tries < max_retries && e.is_retryable() => {
                warn!(attempt = tries, max = max_retries, error = %e, "Request failed, retrying");
                tokio::time::sleep(Duration::from_millis(RETRY_DELAY_MS * u64::from(tries))).await;
                tries += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Text messages with a sender become [`Incoming`]; everything else is
/// skipped. `offset` moves past every update seen.
pub fn collect_incoming(updates: Vec<Update>, offset: &mut i64) -> Vec<Incoming> {
    let mut incoming = Vec::with_capacity(updates.len());
    for update in updates {
        *offset = (*offset).max(update.update_id + 1);
        let Some(message) = update.message else {
            continue;
        };
        match (message.from, message.text) {
            (Some(from), Some(text)) => incoming.push(Incoming {
                user_id: from.id,
                chat_id: message.chat.id,
                text,
            }),
            _ => debug!(update_id = update.update_id, "Skipping non-text update"),
        }
    }
    incoming
}

pub struct TelegramTransport {
    client: Client,
    base_url: String,
    offset: i64,
    poll_timeout: u64,
    max_retries: u32,
}

impl TelegramTransport {
    pub fn new(config: &TransportConfig, token: &str) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: format!("{}/bot{}", config.api_url.trim_end_matches('/'), token),
            offset: 0,
            poll_timeout: config.poll_timeout_seconds,
            max_retries: config.max_retries.max(1),
        })
    }

    async fn call<P, R>(&self, method: &str, payload: &P) -> Result<R, TransportError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response: ApiResponse<R> = self
            .client
            .post(format!("{}/{}", self.base_url, method))
            .json(payload)
            .send()
            .await?
            .json()
            .await?;
        response.into_result()
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    #[instrument(skip(self))]
    async fn recv(&mut self) -> Result<Vec<Incoming>, TransportError> {
        let request = GetUpdates {
            offset: self.offset,
            timeout: self.poll_timeout,
            allowed_updates: ["message"],
        };
        let updates: Vec<Update> = self.call("getUpdates", &request).await?;
        debug!(count = updates.len(), offset = self.offset, "Polled updates");
        Ok(collect_incoming(updates, &mut self.offset))
    }

    #[instrument(skip(self, reply))]
    async fn send(&mut self, chat_id: i64, reply: &Reply) -> Result<(), TransportError> {
        let payload = SendMessage {
            chat_id,
            text: &reply.text,
            reply_markup: reply.keyboard.map(ReplyKeyboardMarkup::from),
        };

        let this = &*self;
        with_retries(this.max_retries, || {
            this.call::<_, serde_json::Value>("sendMessage", &payload)
        })
        .await
        .map(|_| ())
    }

    fn name(&self) -> &'static str {
        "telegram"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;
    use tokio::time::Instant;

    fn rate_limited() -> TransportError {
        TransportError::Api {
            code: Some(429),
            description: "Too Many Requests".into(),
        }
    }

    #[test]
    fn keyboard_serializes_one_button_per_row() {
        let payload = SendMessage {
            chat_id: 5,
            text: "Главное меню:",
            reply_markup: Some(Keyboard::Main.into()),
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "chat_id": 5,
                "text": "Главное меню:",
                "reply_markup": {
                    "keyboard": [
                        [{"text": "Задание 1"}],
                        [{"text": "Задание 4"}],
                        [{"text": "Задание 5"}],
                        [{"text": "Помощь"}]
                    ],
                    "resize_keyboard": true
                }
            })
        );
    }

    #[test]
    fn plain_reply_has_no_markup() {
        let payload = SendMessage {
            chat_id: 5,
            text: "hi",
            reply_markup: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("reply_markup").is_none());
    }

    #[test]
    fn updates_become_incoming_messages() {
        let raw = json!({
            "ok": true,
            "result": [
                {"update_id": 10, "message": {"chat": {"id": 77}, "from": {"id": 7}, "text": "/start"}},
                {"update_id": 11, "message": {"chat": {"id": 77}, "from": {"id": 7}}},
                {"update_id": 12}
            ]
        });
        let response: ApiResponse<Vec<Update>> = serde_json::from_value(raw).unwrap();
        let mut offset = 0;
        let incoming = collect_incoming(response.into_result().unwrap(), &mut offset);

        assert_eq!(offset, 13);
        assert_eq!(
            incoming,
            vec![Incoming {
                user_id: 7,
                chat_id: 77,
                text: "/start".into()
            }]
        );
    }

    #[test]
    fn api_failure_is_an_error() {
        let raw = json!({"ok": false, "error_code": 401, "description": "Unauthorized"});
        let response: ApiResponse<Vec<Update>> = serde_json::from_value(raw).unwrap();
        match response.into_result() {
            Err(TransportError::Api { code, description }) => {
                assert_eq!(code, Some(401));
                assert_eq!(description, "Unauthorized");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn retry_policy() {
        let bad_request = TransportError::Api {
            code: Some(400),
            description: "Bad Request".into(),
        };
        assert!(rate_limited().is_retryable());
        assert!(!bad_request.is_retryable());
        assert!(!TransportError::Closed.is_retryable());
    }

    #[test]
    fn base_url_includes_token() {
        let config = TransportConfig {
            api_url: "http://localhost:8081/".to_string(),
            ..TransportConfig::default()
        };
        let transport = TelegramTransport::new(&config, "123:abc").unwrap();
        assert_eq!(transport.base_url, "http://localhost:8081/bot123:abc");
        assert_eq!(transport.name(), "telegram");
    }

    #[tokio::test(start_paused = true)]
    async fn retries_stop_at_the_limit() {
        let calls = Cell::new(0);
        let started = Instant::now();
        let result: Result<(), _> = with_retries(3, || {
            calls.set(calls.get() + 1);
            async { Err(rate_limited()) }
        })
        .await;

        assert!(matches!(result, Err(TransportError::Api { code: Some(429), .. })));
        assert_eq!(calls.get(), 3);
        // 1s after the first failure, 2s after the second
        assert!(started.elapsed() >= Duration::from_millis(3 * RETRY_DELAY_MS));
    }

    #[tokio::test(start_paused = true)]
    async fn retries_recover_after_transient_failure() {
        let calls = Cell::new(0);
        let result = with_retries(3, || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move {
                if n < 2 {
                    Err(rate_limited())
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_errors_are_not_retried() {
        let calls = Cell::new(0);
        let result: Result<(), _> = with_retries(5, || {
            calls.set(calls.get() + 1);
            async {
                Err(TransportError::Api {
                    code: Some(400),
                    description: "Bad Request".into(),
                })
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }
}
