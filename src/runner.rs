//! The message loop: receive, dispatch, reply, one message at a time.

use crate::dialog::Dispatcher;
use crate::session::SessionStore;
use crate::transport::{Transport, TransportError};
use std::future::Future;
use std::time::Duration;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

const RECEIVE_BACKOFF: Duration = Duration::from_secs(3);

/// Runs until `shutdown` resolves or the transport closes.
///
/// Transport failures are logged and never end the loop, except
/// [`TransportError::Closed`].
pub async fn run_until<T, S, F>(
    transport: &mut T,
    dispatcher: &mut Dispatcher<S>,
    shutdown: F,
) -> Result<(), TransportError>
where
    T: Transport + ?Sized,
    S: SessionStore,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    info!(transport = transport.name(), "Message loop started");

    loop {
        let batch = tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested");
                break;
            }
            batch = transport.recv() => batch,
        };

        let messages = match batch {
            Ok(messages) => messages,
            Err(TransportError::Closed) => {
                info!("Transport closed");
                break;
            }
            Err(e) => {
                error!(error = %e, "Failed to receive messages");
                tokio::time::sleep(RECEIVE_BACKOFF).await;
                continue;
            }
        };

        for message in messages {
            let span = info_span!("message", request_id = %Uuid::new_v4(), user = message.user_id);
            let reply = span.in_scope(|| dispatcher.handle(message.user_id, &message.text));
            if let Err(e) = transport
                .send(message.chat_id, &reply)
                .instrument(span)
                .await
            {
                error!(user = message.user_id, error = %e, "Failed to send reply");
            }
        }
    }

    Ok(())
}

/// Resolves on Ctrl-C.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
