//! # Messaging Interfaces
//!
//! The publisher and subscriber capabilities exposed to agent code, plus
//! the handler contract. Handlers receive the decoded payload and the
//! correlation id; their `Ok`/`Err` outcome is the only signal driving
//! acknowledgment.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::messaging::destinations::MessagingDestination;
use crate::messaging::errors::MessagingResult;

/// Future returned by a message handler
pub type HandlerFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

/// Asynchronous callback receiving `(payload, correlation_id)` per message
pub type MessageHandler =
    Arc<dyn Fn(serde_json::Value, Option<String>) -> HandlerFuture + Send + Sync>;

/// Wrap a plain async function into a [`MessageHandler`]
pub fn into_handler<F, Fut>(f: F) -> MessageHandler
where
    F: Fn(serde_json::Value, Option<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move |payload, correlation_id| Box::pin(f(payload, correlation_id)))
}

/// Publisher capability over the active backend.
///
/// `publish` serializes the payload to JSON, attaches the correlation id as
/// backend-native metadata, and returns only after the broker confirms
/// receipt. Any operation other than `connect` requires a prior successful
/// `connect`.
#[async_trait]
pub trait MessagePublisher {
    /// Establish the transport-level connection
    async fn connect(&mut self) -> MessagingResult<()>;

    /// Release the connection; safe to call even if `connect` never succeeded
    async fn disconnect(&mut self) -> MessagingResult<()>;

    /// Publish a message to the destination and await broker confirmation
    async fn publish<M>(
        &mut self,
        destination: &MessagingDestination,
        payload: &M,
        correlation_id: Option<&str>,
    ) -> MessagingResult<()>
    where
        M: Serialize + Send + Sync;
}

/// Subscriber capability over the active backend.
///
/// Lifecycle: `connect` → `subscribe` (per destination) → `start_consuming`
/// → `stop_consuming` → `disconnect`, with `start_consuming` re-entry
/// permitted after a stop while registrations remain.
///
/// Backend asymmetry, by contract: the RabbitMQ adapter declares and binds
/// its queue during `subscribe` and is consume-ready immediately; the
/// Pub/Sub adapter only records the registration and activates it during
/// `start_consuming`. Callers must not assume immediate activation.
#[async_trait]
pub trait MessageSubscriber {
    /// Establish the transport-level connection
    async fn connect(&mut self) -> MessagingResult<()>;

    /// Stop consuming and release the connection; safe without a prior connect
    async fn disconnect(&mut self) -> MessagingResult<()>;

    /// Register a handler for a destination. At most one handler per
    /// destination; re-subscribing replaces the previous handler.
    async fn subscribe(
        &mut self,
        destination: &MessagingDestination,
        handler: MessageHandler,
    ) -> MessagingResult<()>;

    /// Activate delivery for every registered destination
    async fn start_consuming(&mut self) -> MessagingResult<()>;

    /// Cancel active delivery within a bounded grace period. Idempotent.
    async fn stop_consuming(&mut self) -> MessagingResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_into_handler_invokes_wrapped_fn() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_ref = calls.clone();

        let handler = into_handler(move |payload, correlation_id| {
            let calls = calls_ref.clone();
            async move {
                assert_eq!(payload["ping"], "pong");
                assert_eq!(correlation_id.as_deref(), Some("abc-1"));
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        let outcome = handler(serde_json::json!({"ping": "pong"}), Some("abc-1".to_string())).await;
        assert!(outcome.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
