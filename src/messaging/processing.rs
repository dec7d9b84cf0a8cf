//! # Inbound Message Processing
//!
//! The single decode → dispatch → settle algorithm both subscriber adapters
//! run, so a message is observably handled the same way whether it arrived
//! over an AMQP consume loop or a Pub/Sub streaming pull.
//!
//! Poison-message policy: bytes that are empty, not UTF-8, or not JSON are
//! acknowledged and dropped without ever reaching the handler; no dead-letter
//! re-route happens here. Handler failures become a negative acknowledgment
//! and the backend's own redelivery policy takes over. Exactly one
//! disposition is produced per message.

use tracing::{error, warn};

use crate::messaging::interfaces::MessageHandler;

/// How the adapter must settle an inbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MessageDisposition {
    /// Handler completed; positively acknowledge
    Ack,
    /// Message was malformed or empty; acknowledge to discard it
    AckAndDrop,
    /// Handler failed; negatively acknowledge
    Nack,
}

/// Decode raw bytes, dispatch to the handler, and decide the disposition.
///
/// Never returns an error and never panics past this point; consumption
/// errors are contained here so the delivery loop keeps running.
pub(crate) async fn process_message(
    raw: &[u8],
    correlation_id: Option<&str>,
    message_id: Option<&str>,
    handler: &MessageHandler,
) -> MessageDisposition {
    if raw.is_empty() {
        warn!(
            message_id = message_id,
            correlation_id = correlation_id,
            "Received empty message; acknowledging and dropping"
        );
        return MessageDisposition::AckAndDrop;
    }

    let text = match std::str::from_utf8(raw) {
        Ok(text) => text,
        Err(e) => {
            error!(
                message_id = message_id,
                correlation_id = correlation_id,
                error = %e,
                "Received non-UTF-8 message; acknowledging and dropping"
            );
            return MessageDisposition::AckAndDrop;
        }
    };

    let payload: serde_json::Value = match serde_json::from_str(text) {
        Ok(payload) => payload,
        Err(e) => {
            error!(
                message_id = message_id,
                correlation_id = correlation_id,
                payload_preview = %text.chars().take(100).collect::<String>(),
                error = %e,
                "Invalid JSON in message; acknowledging and dropping"
            );
            return MessageDisposition::AckAndDrop;
        }
    };

    match handler(payload, correlation_id.map(str::to_string)).await {
        Ok(()) => MessageDisposition::Ack,
        Err(e) => {
            error!(
                message_id = message_id,
                correlation_id = correlation_id,
                error = %e,
                "Message handler failed; negatively acknowledging"
            );
            MessageDisposition::Nack
        }
    }
}
