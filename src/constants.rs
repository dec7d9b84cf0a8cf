//! # System Constants
//!
//! Metadata keys, environment variable names, and operational defaults for
//! the messaging layer. Agents must reference these instead of hardcoding
//! strings at call sites.

use std::time::Duration;

/// Backend-native metadata keys carried alongside the wire payload.
pub mod metadata {
    /// Pub/Sub attribute key (and AMQP property) used for the correlation id
    pub const CORRELATION_ID: &str = "correlation_id";

    /// Content type stamped on AMQP messages
    pub const CONTENT_TYPE_JSON: &str = "application/json";
}

/// Environment variables read by [`crate::messaging::MessagingSettings`]
pub mod env {
    pub const BACKEND: &str = "AEGIS_MESSAGING_BACKEND";

    pub const RABBITMQ_HOST: &str = "AEGIS_MESSAGING_RABBITMQ_HOST";
    pub const RABBITMQ_PORT: &str = "AEGIS_MESSAGING_RABBITMQ_PORT";
    pub const RABBITMQ_USER: &str = "AEGIS_MESSAGING_RABBITMQ_USER";
    pub const RABBITMQ_PASSWORD: &str = "AEGIS_MESSAGING_RABBITMQ_PASSWORD";
    pub const RABBITMQ_VHOST: &str = "AEGIS_MESSAGING_RABBITMQ_VHOST";

    pub const PUBSUB_PROJECT_ID: &str = "AEGIS_MESSAGING_PUBSUB_PROJECT_ID";
    pub const PUBSUB_EMULATOR_HOST: &str = "AEGIS_MESSAGING_PUBSUB_EMULATOR_HOST";

    /// Consumed by the Google Cloud client library itself; set from
    /// `PUBSUB_EMULATOR_HOST` above before client construction.
    pub const GOOGLE_PUBSUB_EMULATOR: &str = "PUBSUB_EMULATOR_HOST";
}

/// Connection defaults applied when the environment is silent
pub mod defaults {
    pub const RABBITMQ_HOST: &str = "localhost";
    pub const RABBITMQ_PORT: u16 = 5672;
    pub const RABBITMQ_USER: &str = "guest";
    pub const RABBITMQ_PASSWORD: &str = "guest";
    pub const RABBITMQ_VHOST: &str = "/";
}

/// Unacknowledged messages a RabbitMQ consumer may hold at once. With one,
/// each queue is consumed strictly in order.
pub const RABBITMQ_PREFETCH_COUNT: u16 = 1;

/// How long `stop_consuming` waits for each delivery task before abandoning
/// it, so `disconnect` never hangs on a stuck stream.
pub const STOP_CONSUMING_GRACE: Duration = Duration::from_secs(5);
