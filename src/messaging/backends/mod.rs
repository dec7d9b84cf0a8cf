//! # Backend Adapters
//!
//! Concrete publisher/subscriber implementations, one pair per broker.

pub mod pubsub;
pub mod rabbitmq;

pub use pubsub::{PubSubPublisher, PubSubSubscriber};
pub use rabbitmq::{RabbitMqPublisher, RabbitMqSubscriber};
