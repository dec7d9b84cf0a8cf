//! # Messaging Module
//!
//! Publish/subscribe abstraction over RabbitMQ and Google Cloud Pub/Sub.
//! Agents publish to and consume from logical destinations; the active
//! backend is selected once from configuration and everything
//! broker-specific stays behind the adapter boundary.

pub mod backends;
pub mod config;
pub mod destinations;
pub mod errors;
pub mod factory;
pub mod interfaces;
pub(crate) mod processing;

pub use config::{MessagingBackend, MessagingSettings};
pub use destinations::{Destinations, MessagingDestination, PubSubDestination, RabbitMqDestination};
pub use errors::{MessagingError, MessagingResult};
pub use factory::{MessagingFactory, Publisher, Subscriber};
pub use interfaces::{into_handler, HandlerFuture, MessageHandler, MessagePublisher, MessageSubscriber};
