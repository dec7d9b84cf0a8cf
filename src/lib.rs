#![allow(clippy::doc_markdown)] // Allow technical terms like RabbitMQ, JSON in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Aegis Agents Messaging Core
//!
//! Uniform publish/subscribe transport layer for the Aegis test agents,
//! hiding two structurally different brokers behind one abstraction:
//! RabbitMQ (durable topic exchanges, manual ack, prefetch-bounded consume
//! loops) and Google Cloud Pub/Sub (streaming pull, attribute metadata).
//!
//! ## Overview
//!
//! Agents address logical, named destinations and register asynchronous
//! handlers. The messaging layer owns topology declaration, connection
//! lifecycle, serialization, correlation-id propagation, and the
//! acknowledgment policy, so switching brokers is a configuration change
//! and nothing else.
//!
//! ## Module Organization
//!
//! - [`messaging`] - destination registry, settings, factory, and the
//!   publisher/subscriber adapters for both backends
//! - [`contracts`] - shared data-contract models exchanged between agents
//! - [`logging`] - structured logging initialization
//! - [`constants`] - metadata keys, environment variables, and defaults
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use aegis_agents::messaging::{Destinations, MessagePublisher, MessagingFactory};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Backend selection comes from AEGIS_MESSAGING_BACKEND
//! let mut publisher = MessagingFactory::create_publisher(None)?;
//! publisher.connect().await?;
//! publisher
//!     .publish(
//!         &Destinations::TEST_GENERATION_REQUESTED,
//!         &json!({"specification_id": 42}),
//!         Some("abc-1"),
//!     )
//!     .await?;
//! publisher.disconnect().await?;
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod contracts;
pub mod logging;
pub mod messaging;

pub use messaging::{
    into_handler, Destinations, HandlerFuture, MessageHandler, MessagePublisher,
    MessageSubscriber, MessagingBackend, MessagingDestination, MessagingError, MessagingFactory,
    MessagingResult, MessagingSettings, PubSubDestination, Publisher, RabbitMqDestination,
    Subscriber,
};
