//! # Messaging Factory
//!
//! Maps the configured backend to concrete adapters. The backend choice is
//! a single switch at construction time; the returned wrappers are closed
//! enums, so call sites stay monomorphic and backend-agnostic.

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::messaging::backends::{
    PubSubPublisher, PubSubSubscriber, RabbitMqPublisher, RabbitMqSubscriber,
};
use crate::messaging::config::{MessagingBackend, MessagingSettings};
use crate::messaging::destinations::MessagingDestination;
use crate::messaging::errors::MessagingResult;
use crate::messaging::interfaces::{MessageHandler, MessagePublisher, MessageSubscriber};

/// Factory for creating messaging clients.
///
/// Usage:
///
/// ```rust,no_run
/// use aegis_agents::messaging::{MessagingFactory, MessagingSettings};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Using settings from the environment
/// let publisher = MessagingFactory::create_publisher(None)?;
///
/// // Using explicit settings
/// let settings = MessagingSettings::from_env()?;
/// let subscriber = MessagingFactory::create_subscriber(Some(settings))?;
/// # Ok(())
/// # }
/// ```
pub struct MessagingFactory;

impl MessagingFactory {
    /// Create a publisher for the configured backend.
    ///
    /// `None` loads [`MessagingSettings::from_env`]; unrecognized backend
    /// values already failed there as a configuration error.
    pub fn create_publisher(settings: Option<MessagingSettings>) -> MessagingResult<Publisher> {
        let settings = match settings {
            Some(settings) => settings,
            None => MessagingSettings::from_env()?,
        };

        info!(backend = %settings.backend, "Creating message publisher");

        Ok(match settings.backend {
            MessagingBackend::RabbitMq => Publisher::RabbitMq(RabbitMqPublisher::new(settings)),
            MessagingBackend::PubSub => Publisher::PubSub(PubSubPublisher::new(settings)),
        })
    }

    /// Create a subscriber for the configured backend
    pub fn create_subscriber(settings: Option<MessagingSettings>) -> MessagingResult<Subscriber> {
        let settings = match settings {
            Some(settings) => settings,
            None => MessagingSettings::from_env()?,
        };

        info!(backend = %settings.backend, "Creating message subscriber");

        Ok(match settings.backend {
            MessagingBackend::RabbitMq => Subscriber::RabbitMq(RabbitMqSubscriber::new(settings)),
            MessagingBackend::PubSub => Subscriber::PubSub(PubSubSubscriber::new(settings)),
        })
    }
}

/// Publisher for the backend selected at construction
pub enum Publisher {
    RabbitMq(RabbitMqPublisher),
    PubSub(PubSubPublisher),
}

impl Publisher {
    /// Backend this publisher talks to
    pub fn backend(&self) -> MessagingBackend {
        match self {
            Publisher::RabbitMq(_) => MessagingBackend::RabbitMq,
            Publisher::PubSub(_) => MessagingBackend::PubSub,
        }
    }
}

#[async_trait]
impl MessagePublisher for Publisher {
    async fn connect(&mut self) -> MessagingResult<()> {
        match self {
            Publisher::RabbitMq(inner) => inner.connect().await,
            Publisher::PubSub(inner) => inner.connect().await,
        }
    }

    async fn disconnect(&mut self) -> MessagingResult<()> {
        match self {
            Publisher::RabbitMq(inner) => inner.disconnect().await,
            Publisher::PubSub(inner) => inner.disconnect().await,
        }
    }

    async fn publish<M>(
        &mut self,
        destination: &MessagingDestination,
        payload: &M,
        correlation_id: Option<&str>,
    ) -> MessagingResult<()>
    where
        M: Serialize + Send + Sync,
    {
        match self {
            Publisher::RabbitMq(inner) => inner.publish(destination, payload, correlation_id).await,
            Publisher::PubSub(inner) => inner.publish(destination, payload, correlation_id).await,
        }
    }
}

/// Subscriber for the backend selected at construction
pub enum Subscriber {
    RabbitMq(RabbitMqSubscriber),
    PubSub(PubSubSubscriber),
}

impl Subscriber {
    /// Backend this subscriber talks to
    pub fn backend(&self) -> MessagingBackend {
        match self {
            Subscriber::RabbitMq(_) => MessagingBackend::RabbitMq,
            Subscriber::PubSub(_) => MessagingBackend::PubSub,
        }
    }
}

#[async_trait]
impl MessageSubscriber for Subscriber {
    async fn connect(&mut self) -> MessagingResult<()> {
        match self {
            Subscriber::RabbitMq(inner) => inner.connect().await,
            Subscriber::PubSub(inner) => inner.connect().await,
        }
    }

    async fn disconnect(&mut self) -> MessagingResult<()> {
        match self {
            Subscriber::RabbitMq(inner) => inner.disconnect().await,
            Subscriber::PubSub(inner) => inner.disconnect().await,
        }
    }

    async fn subscribe(
        &mut self,
        destination: &MessagingDestination,
        handler: MessageHandler,
    ) -> MessagingResult<()> {
        match self {
            Subscriber::RabbitMq(inner) => inner.subscribe(destination, handler).await,
            Subscriber::PubSub(inner) => inner.subscribe(destination, handler).await,
        }
    }

    async fn start_consuming(&mut self) -> MessagingResult<()> {
        match self {
            Subscriber::RabbitMq(inner) => inner.start_consuming().await,
            Subscriber::PubSub(inner) => inner.start_consuming().await,
        }
    }

    async fn stop_consuming(&mut self) -> MessagingResult<()> {
        match self {
            Subscriber::RabbitMq(inner) => inner.stop_consuming().await,
            Subscriber::PubSub(inner) => inner.stop_consuming().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_for(backend: MessagingBackend) -> MessagingSettings {
        MessagingSettings {
            backend,
            ..MessagingSettings::default()
        }
    }

    #[test]
    fn test_create_publisher_selects_backend() {
        let publisher =
            MessagingFactory::create_publisher(Some(settings_for(MessagingBackend::RabbitMq)))
                .unwrap();
        assert_eq!(publisher.backend(), MessagingBackend::RabbitMq);

        let publisher =
            MessagingFactory::create_publisher(Some(settings_for(MessagingBackend::PubSub)))
                .unwrap();
        assert_eq!(publisher.backend(), MessagingBackend::PubSub);
    }

    #[test]
    fn test_create_subscriber_selects_backend() {
        let subscriber =
            MessagingFactory::create_subscriber(Some(settings_for(MessagingBackend::RabbitMq)))
                .unwrap();
        assert_eq!(subscriber.backend(), MessagingBackend::RabbitMq);

        let subscriber =
            MessagingFactory::create_subscriber(Some(settings_for(MessagingBackend::PubSub)))
                .unwrap();
        assert_eq!(subscriber.backend(), MessagingBackend::PubSub);
    }
}
