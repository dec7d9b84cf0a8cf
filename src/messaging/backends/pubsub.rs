//! # Google Cloud Pub/Sub Messaging Backend
//!
//! Publisher and subscriber adapters over the Google Cloud Pub/Sub client.
//! Topics and subscriptions are scoped under the configured project by the
//! client itself; nothing is declared here. Delivery runs as one streaming
//! pull per subscription, each driven by a cancellation token so shutdown
//! stays bounded. Handler concurrency-safety under streaming pull is a
//! caller obligation.

use std::collections::HashMap;

use async_trait::async_trait;
use google_cloud_googleapis::pubsub::v1::PubsubMessage;
use google_cloud_pubsub::client::{Client, ClientConfig};
use google_cloud_pubsub::publisher::Publisher as TopicPublisher;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::constants::{env, metadata, STOP_CONSUMING_GRACE};
use crate::messaging::config::MessagingSettings;
use crate::messaging::destinations::MessagingDestination;
use crate::messaging::errors::{MessagingError, MessagingResult};
use crate::messaging::interfaces::{MessageHandler, MessagePublisher, MessageSubscriber};
use crate::messaging::processing::{process_message, MessageDisposition};

/// Build a Pub/Sub client from settings, honoring the emulator override
async fn build_client(settings: &MessagingSettings) -> MessagingResult<Client> {
    if let Some(host) = &settings.pubsub_emulator_host {
        // The client library reads the emulator address from its own
        // well-known environment variable
        std::env::set_var(env::GOOGLE_PUBSUB_EMULATOR, host);
        info!(host = %host, "Using Pub/Sub emulator");
    }

    let mut config = ClientConfig::default();
    if !settings.pubsub_project_id.is_empty() {
        config.project_id = Some(settings.pubsub_project_id.clone());
    }
    let config = if settings.pubsub_emulator_host.is_none() {
        config
            .with_auth()
            .await
            .map_err(|e| MessagingError::connection(e.to_string()))?
    } else {
        config
    };

    Client::new(config)
        .await
        .map_err(|e| MessagingError::connection(e.to_string()))
}

/// Google Cloud Pub/Sub publisher adapter
pub struct PubSubPublisher {
    settings: MessagingSettings,
    client: Option<Client>,
    /// One publisher handle per topic, created on first use
    publishers: HashMap<&'static str, TopicPublisher>,
}

impl PubSubPublisher {
    /// Create an unconnected publisher from immutable settings
    pub fn new(settings: MessagingSettings) -> Self {
        Self {
            settings,
            client: None,
            publishers: HashMap::new(),
        }
    }
}

#[async_trait]
impl MessagePublisher for PubSubPublisher {
    async fn connect(&mut self) -> MessagingResult<()> {
        let client = build_client(&self.settings).await?;
        self.client = Some(client);
        info!(
            project_id = %self.settings.pubsub_project_id,
            "✅ Connected to Google Cloud Pub/Sub"
        );
        Ok(())
    }

    async fn disconnect(&mut self) -> MessagingResult<()> {
        for (_, mut publisher) in self.publishers.drain() {
            publisher.shutdown().await;
        }
        self.client = None;
        info!("Disconnected from Google Cloud Pub/Sub");
        Ok(())
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
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| MessagingError::not_connected("publish"))?;

        let data = serde_json::to_vec(payload)?;
        let topic_id = destination.pubsub.topic;

        let mut attributes = HashMap::new();
        if let Some(correlation_id) = correlation_id {
            attributes.insert(
                metadata::CORRELATION_ID.to_string(),
                correlation_id.to_string(),
            );
        }

        if !self.publishers.contains_key(topic_id) {
            let topic = client.topic(topic_id);
            self.publishers.insert(topic_id, topic.new_publisher(None));
        }
        let publisher = self
            .publishers
            .get(topic_id)
            .ok_or_else(|| MessagingError::publish(destination.name, "publisher cache miss"))?;

        let message = PubsubMessage {
            data: data.into(),
            attributes,
            ..PubsubMessage::default()
        };

        let message_id = publisher
            .publish(message)
            .await
            .get()
            .await
            .map_err(|e| MessagingError::publish(destination.name, e.to_string()))?;

        debug!(
            topic = topic_id,
            message_id = %message_id,
            correlation_id = correlation_id,
            "📤 Published message to Pub/Sub"
        );
        Ok(())
    }
}

/// A running streaming pull for one subscription
struct ActiveStream {
    subscription: &'static str,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Google Cloud Pub/Sub subscriber adapter
pub struct PubSubSubscriber {
    settings: MessagingSettings,
    client: Option<Client>,
    /// Registered handlers; activation is deferred to `start_consuming`
    registrations: Vec<(MessagingDestination, MessageHandler)>,
    streams: Vec<ActiveStream>,
}

impl PubSubSubscriber {
    /// Create an unconnected subscriber from immutable settings
    pub fn new(settings: MessagingSettings) -> Self {
        Self {
            settings,
            client: None,
            registrations: Vec::new(),
            streams: Vec::new(),
        }
    }
}

#[async_trait]
impl MessageSubscriber for PubSubSubscriber {
    async fn connect(&mut self) -> MessagingResult<()> {
        let client = build_client(&self.settings).await?;
        self.client = Some(client);
        info!(
            project_id = %self.settings.pubsub_project_id,
            "✅ Connected to Google Cloud Pub/Sub"
        );
        Ok(())
    }

    async fn disconnect(&mut self) -> MessagingResult<()> {
        self.stop_consuming().await?;
        self.client = None;
        info!("Disconnected from Google Cloud Pub/Sub");
        Ok(())
    }

    async fn subscribe(
        &mut self,
        destination: &MessagingDestination,
        handler: MessageHandler,
    ) -> MessagingResult<()> {
        if self.client.is_none() {
            return Err(MessagingError::not_connected("subscribe"));
        }

        // One handler per destination; re-subscribing replaces it
        if let Some(index) = self
            .registrations
            .iter()
            .position(|(registered, _)| registered.name == destination.name)
        {
            self.registrations[index].1 = handler;
        } else {
            self.registrations.push((*destination, handler));
        }

        info!(
            subscription = destination.pubsub.subscription,
            "Registered Pub/Sub subscription"
        );
        Ok(())
    }

    async fn start_consuming(&mut self) -> MessagingResult<()> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| MessagingError::not_connected("start_consuming"))?;

        for (destination, handler) in &self.registrations {
            let subscription_id = destination.pubsub.subscription;
            let subscription = client.subscription(subscription_id);
            let cancel = CancellationToken::new();
            let token = cancel.clone();
            let handler = handler.clone();

            let handle = tokio::spawn(async move {
                let outcome = subscription
                    .receive(
                        move |message, _ctx| {
                            let handler = handler.clone();
                            async move {
                                let correlation_id = message
                                    .message
                                    .attributes
                                    .get(metadata::CORRELATION_ID)
                                    .cloned();
                                let message_id = message.message.message_id.clone();

                                let disposition = process_message(
                                    &message.message.data,
                                    correlation_id.as_deref(),
                                    Some(&message_id),
                                    &handler,
                                )
                                .await;

                                let settled = match disposition {
                                    MessageDisposition::Ack | MessageDisposition::AckAndDrop => {
                                        message.ack().await
                                    }
                                    MessageDisposition::Nack => message.nack().await,
                                };

                                if let Err(status) = settled {
                                    error!(
                                        subscription = subscription_id,
                                        message_id = %message_id,
                                        error = %status,
                                        "Failed to settle message"
                                    );
                                }
                            }
                        },
                        token,
                        None,
                    )
                    .await;

                if let Err(status) = outcome {
                    error!(
                        subscription = subscription_id,
                        error = %status,
                        "Streaming pull terminated with error"
                    );
                }
            });

            self.streams.push(ActiveStream {
                subscription: subscription_id,
                cancel,
                handle,
            });
            info!(
                subscription = subscription_id,
                "📥 Consuming from Pub/Sub subscription"
            );
        }

        Ok(())
    }

    async fn stop_consuming(&mut self) -> MessagingResult<()> {
        if self.streams.is_empty() {
            return Ok(());
        }

        for stream in &self.streams {
            stream.cancel.cancel();
        }

        for stream in self.streams.drain(..) {
            let mut handle = stream.handle;
            if tokio::time::timeout(STOP_CONSUMING_GRACE, &mut handle)
                .await
                .is_err()
            {
                warn!(
                    subscription = stream.subscription,
                    "Streaming pull did not stop within grace period; aborting"
                );
                handle.abort();
            }
        }

        info!("🛑 Stopped consuming from Pub/Sub");
        Ok(())
    }
}
