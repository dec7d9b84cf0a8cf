//! # RabbitMQ Messaging Backend
//!
//! Publisher and subscriber adapters over lapin. Exchanges are durable
//! topic exchanges declared lazily on first use; queues are durable and
//! bound at subscribe time. Publishing runs in confirm mode so `publish`
//! returns only after the broker acknowledges the message. Consumption
//! runs one serialized loop per queue with a prefetch of one, trading
//! throughput for ordering and bounded redelivery.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use futures::StreamExt;
use lapin::{
    options::{
        BasicAckOptions, BasicCancelOptions, BasicConsumeOptions, BasicNackOptions,
        BasicPublishOptions, BasicQosOptions, ConfirmSelectOptions, ExchangeDeclareOptions,
        QueueBindOptions, QueueDeclareOptions,
    },
    publisher_confirm::Confirmation,
    types::FieldTable,
    BasicProperties, Channel, Connection, ConnectionProperties, Consumer, ExchangeKind,
};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::constants::{metadata, RABBITMQ_PREFETCH_COUNT, STOP_CONSUMING_GRACE};
use crate::messaging::config::MessagingSettings;
use crate::messaging::destinations::MessagingDestination;
use crate::messaging::errors::{MessagingError, MessagingResult};
use crate::messaging::interfaces::{MessageHandler, MessagePublisher, MessageSubscriber};
use crate::messaging::processing::{process_message, MessageDisposition};

/// RabbitMQ publisher adapter
pub struct RabbitMqPublisher {
    settings: MessagingSettings,
    connection: Option<Connection>,
    channel: Option<Channel>,
    declared_exchanges: HashSet<&'static str>,
}

impl RabbitMqPublisher {
    /// Create an unconnected publisher from immutable settings
    pub fn new(settings: MessagingSettings) -> Self {
        Self {
            settings,
            connection: None,
            channel: None,
            declared_exchanges: HashSet::new(),
        }
    }
}

#[async_trait]
impl MessagePublisher for RabbitMqPublisher {
    async fn connect(&mut self) -> MessagingResult<()> {
        info!(host = %self.settings.rabbitmq_host, "🚀 Connecting to RabbitMQ");

        let connection = Connection::connect(&self.settings.amqp_url(), ConnectionProperties::default())
            .await
            .map_err(|e| MessagingError::connection(e.to_string()))?;
        let channel = connection
            .create_channel()
            .await
            .map_err(|e| MessagingError::connection(e.to_string()))?;

        // Confirm mode makes basic.publish await a broker-side ack
        channel
            .confirm_select(ConfirmSelectOptions::default())
            .await
            .map_err(|e| MessagingError::connection(e.to_string()))?;

        self.connection = Some(connection);
        self.channel = Some(channel);
        info!("✅ Connected to RabbitMQ");
        Ok(())
    }

    async fn disconnect(&mut self) -> MessagingResult<()> {
        if let Some(channel) = self.channel.take() {
            channel
                .close(200, "client disconnect")
                .await
                .map_err(|e| MessagingError::connection(e.to_string()))?;
        }
        if let Some(connection) = self.connection.take() {
            connection
                .close(200, "client disconnect")
                .await
                .map_err(|e| MessagingError::connection(e.to_string()))?;
        }
        self.declared_exchanges.clear();
        info!("Disconnected from RabbitMQ");
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
        let channel = self
            .channel
            .clone()
            .ok_or_else(|| MessagingError::not_connected("publish"))?;

        let body = serde_json::to_vec(payload)?;
        let exchange = destination.rabbitmq.exchange;
        let routing_key = destination.rabbitmq.routing_key;

        if !self.declared_exchanges.contains(exchange) {
            channel
                .exchange_declare(
                    exchange,
                    ExchangeKind::Topic,
                    ExchangeDeclareOptions {
                        durable: true,
                        ..ExchangeDeclareOptions::default()
                    },
                    FieldTable::default(),
                )
                .await
                .map_err(|e| MessagingError::publish(destination.name, e.to_string()))?;
            self.declared_exchanges.insert(exchange);
        }

        let mut properties =
            BasicProperties::default().with_content_type(metadata::CONTENT_TYPE_JSON.into());
        if let Some(correlation_id) = correlation_id {
            properties = properties.with_correlation_id(correlation_id.into());
        }

        let confirmation = channel
            .basic_publish(
                exchange,
                routing_key,
                BasicPublishOptions::default(),
                &body,
                properties,
            )
            .await
            .map_err(|e| MessagingError::publish(destination.name, e.to_string()))?
            .await
            .map_err(|e| MessagingError::publish(destination.name, e.to_string()))?;

        if !matches!(confirmation, Confirmation::Ack(_)) {
            return Err(MessagingError::publish(
                destination.name,
                "broker negatively acknowledged the publish",
            ));
        }

        debug!(
            exchange = exchange,
            routing_key = routing_key,
            correlation_id = correlation_id,
            "📤 Published message to RabbitMQ"
        );
        Ok(())
    }
}

/// A running consume loop for one queue
struct ActiveConsumer {
    tag: String,
    handle: JoinHandle<()>,
}

/// RabbitMQ subscriber adapter
pub struct RabbitMqSubscriber {
    settings: MessagingSettings,
    connection: Option<Connection>,
    channel: Option<Channel>,
    /// Registration order of bound destinations
    bindings: Vec<MessagingDestination>,
    /// Handler per queue; write-once before activation
    handlers: HashMap<&'static str, MessageHandler>,
    consumers: Vec<ActiveConsumer>,
}

impl RabbitMqSubscriber {
    /// Create an unconnected subscriber from immutable settings
    pub fn new(settings: MessagingSettings) -> Self {
        Self {
            settings,
            connection: None,
            channel: None,
            bindings: Vec::new(),
            handlers: HashMap::new(),
            consumers: Vec::new(),
        }
    }
}

#[async_trait]
impl MessageSubscriber for RabbitMqSubscriber {
    async fn connect(&mut self) -> MessagingResult<()> {
        info!(host = %self.settings.rabbitmq_host, "🚀 Connecting to RabbitMQ");

        let connection = Connection::connect(&self.settings.amqp_url(), ConnectionProperties::default())
            .await
            .map_err(|e| MessagingError::connection(e.to_string()))?;
        let channel = connection
            .create_channel()
            .await
            .map_err(|e| MessagingError::connection(e.to_string()))?;
        channel
            .basic_qos(RABBITMQ_PREFETCH_COUNT, BasicQosOptions::default())
            .await
            .map_err(|e| MessagingError::connection(e.to_string()))?;

        self.connection = Some(connection);
        self.channel = Some(channel);
        info!("✅ Connected to RabbitMQ");
        Ok(())
    }

    async fn disconnect(&mut self) -> MessagingResult<()> {
        self.stop_consuming().await?;
        if let Some(channel) = self.channel.take() {
            channel
                .close(200, "client disconnect")
                .await
                .map_err(|e| MessagingError::connection(e.to_string()))?;
        }
        if let Some(connection) = self.connection.take() {
            connection
                .close(200, "client disconnect")
                .await
                .map_err(|e| MessagingError::connection(e.to_string()))?;
        }
        info!("Disconnected from RabbitMQ");
        Ok(())
    }

    async fn subscribe(
        &mut self,
        destination: &MessagingDestination,
        handler: MessageHandler,
    ) -> MessagingResult<()> {
        let channel = self
            .channel
            .as_ref()
            .ok_or_else(|| MessagingError::not_connected("subscribe"))?;

        let queue = destination.rabbitmq.queue;
        let exchange = destination.rabbitmq.exchange;
        let routing_key = destination.rabbitmq.routing_key;

        channel
            .exchange_declare(
                exchange,
                ExchangeKind::Topic,
                ExchangeDeclareOptions {
                    durable: true,
                    ..ExchangeDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| MessagingError::subscribe(destination.name, e.to_string()))?;

        channel
            .queue_declare(
                queue,
                QueueDeclareOptions {
                    durable: true,
                    ..QueueDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| MessagingError::subscribe(destination.name, e.to_string()))?;

        channel
            .queue_bind(
                queue,
                exchange,
                routing_key,
                QueueBindOptions::default(),
                FieldTable::default(),
            )
            .await
            .map_err(|e| MessagingError::subscribe(destination.name, e.to_string()))?;

        if !self.bindings.iter().any(|d| d.name == destination.name) {
            self.bindings.push(*destination);
        }
        self.handlers.insert(queue, handler);

        info!(
            queue = queue,
            exchange = exchange,
            routing_key = routing_key,
            "Subscribed to RabbitMQ queue"
        );
        Ok(())
    }

    async fn start_consuming(&mut self) -> MessagingResult<()> {
        let channel = self
            .channel
            .as_ref()
            .ok_or_else(|| MessagingError::not_connected("start_consuming"))?;

        for destination in &self.bindings {
            let queue = destination.rabbitmq.queue;
            let Some(handler) = self.handlers.get(queue).cloned() else {
                continue;
            };

            let tag = format!("{queue}.consumer");
            let consumer = channel
                .basic_consume(
                    queue,
                    &tag,
                    BasicConsumeOptions::default(),
                    FieldTable::default(),
                )
                .await
                .map_err(|e| MessagingError::consume(e.to_string()))?;

            let handle = tokio::spawn(consume_loop(consumer, queue, handler));
            self.consumers.push(ActiveConsumer { tag, handle });
            info!(queue = queue, "📥 Consuming from RabbitMQ queue");
        }

        Ok(())
    }

    async fn stop_consuming(&mut self) -> MessagingResult<()> {
        if self.consumers.is_empty() {
            return Ok(());
        }

        if let Some(channel) = &self.channel {
            for consumer in &self.consumers {
                if let Err(e) = channel
                    .basic_cancel(&consumer.tag, BasicCancelOptions::default())
                    .await
                {
                    warn!(tag = %consumer.tag, error = %e, "basic.cancel failed");
                }
            }
        }

        for consumer in self.consumers.drain(..) {
            let mut handle = consumer.handle;
            if tokio::time::timeout(STOP_CONSUMING_GRACE, &mut handle)
                .await
                .is_err()
            {
                warn!(tag = %consumer.tag, "Consume loop did not stop within grace period; aborting");
                handle.abort();
            }
        }

        info!("🛑 Stopped consuming from RabbitMQ");
        Ok(())
    }
}

/// Serialized delivery loop for one queue. With a prefetch of one, at most
/// one message is unacknowledged at any time.
async fn consume_loop(mut consumer: Consumer, queue: &'static str, handler: MessageHandler) {
    while let Some(delivery) = consumer.next().await {
        let delivery = match delivery {
            Ok(delivery) => delivery,
            Err(e) => {
                error!(queue = queue, error = %e, "Consumer stream error");
                continue;
            }
        };

        let correlation_id = delivery
            .properties
            .correlation_id()
            .as_ref()
            .map(|value| value.as_str().to_string());
        let message_id = delivery.delivery_tag.to_string();

        let disposition = process_message(
            &delivery.data,
            correlation_id.as_deref(),
            Some(&message_id),
            &handler,
        )
        .await;

        let settled = match disposition {
            MessageDisposition::Ack | MessageDisposition::AckAndDrop => {
                delivery.ack(BasicAckOptions::default()).await
            }
            // Reject without requeue; redelivery is a dead-letter concern
            MessageDisposition::Nack => {
                delivery
                    .nack(BasicNackOptions {
                        requeue: false,
                        ..BasicNackOptions::default()
                    })
                    .await
            }
        };

        if let Err(e) = settled {
            error!(queue = queue, delivery_tag = %message_id, error = %e, "Failed to settle delivery");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::destinations::Destinations;
    use crate::messaging::interfaces::into_handler;

    fn noop_handler() -> MessageHandler {
        into_handler(|_payload, _correlation_id| async { Ok(()) })
    }

    #[tokio::test]
    async fn test_publish_before_connect_is_rejected() {
        let mut publisher = RabbitMqPublisher::new(MessagingSettings::default());

        let outcome = publisher
            .publish(
                &Destinations::TEST_GENERATION_REQUESTED,
                &serde_json::json!({"specification_id": 42}),
                Some("abc-1"),
            )
            .await;

        assert!(matches!(outcome, Err(MessagingError::NotConnected { .. })));
    }

    #[tokio::test]
    async fn test_subscribe_before_connect_is_rejected() {
        let mut subscriber = RabbitMqSubscriber::new(MessagingSettings::default());

        let outcome = subscriber
            .subscribe(&Destinations::TEST_GENERATION_REQUESTED, noop_handler())
            .await;

        assert!(matches!(outcome, Err(MessagingError::NotConnected { .. })));
    }

    #[tokio::test]
    async fn test_start_consuming_before_connect_is_rejected() {
        let mut subscriber = RabbitMqSubscriber::new(MessagingSettings::default());

        let outcome = subscriber.start_consuming().await;

        assert!(matches!(outcome, Err(MessagingError::NotConnected { .. })));
    }

    #[tokio::test]
    async fn test_stop_consuming_is_idempotent_without_start() {
        let mut subscriber = RabbitMqSubscriber::new(MessagingSettings::default());

        assert!(subscriber.stop_consuming().await.is_ok());
        assert!(subscriber.stop_consuming().await.is_ok());
    }

    #[tokio::test]
    async fn test_disconnect_is_safe_without_connect() {
        let mut publisher = RabbitMqPublisher::new(MessagingSettings::default());
        assert!(publisher.disconnect().await.is_ok());

        let mut subscriber = RabbitMqSubscriber::new(MessagingSettings::default());
        assert!(subscriber.disconnect().await.is_ok());
    }
}
