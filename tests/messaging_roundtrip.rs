//! Integration tests for the messaging layer.
//!
//! Broker round trips require a reachable broker and are skipped unless the
//! corresponding environment is provided:
//!
//! - RabbitMQ: set `AEGIS_TEST_RABBITMQ_HOST` (e.g. `localhost`)
//! - Pub/Sub: set `PUBSUB_EMULATOR_HOST` (e.g. `localhost:8681`)
//!
//! Everything else runs without any broker.

use std::time::Duration;

use aegis_agents::messaging::{
    into_handler, Destinations, MessageHandler, MessagePublisher, MessageSubscriber,
    MessagingBackend, MessagingError, MessagingFactory, MessagingSettings,
};

type Delivery = (serde_json::Value, Option<String>);

/// Handler that forwards every delivery into a channel the test can await
fn channel_handler() -> (MessageHandler, tokio::sync::mpsc::UnboundedReceiver<Delivery>) {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let handler = into_handler(move |payload, correlation_id| {
        let tx = tx.clone();
        async move {
            tx.send((payload, correlation_id)).ok();
            Ok(())
        }
    });
    (handler, rx)
}

#[tokio::test]
async fn publish_before_connect_performs_no_io() {
    let settings = MessagingSettings::default();
    let mut publisher = MessagingFactory::create_publisher(Some(settings)).unwrap();

    let outcome = publisher
        .publish(
            &Destinations::TEST_GENERATION_REQUESTED,
            &serde_json::json!({"specification_id": 42, "name": "x"}),
            Some("abc-1"),
        )
        .await;

    assert!(matches!(outcome, Err(MessagingError::NotConnected { .. })));
}

#[tokio::test]
async fn stop_consuming_twice_leaves_subscriber_stopped() {
    for backend in [MessagingBackend::RabbitMq, MessagingBackend::PubSub] {
        let settings = MessagingSettings {
            backend,
            ..MessagingSettings::default()
        };
        let mut subscriber = MessagingFactory::create_subscriber(Some(settings)).unwrap();

        assert!(subscriber.stop_consuming().await.is_ok());
        assert!(subscriber.stop_consuming().await.is_ok());
    }
}

#[tokio::test]
async fn rabbitmq_round_trip_delivers_payload_once() {
    let Ok(host) = std::env::var("AEGIS_TEST_RABBITMQ_HOST") else {
        println!("Skipping RabbitMQ round trip - no AEGIS_TEST_RABBITMQ_HOST provided");
        return;
    };

    let settings = MessagingSettings {
        backend: MessagingBackend::RabbitMq,
        rabbitmq_host: host,
        ..MessagingSettings::default()
    };

    let (handler, mut deliveries) = channel_handler();

    let mut subscriber = MessagingFactory::create_subscriber(Some(settings.clone())).unwrap();
    subscriber.connect().await.unwrap();
    subscriber
        .subscribe(&Destinations::TEST_GENERATION_REQUESTED, handler)
        .await
        .unwrap();
    subscriber.start_consuming().await.unwrap();

    let mut publisher = MessagingFactory::create_publisher(Some(settings)).unwrap();
    publisher.connect().await.unwrap();

    let payload = serde_json::json!({"specification_id": 42, "name": "x"});
    publisher
        .publish(&Destinations::TEST_GENERATION_REQUESTED, &payload, Some("abc-1"))
        .await
        .unwrap();

    let (delivered, correlation_id) = tokio::time::timeout(Duration::from_secs(10), deliveries.recv())
        .await
        .expect("timed out waiting for delivery")
        .expect("delivery channel closed");
    assert_eq!(delivered, payload);
    assert_eq!(correlation_id.as_deref(), Some("abc-1"));

    publisher.disconnect().await.unwrap();
    subscriber.stop_consuming().await.unwrap();
    // A second stop is a no-op
    subscriber.stop_consuming().await.unwrap();
    subscriber.disconnect().await.unwrap();
}

#[tokio::test]
async fn pubsub_round_trip_delivers_payload_once() {
    if std::env::var("PUBSUB_EMULATOR_HOST").is_err() {
        println!("Skipping Pub/Sub round trip - no PUBSUB_EMULATOR_HOST provided");
        return;
    }

    let settings = MessagingSettings {
        backend: MessagingBackend::PubSub,
        pubsub_project_id: "aegis-local".to_string(),
        ..MessagingSettings::default()
    };

    provision_emulator_resources(&settings).await;

    let (handler, mut deliveries) = channel_handler();

    let mut subscriber = MessagingFactory::create_subscriber(Some(settings.clone())).unwrap();
    subscriber.connect().await.unwrap();
    subscriber
        .subscribe(&Destinations::TEST_GENERATION_REQUESTED, handler)
        .await
        .unwrap();
    subscriber.start_consuming().await.unwrap();

    let mut publisher = MessagingFactory::create_publisher(Some(settings)).unwrap();
    publisher.connect().await.unwrap();

    let payload = serde_json::json!({"specification_id": 42, "name": "x"});
    publisher
        .publish(&Destinations::TEST_GENERATION_REQUESTED, &payload, Some("abc-1"))
        .await
        .unwrap();

    let (delivered, correlation_id) = tokio::time::timeout(Duration::from_secs(15), deliveries.recv())
        .await
        .expect("timed out waiting for delivery")
        .expect("delivery channel closed");
    assert_eq!(delivered, payload);
    assert_eq!(correlation_id.as_deref(), Some("abc-1"));

    publisher.disconnect().await.unwrap();
    subscriber.disconnect().await.unwrap();
}

/// Create the topic and subscription on the emulator if they do not exist
async fn provision_emulator_resources(settings: &MessagingSettings) {
    use google_cloud_pubsub::client::{Client, ClientConfig};
    use google_cloud_pubsub::subscription::SubscriptionConfig;

    let mut config = ClientConfig::default();
    config.project_id = Some(settings.pubsub_project_id.clone());
    let client = Client::new(config).await.expect("emulator client");

    let destination = Destinations::TEST_GENERATION_REQUESTED;
    let topic = client.topic(destination.pubsub.topic);
    if !topic.exists(None).await.expect("topic lookup") {
        topic.create(None, None).await.expect("topic create");
    }

    let subscription = client.subscription(destination.pubsub.subscription);
    if !subscription.exists(None).await.expect("subscription lookup") {
        subscription
            .create(
                topic.fully_qualified_name(),
                SubscriptionConfig::default(),
                None,
            )
            .await
            .expect("subscription create");
    }
}
