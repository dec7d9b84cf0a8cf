//! Entry point for the Aegis test agents.
//!
//! Starts a subscriber on the configured messaging backend and listens for
//! test generation requests. Planning itself is not wired up yet; the
//! handler only records what arrived.

use aegis_agents::logging::init_structured_logging;
use aegis_agents::messaging::{
    into_handler, Destinations, MessageSubscriber, MessagingFactory, MessagingSettings,
};
use tracing::info;

/// Handle an incoming test generation request
async fn handle_test_generation_request(
    payload: serde_json::Value,
    correlation_id: Option<String>,
) -> anyhow::Result<()> {
    info!(
        correlation_id = correlation_id.as_deref(),
        payload = %payload,
        "Received test generation request"
    );
    // TODO: decode into contracts::TestGenerationRequest and hand off to the
    // test planner once it exists
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_structured_logging();
    info!("Starting Aegis test agents");

    let settings = MessagingSettings::from_env()?;
    let mut subscriber = MessagingFactory::create_subscriber(Some(settings))?;

    subscriber.connect().await?;
    subscriber
        .subscribe(
            &Destinations::TEST_GENERATION_REQUESTED,
            into_handler(handle_test_generation_request),
        )
        .await?;
    subscriber.start_consuming().await?;

    info!("Listening for messages...");
    tokio::signal::ctrl_c().await?;

    info!("Shutting down...");
    subscriber.disconnect().await?;
    Ok(())
}
