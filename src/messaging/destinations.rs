//! # Destination Registry
//!
//! Centralized destination definitions for all agents. Never hardcode
//! exchange, queue, topic, or subscription names in agent code - always
//! reference them from here.
//!
//! Every destination carries addressing for both backends, so the active
//! backend can change through configuration without touching any caller.

/// RabbitMQ addressing: durable topic exchange, durable queue, routing key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RabbitMqDestination {
    pub exchange: &'static str,
    pub queue: &'static str,
    pub routing_key: &'static str,
}

/// Pub/Sub addressing: topic and subscription ids, scoped under the
/// configured project at resolution time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PubSubDestination {
    pub topic: &'static str,
    pub subscription: &'static str,
}

/// A logical messaging destination resolvable on either backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessagingDestination {
    /// Globally unique, human-readable identifier
    pub name: &'static str,
    pub rabbitmq: RabbitMqDestination,
    pub pubsub: PubSubDestination,
}

/// Shared exchange carrying every Aegis event on the RabbitMQ backend
const EVENTS_EXCHANGE: &str = "aegis-test.events";

/// Centralized destination definitions for all agents.
///
/// Usage:
///
/// ```rust
/// use aegis_agents::messaging::Destinations;
///
/// let destination = Destinations::TEST_GENERATION_REQUESTED;
/// assert_eq!(destination.pubsub.topic, "aegis-test.test-generation.requested");
/// ```
pub struct Destinations;

impl Destinations {
    // ==========================================================================
    // TEST GENERATION
    // ==========================================================================

    pub const TEST_GENERATION_REQUESTED: MessagingDestination = MessagingDestination {
        name: "test-generation-requested",
        rabbitmq: RabbitMqDestination {
            exchange: EVENTS_EXCHANGE,
            queue: "test-planner.test-generation.requested",
            routing_key: "test-generation.requested",
        },
        pubsub: PubSubDestination {
            topic: "aegis-test.test-generation.requested",
            subscription: "test-planner.aegis-test.test-generation.requested",
        },
    };

    // ==========================================================================
    // TEST PLANNING
    // ==========================================================================

    pub const TEST_GENERATION_PLANNING_STARTED: MessagingDestination = MessagingDestination {
        name: "test-generation-planning-started",
        rabbitmq: RabbitMqDestination {
            exchange: EVENTS_EXCHANGE,
            queue: "orchestrator.test-generation.planning.started",
            routing_key: "test-generation.planning.started",
        },
        pubsub: PubSubDestination {
            topic: "aegis-test.test-generation.planning.started",
            subscription: "orchestrator.aegis-test.test-generation.planning.started",
        },
    };

    pub const TEST_GENERATION_PLANNED: MessagingDestination = MessagingDestination {
        name: "test-generation-planning-completed",
        rabbitmq: RabbitMqDestination {
            exchange: EVENTS_EXCHANGE,
            queue: "orchestrator.test-generation.planning.completed",
            routing_key: "test-generation.planning.completed",
        },
        pubsub: PubSubDestination {
            topic: "aegis-test.test-generation.planning.completed",
            subscription: "orchestrator.aegis-test.test-generation.planning.completed",
        },
    };

    pub const TEST_GENERATION_PLANNING_FAILED: MessagingDestination = MessagingDestination {
        name: "test-generation-planning-failed",
        rabbitmq: RabbitMqDestination {
            exchange: EVENTS_EXCHANGE,
            queue: "orchestrator.test-generation.planning.failed",
            routing_key: "test-generation.planning.failed",
        },
        pubsub: PubSubDestination {
            topic: "aegis-test.test-generation.planning.failed",
            subscription: "orchestrator.aegis-test.test-generation.planning.failed",
        },
    };

    /// Every registered destination, for registry-wide checks
    pub const ALL: [MessagingDestination; 4] = [
        Self::TEST_GENERATION_REQUESTED,
        Self::TEST_GENERATION_PLANNING_STARTED,
        Self::TEST_GENERATION_PLANNED,
        Self::TEST_GENERATION_PLANNING_FAILED,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_destination_has_complete_addressing() {
        for destination in Destinations::ALL {
            assert!(!destination.name.is_empty());
            assert!(!destination.rabbitmq.exchange.is_empty(), "{}", destination.name);
            assert!(!destination.rabbitmq.queue.is_empty(), "{}", destination.name);
            assert!(!destination.rabbitmq.routing_key.is_empty(), "{}", destination.name);
            assert!(!destination.pubsub.topic.is_empty(), "{}", destination.name);
            assert!(!destination.pubsub.subscription.is_empty(), "{}", destination.name);
        }
    }

    #[test]
    fn test_destination_names_are_unique() {
        let names: HashSet<&str> = Destinations::ALL.iter().map(|d| d.name).collect();
        assert_eq!(names.len(), Destinations::ALL.len());
    }

    #[test]
    fn test_queues_and_subscriptions_are_unique() {
        let queues: HashSet<&str> = Destinations::ALL.iter().map(|d| d.rabbitmq.queue).collect();
        assert_eq!(queues.len(), Destinations::ALL.len());

        let subscriptions: HashSet<&str> =
            Destinations::ALL.iter().map(|d| d.pubsub.subscription).collect();
        assert_eq!(subscriptions.len(), Destinations::ALL.len());
    }
}
