//! # Shared Contract Models
//!
//! Building blocks referenced by the request and response contracts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Standard message headers for all transports
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageHeaders {
    /// System or service that sent the message
    pub sender: String,
    /// UTC timestamp when the message was produced
    pub timestamp: DateTime<Utc>,
    /// Correlation ID for tracing
    pub correlation_id: String,
    /// Optional message identifier
    #[serde(default)]
    pub message_id: Option<String>,
    /// Optional trace identifier
    #[serde(default)]
    pub trace_id: Option<String>,
}

impl MessageHeaders {
    /// Create headers stamped now, with a fresh message id
    pub fn new(sender: impl Into<String>, correlation_id: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            timestamp: Utc::now(),
            correlation_id: correlation_id.into(),
            message_id: Some(Uuid::new_v4().to_string()),
            trace_id: None,
        }
    }
}

/// Reference to a test project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestProjectRef {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
}

/// Reference to an environment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvironmentRef {
    pub id: i64,
    pub name: String,
    pub base_url: String,
}

/// Reference to a business domain
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomainRef {
    pub id: i64,
    pub name: String,
}

/// Reference to an auth profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthProfileRef {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Reference to an API call used for supporting context
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiCallRef {
    pub id: i64,
    pub name: String,
    pub method: String,
    pub path: String,
}

/// API call specification used for planning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiCallSpec {
    pub id: i64,
    pub name: String,
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub request_schema: Option<serde_json::Value>,
    #[serde(default)]
    pub response_schema: Option<serde_json::Value>,
    #[serde(default)]
    pub response_status_codes: Option<Vec<u16>>,
    #[serde(default)]
    pub request_examples: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub response_examples: Option<Vec<serde_json::Value>>,
}

/// A single test step within a scenario
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepPlan {
    pub step_number: u32,
    pub step_name: String,
}

/// Outline column definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioOutlineHeader {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Outline data row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioOutlineRow {
    pub data: serde_json::Value,
}

/// Scenario outline configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioOutline {
    pub headers: Vec<ScenarioOutlineHeader>,
    pub rows: Vec<ScenarioOutlineRow>,
}

/// Planned scenario definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioPlan {
    pub scenario_number: u32,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub outlines: Option<Vec<ScenarioOutline>>,
    pub steps: Vec<StepPlan>,
}

/// Planned feature definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeaturePlan {
    pub feature_number: u32,
    pub feature_name: String,
    #[serde(default)]
    pub feature_tags: Option<Vec<String>>,
    pub scenarios: Vec<ScenarioPlan>,
}

/// Coverage analysis details for a plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoverageAnalysis {
    #[serde(default)]
    pub endpoints_covered: Option<u32>,
    #[serde(default)]
    pub total_endpoints: Option<u32>,
    #[serde(default)]
    pub coverage_percentage: Option<f64>,
    #[serde(default)]
    pub missing_endpoints: Option<Vec<String>>,
}

/// Metrics collected during planning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanMetrics {
    #[serde(default)]
    pub tokens_used: Option<u64>,
    #[serde(default)]
    pub estimated_duration: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_headers_round_trip() {
        let headers = MessageHeaders::new("orchestrator", "abc-1");
        assert!(headers.message_id.is_some());
        assert!(headers.trace_id.is_none());

        let serialized = serde_json::to_string(&headers).expect("Failed to serialize");
        let deserialized: MessageHeaders =
            serde_json::from_str(&serialized).expect("Failed to deserialize");
        assert_eq!(headers, deserialized);
    }

    #[test]
    fn test_kind_fields_serialize_as_type() {
        let profile = AuthProfileRef {
            id: 1,
            name: "service-account".to_string(),
            kind: "oauth2".to_string(),
        };
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["type"], "oauth2");
    }
}
