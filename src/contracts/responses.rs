//! # Test Planning Event Contracts

use serde::{Deserialize, Serialize};

use crate::contracts::models::{CoverageAnalysis, FeaturePlan, PlanMetrics};

/// Event emitted when planning starts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestPlanningStartedEvent {
    pub trace_id: String,
    pub specification_id: i64,
}

/// Event emitted to report planning progress
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestPlanningProgressEvent {
    pub trace_id: String,
    pub specification_id: i64,
    /// Progress percentage, 0-100
    pub percentage: u8,
    #[serde(default)]
    pub message: Option<String>,
}

/// Event emitted when planning completes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestPlanningCompletedEvent {
    pub trace_id: String,
    pub specification_id: i64,
    pub summary: String,
    pub requires_approval: bool,
    pub features: Vec<FeaturePlan>,
    #[serde(default)]
    pub coverage_analysis: Option<CoverageAnalysis>,
    #[serde(default)]
    pub metrics: Option<PlanMetrics>,
}

/// Event emitted when planning fails
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestPlanningFailedEvent {
    pub trace_id: String,
    pub specification_id: i64,
    /// Error category
    pub error_type: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_event_round_trip() {
        let event = TestPlanningCompletedEvent {
            trace_id: "trace-1".to_string(),
            specification_id: 42,
            summary: "3 features planned".to_string(),
            requires_approval: true,
            features: vec![],
            coverage_analysis: None,
            metrics: Some(PlanMetrics {
                tokens_used: Some(1200),
                estimated_duration: None,
            }),
        };

        let serialized = serde_json::to_string(&event).expect("Failed to serialize");
        let deserialized: TestPlanningCompletedEvent =
            serde_json::from_str(&serialized).expect("Failed to deserialize");
        assert_eq!(event, deserialized);
    }
}
