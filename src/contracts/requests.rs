//! # Test Generation Request Contracts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::contracts::models::{
    ApiCallRef, ApiCallSpec, AuthProfileRef, DomainRef, EnvironmentRef, TestProjectRef,
};

/// Payload for test generation request events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestGenerationRequest {
    /// Specification identifier
    pub specification_id: i64,
    /// Specification name
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Source input type
    pub input_type: String,
    /// Primary API method
    pub method: String,
    /// Primary API path
    pub path: String,
    /// Objective of the generated tests
    pub test_objective: String,
    #[serde(default)]
    pub request_example: Option<String>,
    /// Whether the endpoint requires auth
    pub requires_auth: bool,
    /// Whether the plan requires approval before generation
    pub approve_before_generation: bool,
    pub test_project: TestProjectRef,
    pub environment: EnvironmentRef,
    #[serde(default)]
    pub domain: Option<DomainRef>,
    #[serde(default)]
    pub auth_profile: Option<AuthProfileRef>,
    pub api_call: ApiCallSpec,
    #[serde(default)]
    pub supporting_api_calls: Vec<ApiCallRef>,
    /// Trace identifier
    pub trace_id: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}
