use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A test case as stored by TestRail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    pub id: u64,
    pub title: String,
    pub section_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<u64>,
    pub type_id: u64,
    pub priority_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refs: Option<String>,
    pub created_by: u64,
    pub created_on: i64,
    pub updated_by: u64,
    pub updated_on: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate_forecast: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suite_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_steps_separated: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_preconds: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_expected: Option<String>,
    pub url: String,
}

/// Payload for `add_case`. Only `title` is required; TestRail applies
/// defaults for `type_id` and `priority_id` when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCase {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_steps_separated: Option<Vec<Value>>,
}

/// Partial payload for `update_case`. Absent fields are left untouched
/// by the server, so every field is optional and skipped when `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_steps_separated: Option<Vec<Value>>,
}
