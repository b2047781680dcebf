use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A test run. The status counters are the server's derived aggregate
/// and are read-only from this system's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suite_id: Option<u64>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignedto_id: Option<u64>,
    pub include_all: bool,
    pub is_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_on: Option<i64>,
    pub passed_count: u64,
    pub blocked_count: u64,
    pub untested_count: u64,
    pub retest_count: u64,
    pub failed_count: u64,
    #[serde(default)]
    pub custom_status1_count: u64,
    #[serde(default)]
    pub custom_status2_count: u64,
    #[serde(default)]
    pub custom_status3_count: u64,
    #[serde(default)]
    pub custom_status4_count: u64,
    #[serde(default)]
    pub custom_status5_count: u64,
    #[serde(default)]
    pub custom_status6_count: u64,
    #[serde(default)]
    pub custom_status7_count: u64,
    pub project_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<u64>,
    pub created_on: i64,
    pub created_by: u64,
    pub url: String,
}

/// Payload for `add_run`. `include_all` controls whether the run covers
/// every case in the suite or an explicit selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRun {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suite_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignedto_id: Option<u64>,
    pub include_all: bool,
}

/// A recorded result for one test (a case instance within a run).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub id: u64,
    pub test_id: u64,
    /// 1 = Passed, 2 = Blocked, 3 = Untested, 4 = Retest, 5 = Failed.
    pub status_id: u64,
    pub created_by: u64,
    pub created_on: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignedto_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defects: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_step_results: Option<Vec<Value>>,
}

/// Payload for `add_result_for_case`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewResult {
    pub status_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defects: Option<String>,
}
