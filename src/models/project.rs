use serde::{Deserialize, Serialize};

/// A TestRail project, the top-level container for suites and runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub announcement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_announcement: Option<bool>,
    pub is_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_on: Option<i64>,
    /// 1 = single suite, 2 = single suite + baselines, 3 = multiple suites.
    pub suite_mode: u64,
    pub url: String,
}

/// A test suite within a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suite {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub project_id: u64,
    pub is_master: bool,
    pub is_baseline: bool,
    pub is_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_on: Option<i64>,
    pub url: String,
}

/// A section grouping test cases within a suite. Sections form a tree;
/// root sections have no `parent_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub suite_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
    pub display_order: u64,
    pub depth: u64,
}

/// A project milestone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_on: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_on: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_on: Option<i64>,
    pub is_completed: bool,
    pub is_started: bool,
    pub project_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
    pub url: String,
}
