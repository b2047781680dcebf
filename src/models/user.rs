use serde::{Deserialize, Serialize};

/// A TestRail user, referenced by `assignedto_id` on runs and results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub role_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}
