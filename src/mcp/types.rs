//! Typed parameter structs for MCP tools.
//!
//! Each tool's argument bag is deserialized into one of these before any
//! network call; required/optional fields mirror the catalog declarations
//! in [`super::catalog`]. Field names follow the original wire contract:
//! identifier arguments are camelCase (`projectId`, `suiteId`), TestRail
//! record fields stay snake_case (`type_id`, `status_id`, `include_all`).

use serde::Deserialize;
use serde_json::Value;

use crate::models::{CaseUpdate, NewCase, NewResult, NewRun};

/// Arguments for tools scoped to a single project, where `projectId` may
/// be omitted in favor of the configured default.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectScopeParams {
    #[serde(rename = "projectId")]
    pub project_id: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GetSectionsParams {
    #[serde(rename = "projectId")]
    pub project_id: Option<u64>,
    #[serde(rename = "suiteId")]
    pub suite_id: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GetCasesParams {
    #[serde(rename = "projectId")]
    pub project_id: Option<u64>,
    #[serde(rename = "suiteId")]
    pub suite_id: Option<u64>,
    #[serde(rename = "sectionId")]
    pub section_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCaseParams {
    #[serde(rename = "sectionId")]
    pub section_id: u64,
    pub title: String,
    pub type_id: Option<u64>,
    pub priority_id: Option<u64>,
    pub estimate: Option<String>,
    pub refs: Option<String>,
    pub custom_steps_separated: Option<Vec<Value>>,
}

impl CreateCaseParams {
    pub fn into_payload(self) -> (u64, NewCase) {
        (
            self.section_id,
            NewCase {
                title: self.title,
                type_id: self.type_id,
                priority_id: self.priority_id,
                estimate: self.estimate,
                refs: self.refs,
                custom_steps_separated: self.custom_steps_separated,
            },
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateCaseParams {
    #[serde(rename = "caseId")]
    pub case_id: u64,
    pub title: Option<String>,
    pub type_id: Option<u64>,
    pub priority_id: Option<u64>,
    pub estimate: Option<String>,
    pub refs: Option<String>,
    pub custom_steps_separated: Option<Vec<Value>>,
}

impl UpdateCaseParams {
    pub fn into_payload(self) -> (u64, CaseUpdate) {
        (
            self.case_id,
            CaseUpdate {
                title: self.title,
                type_id: self.type_id,
                priority_id: self.priority_id,
                estimate: self.estimate,
                refs: self.refs,
                custom_steps_separated: self.custom_steps_separated,
            },
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateRunParams {
    #[serde(rename = "projectId")]
    pub project_id: Option<u64>,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "suiteId")]
    pub suite_id: Option<u64>,
    #[serde(rename = "milestoneId")]
    pub milestone_id: Option<u64>,
    #[serde(rename = "assignedtoId")]
    pub assignedto_id: Option<u64>,
    /// Defaults to `true` when the caller says nothing; an explicit
    /// `false` is respected.
    pub include_all: Option<bool>,
}

impl CreateRunParams {
    pub fn into_payload(self) -> (Option<u64>, NewRun) {
        (
            self.project_id,
            NewRun {
                name: self.name,
                description: self.description,
                suite_id: self.suite_id,
                milestone_id: self.milestone_id,
                assignedto_id: self.assignedto_id,
                include_all: self.include_all.unwrap_or(true),
            },
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct CloseRunParams {
    #[serde(rename = "runId")]
    pub run_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct AddResultParams {
    #[serde(rename = "runId")]
    pub run_id: u64,
    #[serde(rename = "caseId")]
    pub case_id: u64,
    pub status_id: u64,
    pub comment: Option<String>,
    pub version: Option<String>,
    pub elapsed: Option<String>,
    pub defects: Option<String>,
}

impl AddResultParams {
    pub fn into_payload(self) -> (u64, u64, NewResult) {
        (
            self.run_id,
            self.case_id,
            NewResult {
                status_id: self.status_id,
                comment: self.comment,
                version: self.version,
                elapsed: self.elapsed,
                defects: self.defects,
            },
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct GetResultsParams {
    #[serde(rename = "testId")]
    pub test_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct ParseUrlParams {
    pub url: String,
}
