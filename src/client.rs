//! HTTP facade over the TestRail REST API.
//!
//! TestRail's API lives entirely in the query string: every endpoint is
//! addressed as `{base}/index.php?/api/v2/<op>/<id>` and additional
//! parameters are appended with `&`. Paths are therefore built as plain
//! strings and optional filters are omitted entirely when absent, since
//! the server treats a missing key differently from an empty value.
//!
//! Authentication is HTTP basic: account email as the username, API key
//! as the password. Every call is a fresh round trip; no retries, no
//! caching, and errors propagate upward untouched (except in
//! [`TestRailApi::test_connection`], whose contract is to reduce failure
//! to `false`).

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::config::Config;
use crate::models::*;

/// Facade errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TestRail API error ({status}): {body}")]
    Api { status: StatusCode, body: String },
}

/// The operations the dispatch router needs from TestRail.
///
/// Implemented by [`TestRailClient`] for production and by fakes in tests.
#[async_trait]
pub trait TestRailApi: Send + Sync {
    /// The configured default project id, if any. No network access.
    fn default_project_id(&self) -> Option<u64>;

    async fn get_projects(&self) -> Result<Vec<Project>, ClientError>;
    async fn get_project(&self, project_id: u64) -> Result<Project, ClientError>;
    async fn get_suites(&self, project_id: u64) -> Result<Vec<Suite>, ClientError>;
    async fn get_sections(
        &self,
        project_id: u64,
        suite_id: Option<u64>,
    ) -> Result<Vec<Section>, ClientError>;
    async fn get_cases(
        &self,
        project_id: u64,
        suite_id: Option<u64>,
        section_id: Option<u64>,
    ) -> Result<Vec<Case>, ClientError>;
    async fn get_case(&self, case_id: u64) -> Result<Case, ClientError>;
    async fn add_case(&self, section_id: u64, case: &NewCase) -> Result<Case, ClientError>;
    async fn update_case(&self, case_id: u64, case: &CaseUpdate) -> Result<Case, ClientError>;
    async fn get_runs(&self, project_id: u64) -> Result<Vec<Run>, ClientError>;
    async fn get_run(&self, run_id: u64) -> Result<Run, ClientError>;
    async fn add_run(&self, project_id: u64, run: &NewRun) -> Result<Run, ClientError>;
    async fn close_run(&self, run_id: u64) -> Result<Run, ClientError>;
    async fn get_results(&self, test_id: u64) -> Result<Vec<TestResult>, ClientError>;
    async fn add_result_for_case(
        &self,
        run_id: u64,
        case_id: u64,
        result: &NewResult,
    ) -> Result<TestResult, ClientError>;
    async fn get_users(&self) -> Result<Vec<User>, ClientError>;
    async fn get_milestones(&self, project_id: u64) -> Result<Vec<Milestone>, ClientError>;

    /// Attempt the cheapest read and reduce the outcome to a boolean.
    /// This is the one place an error is intentionally swallowed.
    async fn test_connection(&self) -> bool {
        self.get_projects().await.is_ok()
    }
}

/// HTTP client for the TestRail API.
#[derive(Debug, Clone)]
pub struct TestRailClient {
    base_url: String,
    username: String,
    api_key: String,
    default_project_id: Option<u64>,
    http: Client,
}

impl TestRailClient {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            username: config.username.clone(),
            api_key: config.api_key.clone(),
            default_project_id: config.default_project_id,
            http: Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/index.php?/api/v2{}", self.base_url, path)
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::Api { status, body })
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self
            .http
            .get(self.endpoint(path))
            .basic_auth(&self.username, Some(&self.api_key))
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self
            .http
            .post(self.endpoint(path))
            .basic_auth(&self.username, Some(&self.api_key))
            .json(body)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self
            .http
            .post(self.endpoint(path))
            .basic_auth(&self.username, Some(&self.api_key))
            .send()
            .await?;
        self.handle_response(response).await
    }
}

/// `/get_sections/{projectId}` with the suite filter appended only when present.
fn sections_path(project_id: u64, suite_id: Option<u64>) -> String {
    let mut path = format!("/get_sections/{}", project_id);
    if let Some(suite_id) = suite_id {
        path.push_str(&format!("&suite_id={}", suite_id));
    }
    path
}

/// `/get_cases/{projectId}` with only the filters the caller supplied.
fn cases_path(project_id: u64, suite_id: Option<u64>, section_id: Option<u64>) -> String {
    let mut path = format!("/get_cases/{}", project_id);
    if let Some(suite_id) = suite_id {
        path.push_str(&format!("&suite_id={}", suite_id));
    }
    if let Some(section_id) = section_id {
        path.push_str(&format!("&section_id={}", section_id));
    }
    path
}

#[async_trait]
impl TestRailApi for TestRailClient {
    fn default_project_id(&self) -> Option<u64> {
        self.default_project_id
    }

    async fn get_projects(&self) -> Result<Vec<Project>, ClientError> {
        self.get_json("/get_projects").await
    }

    async fn get_project(&self, project_id: u64) -> Result<Project, ClientError> {
        self.get_json(&format!("/get_project/{}", project_id)).await
    }

    async fn get_suites(&self, project_id: u64) -> Result<Vec<Suite>, ClientError> {
        self.get_json(&format!("/get_suites/{}", project_id)).await
    }

    async fn get_sections(
        &self,
        project_id: u64,
        suite_id: Option<u64>,
    ) -> Result<Vec<Section>, ClientError> {
        self.get_json(&sections_path(project_id, suite_id)).await
    }

    async fn get_cases(
        &self,
        project_id: u64,
        suite_id: Option<u64>,
        section_id: Option<u64>,
    ) -> Result<Vec<Case>, ClientError> {
        self.get_json(&cases_path(project_id, suite_id, section_id))
            .await
    }

    async fn get_case(&self, case_id: u64) -> Result<Case, ClientError> {
        self.get_json(&format!("/get_case/{}", case_id)).await
    }

    async fn add_case(&self, section_id: u64, case: &NewCase) -> Result<Case, ClientError> {
        self.post_json(&format!("/add_case/{}", section_id), case)
            .await
    }

    async fn update_case(&self, case_id: u64, case: &CaseUpdate) -> Result<Case, ClientError> {
        self.post_json(&format!("/update_case/{}", case_id), case)
            .await
    }

    async fn get_runs(&self, project_id: u64) -> Result<Vec<Run>, ClientError> {
        self.get_json(&format!("/get_runs/{}", project_id)).await
    }

    async fn get_run(&self, run_id: u64) -> Result<Run, ClientError> {
        self.get_json(&format!("/get_run/{}", run_id)).await
    }

    async fn add_run(&self, project_id: u64, run: &NewRun) -> Result<Run, ClientError> {
        self.post_json(&format!("/add_run/{}", project_id), run).await
    }

    async fn close_run(&self, run_id: u64) -> Result<Run, ClientError> {
        self.post_empty(&format!("/close_run/{}", run_id)).await
    }

    async fn get_results(&self, test_id: u64) -> Result<Vec<TestResult>, ClientError> {
        self.get_json(&format!("/get_results/{}", test_id)).await
    }

    async fn add_result_for_case(
        &self,
        run_id: u64,
        case_id: u64,
        result: &NewResult,
    ) -> Result<TestResult, ClientError> {
        self.post_json(&format!("/add_result_for_case/{}/{}", run_id, case_id), result)
            .await
    }

    async fn get_users(&self) -> Result<Vec<User>, ClientError> {
        self.get_json("/get_users").await
    }

    async fn get_milestones(&self, project_id: u64) -> Result<Vec<Milestone>, ClientError> {
        self.get_json(&format!("/get_milestones/{}", project_id))
            .await
    }
}
