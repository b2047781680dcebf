//! Dispatch router integration tests.
//!
//! Runs the server against an in-memory fake backend so every behavior
//! is exercised without a TestRail instance: soft error envelopes for
//! tools, hard failures for resources and prompts, default-project
//! fallback, payload defaults, and URL-driven dispatch.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;
use rmcp::model::{CallToolResult, JsonObject};
use serde_json::{json, Value};

use testrail_mcp::client::{ClientError, TestRailApi};
use testrail_mcp::mcp::{catalog, TestRailServer};
use testrail_mcp::models::*;

/// Backend fake. `fail` makes every remote call return an API error;
/// `created_runs` records `add_run` payloads for inspection.
#[derive(Clone, Default)]
struct FakeApi {
    default_project_id: Option<u64>,
    fail: bool,
    created_runs: Arc<Mutex<Vec<(u64, NewRun)>>>,
}

impl FakeApi {
    fn with_default_project(id: u64) -> Self {
        Self {
            default_project_id: Some(id),
            ..Self::default()
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn remote_error(&self) -> ClientError {
        ClientError::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
        }
    }

    fn check(&self) -> Result<(), ClientError> {
        if self.fail {
            Err(self.remote_error())
        } else {
            Ok(())
        }
    }
}

fn sample_project(id: u64) -> Project {
    Project {
        id,
        name: format!("Project {id}"),
        announcement: None,
        show_announcement: None,
        is_completed: false,
        completed_on: None,
        suite_mode: 1,
        url: format!("https://example.testrail.io/index.php?/projects/overview/{id}"),
    }
}

fn sample_case(id: u64) -> Case {
    Case {
        id,
        title: format!("Case {id}"),
        section_id: 1,
        template_id: None,
        type_id: 1,
        priority_id: 2,
        milestone_id: None,
        refs: None,
        created_by: 1,
        created_on: 0,
        updated_by: 1,
        updated_on: 0,
        estimate: None,
        estimate_forecast: None,
        suite_id: Some(1),
        custom_steps_separated: None,
        custom_preconds: None,
        custom_expected: None,
        url: format!("https://example.testrail.io/index.php?/cases/view/{id}"),
    }
}

fn sample_run(id: u64) -> Run {
    Run {
        id,
        suite_id: Some(1),
        name: format!("Run {id}"),
        description: None,
        milestone_id: None,
        assignedto_id: None,
        include_all: true,
        is_completed: true,
        completed_on: Some(0),
        passed_count: 7,
        blocked_count: 1,
        untested_count: 0,
        retest_count: 0,
        failed_count: 2,
        custom_status1_count: 0,
        custom_status2_count: 0,
        custom_status3_count: 0,
        custom_status4_count: 0,
        custom_status5_count: 0,
        custom_status6_count: 0,
        custom_status7_count: 0,
        project_id: 1,
        plan_id: None,
        created_on: 0,
        created_by: 1,
        url: format!("https://example.testrail.io/index.php?/runs/view/{id}"),
    }
}

fn sample_result(test_id: u64) -> TestResult {
    TestResult {
        id: 1,
        test_id,
        status_id: 1,
        created_by: 1,
        created_on: 0,
        assignedto_id: None,
        comment: None,
        version: None,
        elapsed: None,
        defects: None,
        custom_step_results: None,
    }
}

#[async_trait]
impl TestRailApi for FakeApi {
    fn default_project_id(&self) -> Option<u64> {
        self.default_project_id
    }

    async fn get_projects(&self) -> Result<Vec<Project>, ClientError> {
        self.check()?;
        Ok(vec![sample_project(1), sample_project(2)])
    }

    async fn get_project(&self, project_id: u64) -> Result<Project, ClientError> {
        self.check()?;
        Ok(sample_project(project_id))
    }

    async fn get_suites(&self, project_id: u64) -> Result<Vec<Suite>, ClientError> {
        self.check()?;
        Ok(vec![Suite {
            id: 1,
            name: "Master".to_string(),
            description: None,
            project_id,
            is_master: true,
            is_baseline: false,
            is_completed: false,
            completed_on: None,
            url: "https://example.testrail.io/index.php?/suites/view/1".to_string(),
        }])
    }

    async fn get_sections(
        &self,
        _project_id: u64,
        suite_id: Option<u64>,
    ) -> Result<Vec<Section>, ClientError> {
        self.check()?;
        Ok(vec![Section {
            id: 9,
            name: "Login".to_string(),
            description: None,
            suite_id: suite_id.unwrap_or(1),
            parent_id: None,
            display_order: 1,
            depth: 0,
        }])
    }

    async fn get_cases(
        &self,
        _project_id: u64,
        _suite_id: Option<u64>,
        _section_id: Option<u64>,
    ) -> Result<Vec<Case>, ClientError> {
        self.check()?;
        Ok(vec![sample_case(10), sample_case(11)])
    }

    async fn get_case(&self, case_id: u64) -> Result<Case, ClientError> {
        self.check()?;
        Ok(sample_case(case_id))
    }

    async fn add_case(&self, section_id: u64, case: &NewCase) -> Result<Case, ClientError> {
        self.check()?;
        let mut created = sample_case(100);
        created.section_id = section_id;
        created.title = case.title.clone();
        Ok(created)
    }

    async fn update_case(&self, case_id: u64, case: &CaseUpdate) -> Result<Case, ClientError> {
        self.check()?;
        let mut updated = sample_case(case_id);
        if let Some(title) = &case.title {
            updated.title = title.clone();
        }
        Ok(updated)
    }

    async fn get_runs(&self, _project_id: u64) -> Result<Vec<Run>, ClientError> {
        self.check()?;
        Ok(vec![sample_run(5)])
    }

    async fn get_run(&self, run_id: u64) -> Result<Run, ClientError> {
        self.check()?;
        Ok(sample_run(run_id))
    }

    async fn add_run(&self, project_id: u64, run: &NewRun) -> Result<Run, ClientError> {
        self.check()?;
        self.created_runs
            .lock()
            .unwrap()
            .push((project_id, run.clone()));
        let mut created = sample_run(200);
        created.name = run.name.clone();
        created.include_all = run.include_all;
        created.project_id = project_id;
        Ok(created)
    }

    async fn close_run(&self, run_id: u64) -> Result<Run, ClientError> {
        self.check()?;
        let mut closed = sample_run(run_id);
        closed.is_completed = true;
        Ok(closed)
    }

    async fn get_results(&self, test_id: u64) -> Result<Vec<TestResult>, ClientError> {
        self.check()?;
        Ok(vec![sample_result(test_id)])
    }

    async fn add_result_for_case(
        &self,
        _run_id: u64,
        _case_id: u64,
        result: &NewResult,
    ) -> Result<TestResult, ClientError> {
        self.check()?;
        let mut created = sample_result(1);
        created.status_id = result.status_id;
        created.comment = result.comment.clone();
        Ok(created)
    }

    async fn get_users(&self) -> Result<Vec<User>, ClientError> {
        self.check()?;
        Ok(vec![User {
            id: 1,
            name: "QA Lead".to_string(),
            email: "qa@example.com".to_string(),
            is_active: true,
            role_id: 1,
            role: Some("Lead".to_string()),
        }])
    }

    async fn get_milestones(&self, project_id: u64) -> Result<Vec<Milestone>, ClientError> {
        self.check()?;
        Ok(vec![Milestone {
            id: 3,
            name: "v1.0".to_string(),
            description: None,
            start_on: None,
            started_on: None,
            due_on: None,
            completed_on: None,
            is_completed: false,
            is_started: true,
            project_id,
            parent_id: None,
            url: "https://example.testrail.io/index.php?/milestones/view/3".to_string(),
        }])
    }
}

fn server(api: FakeApi) -> TestRailServer<FakeApi> {
    TestRailServer::new(api)
}

fn args(value: Value) -> Option<JsonObject> {
    value.as_object().cloned()
}

fn result_text(result: &CallToolResult) -> &str {
    result
        .content
        .first()
        .expect("content")
        .as_text()
        .expect("text content")
        .text
        .as_str()
}

mod tool_dispatch {
    use super::*;

    /// Minimal valid arguments for each declared tool, assuming a
    /// configured default project.
    fn minimal_args(tool: &str) -> Option<JsonObject> {
        match tool {
            "create_test_case" => args(json!({ "sectionId": 9, "title": "Login works" })),
            "update_test_case" => args(json!({ "caseId": 10, "title": "Renamed" })),
            "create_test_run" => args(json!({ "name": "Nightly" })),
            "close_test_run" => args(json!({ "runId": 5 })),
            "add_test_result" => args(json!({ "runId": 5, "caseId": 10, "status_id": 1 })),
            "get_test_results" => args(json!({ "testId": 77 })),
            "parse_testrail_url" => {
                args(json!({ "url": "https://example.testrail.io/cases/view/10" }))
            }
            _ => None,
        }
    }

    #[tokio::test]
    async fn every_declared_tool_dispatches_successfully() {
        let server = server(FakeApi::with_default_project(1));
        for tool in catalog::tools() {
            let name = tool.name.to_string();
            let result = server.call_tool_soft(&name, minimal_args(&name)).await;
            assert_ne!(
                result.is_error,
                Some(true),
                "tool {} failed: {}",
                name,
                result_text(&result)
            );
        }
    }

    #[tokio::test]
    async fn every_declared_tool_wraps_remote_failures_softly() {
        // Default project configured so every tool reaches the backend
        // instead of stopping at argument validation.
        let api = FakeApi {
            fail: true,
            default_project_id: Some(1),
            ..FakeApi::default()
        };
        let server = server(api);
        for tool in catalog::tools() {
            let name = tool.name.to_string();
            let result = server.call_tool_soft(&name, minimal_args(&name)).await;
            if name == "test_connection" {
                // Contract: a broken connection is a diagnosis, not an
                // error envelope.
                assert_ne!(result.is_error, Some(true));
            } else {
                assert_eq!(
                    result.is_error,
                    Some(true),
                    "tool {} did not report a soft error",
                    name
                );
                assert!(result_text(&result).starts_with("Error: "));
            }
        }
    }

    #[tokio::test]
    async fn unknown_tool_is_a_soft_error() {
        let server = server(FakeApi::default());
        let result = server.call_tool_soft("launch_rockets", None).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(result_text(&result), "Error: Unknown tool: launch_rockets");
    }

    #[tokio::test]
    async fn remote_failures_are_wrapped_not_raised() {
        let server = server(FakeApi::failing());
        let result = server.call_tool_soft("get_projects", None).await;
        assert_eq!(result.is_error, Some(true));
        let text = result_text(&result);
        assert!(text.starts_with("Error: "), "unexpected envelope: {text}");
        assert!(text.contains("boom"));
    }

    #[tokio::test]
    async fn invalid_arguments_are_a_soft_error() {
        let server = server(FakeApi::default());
        let result = server
            .call_tool_soft("close_test_run", args(json!({ "runId": "not a number" })))
            .await;
        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).starts_with("Error: Invalid arguments for close_test_run"));
    }

    #[tokio::test]
    async fn missing_project_id_falls_back_to_default() {
        let server = server(FakeApi::with_default_project(42));
        let result = server.call_tool_soft("get_project", None).await;
        assert_ne!(result.is_error, Some(true));
        let project: Value = serde_json::from_str(result_text(&result)).expect("json body");
        assert_eq!(project["id"], 42);
    }

    #[tokio::test]
    async fn explicit_project_id_wins_over_default() {
        let server = server(FakeApi::with_default_project(42));
        let result = server
            .call_tool_soft("get_project", args(json!({ "projectId": 7 })))
            .await;
        let project: Value = serde_json::from_str(result_text(&result)).expect("json body");
        assert_eq!(project["id"], 7);
    }

    #[tokio::test]
    async fn missing_project_id_without_default_is_a_soft_error() {
        let server = server(FakeApi::default());
        let result = server.call_tool_soft("get_test_runs", None).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result_text(&result),
            "Error: No projectId provided and no DEFAULT_PROJECT_ID configured"
        );
    }
}

mod run_creation {
    use super::*;

    #[tokio::test]
    async fn include_all_defaults_to_true() {
        let api = FakeApi::with_default_project(1);
        let server = server(api.clone());
        let result = server
            .call_tool_soft("create_test_run", args(json!({ "name": "Nightly" })))
            .await;
        assert_ne!(result.is_error, Some(true));

        let recorded = api.created_runs.lock().unwrap();
        let (project_id, run) = recorded.first().expect("recorded run");
        assert_eq!(*project_id, 1);
        assert!(run.include_all);
    }

    #[tokio::test]
    async fn explicit_include_all_false_is_respected() {
        let api = FakeApi::with_default_project(1);
        let server = server(api.clone());
        server
            .call_tool_soft(
                "create_test_run",
                args(json!({ "name": "Selected", "include_all": false, "suiteId": 4 })),
            )
            .await;

        let recorded = api.created_runs.lock().unwrap();
        let (_, run) = recorded.first().expect("recorded run");
        assert!(!run.include_all);
        assert_eq!(run.suite_id, Some(4));
    }

    #[tokio::test]
    async fn explicit_project_id_overrides_default() {
        let api = FakeApi::with_default_project(1);
        let server = server(api.clone());
        server
            .call_tool_soft(
                "create_test_run",
                args(json!({ "projectId": 9, "name": "Scoped" })),
            )
            .await;

        let recorded = api.created_runs.lock().unwrap();
        let (project_id, _) = recorded.first().expect("recorded run");
        assert_eq!(*project_id, 9);
    }
}

mod url_tool {
    use super::*;

    async fn parse(server: &TestRailServer<FakeApi>, url: &str) -> CallToolResult {
        server
            .call_tool_soft("parse_testrail_url", args(json!({ "url": url })))
            .await
    }

    #[tokio::test]
    async fn case_view_url_fetches_the_case() {
        let server = server(FakeApi::default());
        let result = parse(&server, "https://example.testrail.io/cases/view/1234").await;
        let text = result_text(&result);
        assert!(text.starts_with("Detected TestRail test case URL. Retrieved case ID 1234:"));
        assert!(text.contains("\"id\": 1234"));
    }

    #[tokio::test]
    async fn index_php_urls_resolve_the_same_way() {
        let server = server(FakeApi::default());
        let result = parse(
            &server,
            "https://example.testrail.io/index.php?/runs/view/88",
        )
        .await;
        assert!(result_text(&result)
            .starts_with("Detected TestRail test run URL. Retrieved run ID 88:"));
    }

    #[tokio::test]
    async fn case_list_url_reports_the_filters_it_used() {
        let server = server(FakeApi::default());
        let result = parse(
            &server,
            "https://example.testrail.io/index.php?/cases/56&suite_id=7&section_id=9",
        )
        .await;
        let text = result_text(&result);
        assert!(text.contains("for project ID 56, suite ID 7, section ID 9:"));
    }

    #[tokio::test]
    async fn unmatched_url_lists_the_supported_patterns() {
        let server = server(FakeApi::default());
        let result = parse(&server, "https://example.testrail.io/unknown/path").await;
        assert_ne!(result.is_error, Some(true));
        let text = result_text(&result);
        assert!(text.starts_with("URL parsed but no matching TestRail pattern found."));
        assert!(text.contains("- Test Case: /cases/view/{case_id}"));
        assert!(text.contains("Provided URL path: /unknown/path"));
    }

    #[tokio::test]
    async fn malformed_url_is_a_soft_error() {
        let server = server(FakeApi::default());
        let result = parse(&server, "not a url").await;
        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).starts_with("Error: Failed to parse URL:"));
    }

    #[tokio::test]
    async fn remote_failure_during_url_fetch_is_soft() {
        let server = server(FakeApi::failing());
        let result = parse(&server, "https://example.testrail.io/cases/view/1").await;
        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).starts_with("Error: "));
    }
}

mod connection_tool {
    use super::*;

    #[tokio::test]
    async fn reports_success_with_default_project() {
        let server = server(FakeApi::with_default_project(5));
        let result = server.call_tool_soft("test_connection", None).await;
        assert_eq!(
            result_text(&result),
            "Connection to TestRail successful!\nDefault Project ID: 5"
        );
    }

    #[tokio::test]
    async fn reports_success_without_default_project() {
        let server = server(FakeApi::default());
        let result = server.call_tool_soft("test_connection", None).await;
        assert_eq!(
            result_text(&result),
            "Connection to TestRail successful!\nNo default project ID configured."
        );
    }

    #[tokio::test]
    async fn reports_failure_as_a_normal_result() {
        // A broken connection is a diagnosis, not an error envelope.
        let server = server(FakeApi::failing());
        let result = server.call_tool_soft("test_connection", None).await;
        assert_ne!(result.is_error, Some(true));
        assert_eq!(
            result_text(&result),
            "Failed to connect to TestRail. Please check your configuration."
        );
    }
}

mod resources {
    use super::*;
    use rmcp::model::ResourceContents;

    fn resource_text(result: &rmcp::model::ReadResourceResult) -> &str {
        match result.contents.first().expect("contents") {
            ResourceContents::TextResourceContents { text, .. } => text,
            other => panic!("unexpected contents: {:?}", other),
        }
    }

    #[tokio::test]
    async fn projects_resource_returns_json() {
        let server = server(FakeApi::default());
        let result = server
            .read_resource_uri("testrail://projects")
            .await
            .expect("resource read");
        let projects: Value = serde_json::from_str(resource_text(&result)).expect("json");
        assert_eq!(projects.as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn users_resource_returns_json() {
        let server = server(FakeApi::default());
        let result = server
            .read_resource_uri("testrail://users")
            .await
            .expect("resource read");
        assert!(resource_text(&result).contains("qa@example.com"));
    }

    #[tokio::test]
    async fn unknown_resource_is_a_hard_error_naming_the_uri() {
        let server = server(FakeApi::default());
        let err = server
            .read_resource_uri("testrail://nope")
            .await
            .expect_err("must fail");
        assert!(err.message.contains("testrail://nope"));
    }

    #[tokio::test]
    async fn backend_failure_is_a_hard_error_naming_the_uri() {
        let server = server(FakeApi::failing());
        let err = server
            .read_resource_uri("testrail://projects")
            .await
            .expect_err("must fail");
        assert!(err
            .message
            .contains("Failed to read resource testrail://projects"));
    }
}

mod prompts {
    use super::*;
    use rmcp::model::PromptMessageContent;

    fn message_text(result: &rmcp::model::GetPromptResult) -> &str {
        match &result.messages.first().expect("message").content {
            PromptMessageContent::Text { text } => text,
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[tokio::test]
    async fn case_template_defaults_priority_to_medium() {
        let server = server(FakeApi::default());
        let result = server
            .render_prompt("test_case_template", args(json!({ "feature": "checkout" })))
            .await
            .expect("prompt");
        let text = message_text(&result);
        assert!(text.contains("feature: checkout"));
        assert!(text.contains("Priority: Medium"));
    }

    #[tokio::test]
    async fn run_summary_computes_the_pass_rate() {
        // The fake's run counts 7 passed out of 10 executed.
        let server = server(FakeApi::default());
        let result = server
            .render_prompt(
                "test_run_summary",
                args(json!({ "projectId": "1", "runId": "5" })),
            )
            .await
            .expect("prompt");
        let text = message_text(&result);
        assert!(text.contains("- Total Tests: 10"));
        assert!(text.contains("- Pass Rate: 70.0%"));
        assert!(text.contains("Test Run: Run 5"));
    }

    #[tokio::test]
    async fn run_summary_requires_both_ids_before_any_fetch() {
        // A failing backend would surface as an internal error; the
        // invalid_params message proves validation ran first.
        let server = server(FakeApi::failing());
        let err = server
            .render_prompt("test_run_summary", args(json!({ "projectId": 1 })))
            .await
            .expect_err("must fail");
        assert!(err.message.contains("Both projectId and runId are required"));
    }

    #[tokio::test]
    async fn backend_failure_during_summary_is_a_hard_error() {
        let server = server(FakeApi::failing());
        let err = server
            .render_prompt(
                "test_run_summary",
                args(json!({ "projectId": 1, "runId": 5 })),
            )
            .await
            .expect_err("must fail");
        assert!(err.message.contains("Failed to generate test run summary"));
    }

    #[tokio::test]
    async fn unknown_prompt_is_a_hard_error() {
        let server = server(FakeApi::default());
        let err = server
            .render_prompt("nope", None)
            .await
            .expect_err("must fail");
        assert!(err.message.contains("Unknown prompt: nope"));
    }
}

mod catalog_declarations {
    use super::*;

    #[test]
    fn tool_names_are_unique() {
        let tools = catalog::tools();
        let mut names: Vec<_> = tools.iter().map(|t| t.name.to_string()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), tools.len());
    }

    #[test]
    fn declares_both_resources_and_both_prompts() {
        let resources = catalog::resources();
        assert_eq!(resources.len(), 2);
        assert!(resources.iter().any(|r| r.uri == "testrail://projects"));
        assert!(resources.iter().any(|r| r.uri == "testrail://users"));

        let prompts = catalog::prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts.iter().any(|p| p.name == "test_case_template"));
        assert!(prompts.iter().any(|p| p.name == "test_run_summary"));
    }

    #[test]
    fn every_tool_schema_is_an_object() {
        for tool in catalog::tools() {
            assert_eq!(
                tool.input_schema.get("type").and_then(Value::as_str),
                Some("object"),
                "tool {} has a non-object schema",
                tool.name
            );
        }
    }
}
