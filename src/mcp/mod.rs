//! MCP server surface: catalog listing, tool dispatch, resources, prompts.
//!
//! Tool failures are soft: every error is folded into a `CallToolResult`
//! with `isError` set and a text body of `Error: {message}`, so a broken
//! TestRail call never kills the session. Resource reads and prompt
//! rendering fail hard with protocol errors instead.

pub mod catalog;
pub mod prompts;
pub mod types;
pub mod url_parse;

use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, GetPromptRequestParam, GetPromptResult,
    JsonObject, ListPromptsResult, ListResourcesResult, ListToolsResult, PaginatedRequestParam,
    PromptMessage, PromptMessageContent, PromptMessageRole, ReadResourceRequestParam,
    ReadResourceResult, ResourceContents, ServerInfo,
};
use rmcp::{ErrorData as McpError, ServerHandler, ServiceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::client::{ClientError, TestRailApi, TestRailClient};
use crate::config::Config;

use self::catalog::{
    PROJECTS_RESOURCE_URI, TEST_CASE_TEMPLATE_PROMPT, TEST_RUN_SUMMARY_PROMPT, USERS_RESOURCE_URI,
};
use self::types::*;
use self::url_parse::{UrlResolution, UrlTarget, SUPPORTED_PATTERNS};

/// Everything that can go wrong inside a tool call. All of these are
/// reported softly through the result envelope.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {source}")]
    InvalidParams {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No projectId provided and no DEFAULT_PROJECT_ID configured")]
    NoProjectId,

    #[error(transparent)]
    MalformedUrl(#[from] url_parse::ParseUrlError),

    #[error(transparent)]
    Remote(#[from] ClientError),

    #[error("Failed to serialize response: {0}")]
    Serialize(serde_json::Error),
}

/// MCP server generic over the TestRail backend.
#[derive(Clone)]
pub struct TestRailServer<C> {
    client: C,
}

impl<C: TestRailApi> TestRailServer<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Explicit id wins; otherwise the configured default; otherwise an
    /// error naming both missing sources.
    fn resolve_project_id(&self, explicit: Option<u64>) -> Result<u64, ToolError> {
        explicit
            .or_else(|| self.client.default_project_id())
            .ok_or(ToolError::NoProjectId)
    }

    /// Run a tool and fold any failure into the soft error envelope.
    pub async fn call_tool_soft(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        match self.dispatch_tool(name, arguments).await {
            Ok(text) => CallToolResult::success(vec![Content::text(text)]),
            Err(err) => {
                tracing::warn!(tool = name, error = %err, "tool call failed");
                CallToolResult::error(vec![Content::text(format!("Error: {err}"))])
            }
        }
    }

    /// The dispatch table. Every name here has a declaration in
    /// [`catalog::tools`] and vice versa.
    pub async fn dispatch_tool(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<String, ToolError> {
        let args = Value::Object(arguments.unwrap_or_default());
        match name {
            "get_projects" => pretty(&self.client.get_projects().await?),
            "get_project" => {
                let params: ProjectScopeParams = parse_args(name, args)?;
                let project_id = self.resolve_project_id(params.project_id)?;
                pretty(&self.client.get_project(project_id).await?)
            }
            "get_suites" => {
                let params: ProjectScopeParams = parse_args(name, args)?;
                let project_id = self.resolve_project_id(params.project_id)?;
                pretty(&self.client.get_suites(project_id).await?)
            }
            "get_sections" => {
                let params: GetSectionsParams = parse_args(name, args)?;
                let project_id = self.resolve_project_id(params.project_id)?;
                pretty(&self.client.get_sections(project_id, params.suite_id).await?)
            }
            "get_test_cases" => {
                let params: GetCasesParams = parse_args(name, args)?;
                let project_id = self.resolve_project_id(params.project_id)?;
                pretty(
                    &self
                        .client
                        .get_cases(project_id, params.suite_id, params.section_id)
                        .await?,
                )
            }
            "create_test_case" => {
                let params: CreateCaseParams = parse_args(name, args)?;
                let (section_id, case) = params.into_payload();
                pretty(&self.client.add_case(section_id, &case).await?)
            }
            "update_test_case" => {
                let params: UpdateCaseParams = parse_args(name, args)?;
                let (case_id, update) = params.into_payload();
                pretty(&self.client.update_case(case_id, &update).await?)
            }
            "get_test_runs" => {
                let params: ProjectScopeParams = parse_args(name, args)?;
                let project_id = self.resolve_project_id(params.project_id)?;
                pretty(&self.client.get_runs(project_id).await?)
            }
            "create_test_run" => {
                let params: CreateRunParams = parse_args(name, args)?;
                let (explicit_project, run) = params.into_payload();
                let project_id = self.resolve_project_id(explicit_project)?;
                pretty(&self.client.add_run(project_id, &run).await?)
            }
            "close_test_run" => {
                let params: CloseRunParams = parse_args(name, args)?;
                pretty(&self.client.close_run(params.run_id).await?)
            }
            "add_test_result" => {
                let params: AddResultParams = parse_args(name, args)?;
                let (run_id, case_id, result) = params.into_payload();
                pretty(&self.client.add_result_for_case(run_id, case_id, &result).await?)
            }
            "get_test_results" => {
                let params: GetResultsParams = parse_args(name, args)?;
                pretty(&self.client.get_results(params.test_id).await?)
            }
            "get_milestones" => {
                let params: ProjectScopeParams = parse_args(name, args)?;
                let project_id = self.resolve_project_id(params.project_id)?;
                pretty(&self.client.get_milestones(project_id).await?)
            }
            "get_users" => pretty(&self.client.get_users().await?),
            "test_connection" => Ok(self.connection_report().await),
            "parse_testrail_url" => {
                let params: ParseUrlParams = parse_args(name, args)?;
                self.fetch_from_url(&params.url).await
            }
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }

    async fn connection_report(&self) -> String {
        if self.client.test_connection().await {
            let mut message = String::from("Connection to TestRail successful!");
            match self.client.default_project_id() {
                Some(id) => message.push_str(&format!("\nDefault Project ID: {id}")),
                None => message.push_str("\nNo default project ID configured."),
            }
            message
        } else {
            "Failed to connect to TestRail. Please check your configuration.".to_string()
        }
    }

    /// Resolve a TestRail link and fetch whatever it points at.
    async fn fetch_from_url(&self, raw: &str) -> Result<String, ToolError> {
        let target = match url_parse::resolve(raw)? {
            UrlResolution::Target(target) => target,
            UrlResolution::NoMatch { path } => return Ok(no_match_message(&path)),
        };

        match target {
            UrlTarget::Case { case_id } => {
                let case = self.client.get_case(case_id).await?;
                Ok(format!(
                    "Detected TestRail test case URL. Retrieved case ID {}:\n\n{}",
                    case_id,
                    pretty(&case)?
                ))
            }
            UrlTarget::Run { run_id } => {
                let run = self.client.get_run(run_id).await?;
                Ok(format!(
                    "Detected TestRail test run URL. Retrieved run ID {}:\n\n{}",
                    run_id,
                    pretty(&run)?
                ))
            }
            UrlTarget::Project { project_id } => {
                let project = self.client.get_project(project_id).await?;
                Ok(format!(
                    "Detected TestRail project URL. Retrieved project ID {}:\n\n{}",
                    project_id,
                    pretty(&project)?
                ))
            }
            UrlTarget::CaseList {
                project_id,
                suite_id,
                section_id,
            } => {
                let cases = self.client.get_cases(project_id, suite_id, section_id).await?;
                let mut message = format!(
                    "Detected TestRail test cases list URL. Retrieved test cases for project ID {project_id}"
                );
                if let Some(suite_id) = suite_id {
                    message.push_str(&format!(", suite ID {suite_id}"));
                }
                if let Some(section_id) = section_id {
                    message.push_str(&format!(", section ID {section_id}"));
                }
                Ok(format!("{}:\n\n{}", message, pretty(&cases)?))
            }
            UrlTarget::RunList { project_id } => {
                let runs = self.client.get_runs(project_id).await?;
                Ok(format!(
                    "Detected TestRail test runs list URL. Retrieved test runs for project ID {}:\n\n{}",
                    project_id,
                    pretty(&runs)?
                ))
            }
        }
    }

    /// Read one of the declared resources. Unknown URIs and backend
    /// failures are hard protocol errors, both naming the URI.
    pub async fn read_resource_uri(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        let fetched = match uri {
            PROJECTS_RESOURCE_URI => self
                .client
                .get_projects()
                .await
                .map_err(ToolError::from)
                .and_then(|projects| pretty(&projects)),
            USERS_RESOURCE_URI => self
                .client
                .get_users()
                .await
                .map_err(ToolError::from)
                .and_then(|users| pretty(&users)),
            other => {
                return Err(McpError::resource_not_found(
                    format!("Unknown resource: {other}"),
                    None,
                ))
            }
        };

        let text = fetched
            .map_err(|err| McpError::internal_error(format!("Failed to read resource {uri}: {err}"), None))?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::TextResourceContents {
                uri: uri.to_string(),
                mime_type: Some("application/json".to_string()),
                text,
                meta: None,
            }],
        })
    }

    /// Render one of the declared prompts. Argument validation happens
    /// before any network call.
    pub async fn render_prompt(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<GetPromptResult, McpError> {
        let args = arguments.unwrap_or_default();
        match name {
            TEST_CASE_TEMPLATE_PROMPT => {
                let feature = string_arg(&args, "feature").unwrap_or_else(|| "Feature Name".into());
                let priority = string_arg(&args, "priority").unwrap_or_else(|| "Medium".into());
                Ok(user_prompt(prompts::test_case_template(&feature, &priority)))
            }
            TEST_RUN_SUMMARY_PROMPT => {
                let (Some(project_id), Some(run_id)) =
                    (id_arg(&args, "projectId"), id_arg(&args, "runId"))
                else {
                    return Err(McpError::invalid_params(
                        "Both projectId and runId are required",
                        None,
                    ));
                };

                let run = self.client.get_run(run_id).await.map_err(summary_failure)?;
                let project = self
                    .client
                    .get_project(project_id)
                    .await
                    .map_err(summary_failure)?;
                Ok(user_prompt(prompts::test_run_summary(&project, &run)))
            }
            other => Err(McpError::invalid_params(format!("Unknown prompt: {other}"), None)),
        }
    }
}

fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|source| ToolError::InvalidParams {
        tool: tool.to_string(),
        source,
    })
}

fn pretty<T: Serialize>(value: &T) -> Result<String, ToolError> {
    serde_json::to_string_pretty(value).map_err(ToolError::Serialize)
}

fn no_match_message(path: &str) -> String {
    let mut message =
        String::from("URL parsed but no matching TestRail pattern found. Supported patterns:\n");
    for pattern in SUPPORTED_PATTERNS {
        message.push_str(&format!("- {pattern}\n"));
    }
    message.push_str(&format!("\nProvided URL path: {path}"));
    message
}

/// Prompt arguments arrive as a JSON object; ids may be numbers or
/// numeric strings depending on the client.
fn id_arg(args: &JsonObject, key: &str) -> Option<u64> {
    let value = args.get(key)?;
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

fn string_arg(args: &JsonObject, key: &str) -> Option<String> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn user_prompt(text: String) -> GetPromptResult {
    GetPromptResult {
        description: None,
        messages: vec![PromptMessage {
            role: PromptMessageRole::User,
            content: PromptMessageContent::Text { text },
        }],
    }
}

fn summary_failure(err: ClientError) -> McpError {
    McpError::internal_error(format!("Failed to generate test run summary: {err}"), None)
}

impl<C: TestRailApi + 'static> ServerHandler for TestRailServer<C> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: rmcp::model::Implementation {
                name: "testrail-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            instructions: Some(
                "TestRail MCP server. Exposes TestRail projects, suites, sections, test \
                 cases, runs, results, milestones, and users as tools; project and user \
                 listings as resources; and test-case/test-run report prompts. Tools that \
                 take a projectId fall back to the configured DEFAULT_PROJECT_ID when the \
                 argument is omitted. parse_testrail_url accepts a TestRail web link and \
                 fetches whatever it points at."
                    .into(),
            ),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult {
            tools: catalog::tools(),
            ..Default::default()
        }))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            Ok(self
                .call_tool_soft(request.name.as_ref(), request.arguments)
                .await)
        }
    }

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListResourcesResult {
            resources: catalog::resources(),
            ..Default::default()
        }))
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move { self.read_resource_uri(&request.uri).await }
    }

    fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListPromptsResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListPromptsResult {
            prompts: catalog::prompts(),
            ..Default::default()
        }))
    }

    fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<GetPromptResult, McpError>> + Send + '_ {
        async move { self.render_prompt(&request.name, request.arguments).await }
    }
}

/// Serve the MCP protocol over stdin/stdout until the peer disconnects.
pub async fn run_stdio_server(config: &Config) -> anyhow::Result<()> {
    use tokio::io::{stdin, stdout};

    tracing::info!("Starting TestRail MCP server via stdio");

    let service = TestRailServer::new(TestRailClient::new(config));
    let server = service.serve((stdin(), stdout())).await?;

    let quit_reason = server.waiting().await?;
    tracing::info!("MCP server stopped: {:?}", quit_reason);

    Ok(())
}
