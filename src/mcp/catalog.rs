//! Static catalog of tools, resources, and prompts.
//!
//! Pure data consumed by the three list request kinds. The names and
//! argument schemas here must stay consistent with what the dispatch
//! router accepts; `tests/mcp_spec.rs` cross-checks that by dispatching
//! every declared name.

use std::sync::Arc;

use rmcp::model::{
    AnnotateAble, JsonObject, Prompt, PromptArgument, RawResource, Resource, Tool,
};
use serde_json::{json, Value};

pub const PROJECTS_RESOURCE_URI: &str = "testrail://projects";
pub const USERS_RESOURCE_URI: &str = "testrail://users";

pub const TEST_CASE_TEMPLATE_PROMPT: &str = "test_case_template";
pub const TEST_RUN_SUMMARY_PROMPT: &str = "test_run_summary";

fn tool(name: &'static str, description: &'static str, schema: Value) -> Tool {
    let input_schema: JsonObject = match schema {
        Value::Object(map) => map,
        _ => JsonObject::new(),
    };
    Tool {
        name: name.into(),
        title: None,
        description: Some(description.into()),
        input_schema: Arc::new(input_schema),
        output_schema: None,
        annotations: None,
        icons: None,
        meta: None,
    }
}

fn no_args_schema() -> Value {
    json!({ "type": "object", "properties": {} })
}

fn project_scope_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "projectId": {
                "type": "number",
                "description": "The ID of the project (optional: uses DEFAULT_PROJECT_ID if not provided)"
            }
        },
        "required": []
    })
}

/// Every tool the router dispatches, in catalog order.
pub fn tools() -> Vec<Tool> {
    vec![
        tool("get_projects", "Get all TestRail projects", no_args_schema()),
        tool(
            "get_project",
            "Get a specific TestRail project by ID",
            project_scope_schema(),
        ),
        tool(
            "get_suites",
            "Get test suites for a project",
            project_scope_schema(),
        ),
        tool(
            "get_sections",
            "Get sections from a project, optionally filtered by suite",
            json!({
                "type": "object",
                "properties": {
                    "projectId": {
                        "type": "number",
                        "description": "The ID of the project (optional: uses DEFAULT_PROJECT_ID if not provided)"
                    },
                    "suiteId": {
                        "type": "number",
                        "description": "Optional: Filter by suite ID"
                    }
                },
                "required": []
            }),
        ),
        tool(
            "get_test_cases",
            "Get test cases from a project, optionally filtered by suite or section",
            json!({
                "type": "object",
                "properties": {
                    "projectId": {
                        "type": "number",
                        "description": "The ID of the project (optional: uses DEFAULT_PROJECT_ID if not provided)"
                    },
                    "suiteId": {
                        "type": "number",
                        "description": "Optional: Filter by suite ID"
                    },
                    "sectionId": {
                        "type": "number",
                        "description": "Optional: Filter by section ID"
                    }
                },
                "required": []
            }),
        ),
        tool(
            "create_test_case",
            "Create a new test case",
            json!({
                "type": "object",
                "properties": {
                    "sectionId": {
                        "type": "number",
                        "description": "The ID of the section to create the test case in"
                    },
                    "title": {
                        "type": "string",
                        "description": "The title of the test case"
                    },
                    "type_id": {
                        "type": "number",
                        "description": "Optional: The type ID (default: 1)"
                    },
                    "priority_id": {
                        "type": "number",
                        "description": "Optional: The priority ID (1=Low, 2=Medium, 3=High, 4=Critical)"
                    },
                    "estimate": {
                        "type": "string",
                        "description": "Optional: Time estimate"
                    },
                    "refs": {
                        "type": "string",
                        "description": "Optional: References (e.g., requirements)"
                    },
                    "custom_steps_separated": {
                        "type": "array",
                        "description": "Optional: Test steps"
                    }
                },
                "required": ["sectionId", "title"]
            }),
        ),
        tool(
            "update_test_case",
            "Update fields on an existing test case",
            json!({
                "type": "object",
                "properties": {
                    "caseId": {
                        "type": "number",
                        "description": "The ID of the test case to update"
                    },
                    "title": {
                        "type": "string",
                        "description": "Optional: New title"
                    },
                    "type_id": {
                        "type": "number",
                        "description": "Optional: New type ID"
                    },
                    "priority_id": {
                        "type": "number",
                        "description": "Optional: New priority ID"
                    },
                    "estimate": {
                        "type": "string",
                        "description": "Optional: New time estimate"
                    },
                    "refs": {
                        "type": "string",
                        "description": "Optional: New references"
                    },
                    "custom_steps_separated": {
                        "type": "array",
                        "description": "Optional: Replacement test steps"
                    }
                },
                "required": ["caseId"]
            }),
        ),
        tool(
            "get_test_runs",
            "Get test runs for a project",
            project_scope_schema(),
        ),
        tool(
            "create_test_run",
            "Create a new test run",
            json!({
                "type": "object",
                "properties": {
                    "projectId": {
                        "type": "number",
                        "description": "The ID of the project (optional: uses DEFAULT_PROJECT_ID if not provided)"
                    },
                    "name": {
                        "type": "string",
                        "description": "The name of the test run"
                    },
                    "description": {
                        "type": "string",
                        "description": "Optional: Description of the test run"
                    },
                    "suiteId": {
                        "type": "number",
                        "description": "Optional: The suite ID"
                    },
                    "milestoneId": {
                        "type": "number",
                        "description": "Optional: The milestone ID"
                    },
                    "assignedtoId": {
                        "type": "number",
                        "description": "Optional: User ID to assign the run to"
                    },
                    "include_all": {
                        "type": "boolean",
                        "description": "Whether to include all test cases (default: true)"
                    }
                },
                "required": ["name"]
            }),
        ),
        tool(
            "close_test_run",
            "Close a test run, archiving its results",
            json!({
                "type": "object",
                "properties": {
                    "runId": {
                        "type": "number",
                        "description": "The ID of the test run to close"
                    }
                },
                "required": ["runId"]
            }),
        ),
        tool(
            "add_test_result",
            "Add a test result",
            json!({
                "type": "object",
                "properties": {
                    "runId": {
                        "type": "number",
                        "description": "The ID of the test run"
                    },
                    "caseId": {
                        "type": "number",
                        "description": "The ID of the test case"
                    },
                    "status_id": {
                        "type": "number",
                        "description": "Status ID (1=Passed, 2=Blocked, 3=Untested, 4=Retest, 5=Failed)"
                    },
                    "comment": {
                        "type": "string",
                        "description": "Optional: Comment about the result"
                    },
                    "version": {
                        "type": "string",
                        "description": "Optional: Version tested"
                    },
                    "elapsed": {
                        "type": "string",
                        "description": "Optional: Time elapsed (e.g., \"5m\" or \"1h 30m\")"
                    },
                    "defects": {
                        "type": "string",
                        "description": "Optional: Bug/defect references"
                    }
                },
                "required": ["runId", "caseId", "status_id"]
            }),
        ),
        tool(
            "get_test_results",
            "Get recorded results for a test",
            json!({
                "type": "object",
                "properties": {
                    "testId": {
                        "type": "number",
                        "description": "The ID of the test (case instance within a run)"
                    }
                },
                "required": ["testId"]
            }),
        ),
        tool(
            "get_milestones",
            "Get milestones for a project",
            project_scope_schema(),
        ),
        tool("get_users", "Get all TestRail users", no_args_schema()),
        tool(
            "test_connection",
            "Test the connection to TestRail",
            no_args_schema(),
        ),
        tool(
            "parse_testrail_url",
            "Parse a TestRail URL and automatically call the appropriate tool",
            json!({
                "type": "object",
                "properties": {
                    "url": {
                        "type": "string",
                        "description": "The TestRail URL to parse (e.g., test case, test run, project URLs)"
                    }
                },
                "required": ["url"]
            }),
        ),
    ]
}

pub fn resources() -> Vec<Resource> {
    vec![
        RawResource {
            uri: PROJECTS_RESOURCE_URI.to_string(),
            name: "TestRail Projects".to_string(),
            title: None,
            description: Some("List of all TestRail projects".to_string()),
            mime_type: Some("application/json".to_string()),
            size: None,
            icons: None,
            meta: None,
        }
        .no_annotation(),
        RawResource {
            uri: USERS_RESOURCE_URI.to_string(),
            name: "TestRail Users".to_string(),
            title: None,
            description: Some("List of all TestRail users".to_string()),
            mime_type: Some("application/json".to_string()),
            size: None,
            icons: None,
            meta: None,
        }
        .no_annotation(),
    ]
}

pub fn prompts() -> Vec<Prompt> {
    vec![
        Prompt::new(
            TEST_CASE_TEMPLATE_PROMPT,
            Some("Generate a test case template"),
            Some(vec![
                PromptArgument {
                    name: "feature".to_string(),
                    title: None,
                    description: Some("The feature being tested".to_string()),
                    required: Some(true),
                },
                PromptArgument {
                    name: "priority".to_string(),
                    title: None,
                    description: Some("Priority level (Low, Medium, High, Critical)".to_string()),
                    required: Some(false),
                },
            ]),
        ),
        Prompt::new(
            TEST_RUN_SUMMARY_PROMPT,
            Some("Generate a test run summary report"),
            Some(vec![
                PromptArgument {
                    name: "projectId".to_string(),
                    title: None,
                    description: Some("The project ID".to_string()),
                    required: Some(true),
                },
                PromptArgument {
                    name: "runId".to_string(),
                    title: None,
                    description: Some("The test run ID".to_string()),
                    required: Some(true),
                },
            ]),
        ),
    ]
}
