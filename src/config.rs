//! Environment-sourced configuration.
//!
//! Loaded once at startup and held immutably for the process lifetime.
//! Validation is eager: every missing or malformed field is collected into
//! a single [`ConfigError`] so the operator sees the full list at once.

use thiserror::Error;
use url::Url;

/// Connection settings for a TestRail installation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the TestRail instance (e.g. `https://example.testrail.io`).
    pub base_url: Url,
    /// TestRail account email address.
    pub username: String,
    /// API key used as the basic-auth password.
    pub api_key: String,
    /// Project id substituted when a project-scoped tool omits `projectId`.
    pub default_project_id: Option<u64>,
}

/// One or more configuration fields are missing or invalid.
#[derive(Debug, Error)]
#[error("Invalid configuration: {}", problems.join("; "))]
pub struct ConfigError {
    pub problems: Vec<String>,
}

impl Config {
    /// Read configuration from `TESTRAIL_URL`, `TESTRAIL_USERNAME`,
    /// `TESTRAIL_API_KEY`, and `DEFAULT_PROJECT_ID`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::build(
            &std::env::var("TESTRAIL_URL").unwrap_or_default(),
            &std::env::var("TESTRAIL_USERNAME").unwrap_or_default(),
            &std::env::var("TESTRAIL_API_KEY").unwrap_or_default(),
            std::env::var("DEFAULT_PROJECT_ID").ok().as_deref(),
        )
    }

    /// Validate raw setting values. Errors name every failing field.
    pub fn build(
        url: &str,
        username: &str,
        api_key: &str,
        default_project_id: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut problems = Vec::new();

        let base_url = match Url::parse(url) {
            Ok(u) => Some(u),
            Err(e) => {
                problems.push(format!("TESTRAIL_URL is not a valid URL: {}", e));
                None
            }
        };

        if !is_email(username) {
            problems.push("TESTRAIL_USERNAME must be an email address".to_string());
        }

        if api_key.is_empty() {
            problems.push("TESTRAIL_API_KEY must not be empty".to_string());
        }

        let default_project_id = match default_project_id {
            Some(raw) => match raw.parse::<u64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    problems.push(format!("DEFAULT_PROJECT_ID is not an integer: '{}'", raw));
                    None
                }
            },
            None => None,
        };

        if !problems.is_empty() {
            return Err(ConfigError { problems });
        }

        Ok(Self {
            base_url: base_url.expect("validated above"),
            username: username.to_string(),
            api_key: api_key.to_string(),
            default_project_id,
        })
    }
}

/// Minimal structural email check: non-empty local part and a dotted domain.
fn is_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
