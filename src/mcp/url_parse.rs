//! Structural resolver for TestRail URLs.
//!
//! Recognizes the five link shapes TestRail's web UI produces and extracts
//! the embedded identifiers. Matching is an ordered list of structural
//! checks (fixed path segments plus a decimal-integer capture), evaluated
//! first-match-wins. No regular expressions.
//!
//! TestRail routes everything through `index.php`, so real links carry the
//! logical path inside the query string (`/index.php?/cases/view/12`).
//! When the query begins with `/`, the query is treated as the effective
//! path; plain paths (`/cases/view/12`) work the same way.

use thiserror::Error;
use url::Url;

/// The five link shapes, used in error listings and tests.
pub const SUPPORTED_PATTERNS: [&str; 5] = [
    "Test Case: /cases/view/{case_id}",
    "Test Run: /runs/view/{run_id}",
    "Project: /projects/overview/{project_id}",
    "Test Cases List: /cases/{project_id}",
    "Test Runs List: /runs/{project_id}",
];

/// A recognized TestRail link, decomposed into an operation and its ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlTarget {
    Case {
        case_id: u64,
    },
    Run {
        run_id: u64,
    },
    Project {
        project_id: u64,
    },
    CaseList {
        project_id: u64,
        suite_id: Option<u64>,
        section_id: Option<u64>,
    },
    RunList {
        project_id: u64,
    },
}

/// Outcome for a syntactically valid URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlResolution {
    Target(UrlTarget),
    /// Valid URL, but its path matches none of the known shapes. Carries
    /// the effective path so the caller can report what failed to match.
    NoMatch { path: String },
}

/// The input was not a syntactically valid URL at all. Distinct from
/// [`UrlResolution::NoMatch`], which applies to well-formed URLs with an
/// unrecognized path.
#[derive(Debug, Error)]
#[error("Failed to parse URL: {0}")]
pub struct ParseUrlError(#[from] url::ParseError);

/// Resolve a TestRail URL into an operation and its parameters.
pub fn resolve(raw: &str) -> Result<UrlResolution, ParseUrlError> {
    let url = Url::parse(raw)?;
    let (path, params) = effective_path_and_params(&url);

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let target = match segments.as_slice() {
        ["cases", "view", id] => parse_id(id).map(|case_id| UrlTarget::Case { case_id }),
        ["runs", "view", id] => parse_id(id).map(|run_id| UrlTarget::Run { run_id }),
        ["projects", "overview", id] => {
            parse_id(id).map(|project_id| UrlTarget::Project { project_id })
        }
        ["cases", id] => parse_id(id).map(|project_id| UrlTarget::CaseList {
            project_id,
            suite_id: numeric_param(&params, "suite_id"),
            section_id: numeric_param(&params, "section_id"),
        }),
        ["runs", id] => parse_id(id).map(|project_id| UrlTarget::RunList { project_id }),
        _ => None,
    };

    Ok(match target {
        Some(target) => UrlResolution::Target(target),
        None => UrlResolution::NoMatch {
            path: display_path(&url),
        },
    })
}

/// Path as the user saw it: pathname plus the query string, so the
/// no-match report shows the whole link tail, not a stripped path.
fn display_path(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

/// Split a URL into the logical path and its key/value parameters,
/// unwrapping TestRail's `index.php?/...` indirection when present.
fn effective_path_and_params(url: &Url) -> (String, Vec<(String, String)>) {
    match url.query() {
        Some(query) if query.starts_with('/') => {
            // The whole logical path lives in the query string. The first
            // `&`-separated piece is the path, the rest are parameters.
            let mut pieces = query.split('&');
            let path = pieces.next().unwrap_or_default().to_string();
            let params = pieces
                .filter_map(|piece| {
                    piece
                        .split_once('=')
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                })
                .collect();
            (path, params)
        }
        _ => {
            let params = url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();
            (url.path().to_string(), params)
        }
    }
}

fn parse_id(segment: &str) -> Option<u64> {
    segment.parse().ok()
}

fn numeric_param(params: &[(String, String)], key: &str) -> Option<u64> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .and_then(|(_, v)| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(raw: &str) -> UrlTarget {
        match resolve(raw).expect("valid url") {
            UrlResolution::Target(t) => t,
            UrlResolution::NoMatch { path } => panic!("no match for {}", path),
        }
    }

    #[test]
    fn resolves_case_view() {
        assert_eq!(
            target("https://x.example.com/cases/view/1234"),
            UrlTarget::Case { case_id: 1234 }
        );
    }

    #[test]
    fn resolves_run_view() {
        assert_eq!(
            target("https://x.example.com/runs/view/88"),
            UrlTarget::Run { run_id: 88 }
        );
    }

    #[test]
    fn resolves_project_overview() {
        assert_eq!(
            target("https://x.example.com/projects/overview/3"),
            UrlTarget::Project { project_id: 3 }
        );
    }

    #[test]
    fn resolves_case_list_with_filters() {
        assert_eq!(
            target("https://x.example.com/cases/56?suite_id=7&section_id=9"),
            UrlTarget::CaseList {
                project_id: 56,
                suite_id: Some(7),
                section_id: Some(9),
            }
        );
    }

    #[test]
    fn resolves_case_list_without_filters() {
        assert_eq!(
            target("https://x.example.com/cases/56"),
            UrlTarget::CaseList {
                project_id: 56,
                suite_id: None,
                section_id: None,
            }
        );
    }

    #[test]
    fn resolves_run_list() {
        assert_eq!(
            target("https://x.example.com/runs/56"),
            UrlTarget::RunList { project_id: 56 }
        );
    }

    #[test]
    fn unwraps_index_php_indirection() {
        assert_eq!(
            target("https://x.example.com/index.php?/cases/view/1234"),
            UrlTarget::Case { case_id: 1234 }
        );
        assert_eq!(
            target("https://x.example.com/index.php?/cases/56&suite_id=7"),
            UrlTarget::CaseList {
                project_id: 56,
                suite_id: Some(7),
                section_id: None,
            }
        );
    }

    #[test]
    fn case_view_wins_over_case_list() {
        // "/cases/view/12" must resolve as a single-case view, not as a
        // case list for a project named "view".
        assert_eq!(
            target("https://x.example.com/cases/view/12"),
            UrlTarget::Case { case_id: 12 }
        );
    }

    #[test]
    fn non_numeric_ids_do_not_match() {
        let resolution = resolve("https://x.example.com/cases/view/abc").expect("valid url");
        assert!(matches!(resolution, UrlResolution::NoMatch { .. }));
    }

    #[test]
    fn unknown_path_reports_no_match() {
        match resolve("https://x.example.com/unknown/path").expect("valid url") {
            UrlResolution::NoMatch { path } => assert_eq!(path, "/unknown/path"),
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[test]
    fn no_match_report_keeps_the_query_string() {
        match resolve("https://x.example.com/unknown/path?x=1").expect("valid url") {
            UrlResolution::NoMatch { path } => assert_eq!(path, "/unknown/path?x=1"),
            other => panic!("unexpected resolution: {:?}", other),
        }
        match resolve("https://x.example.com/index.php?/unknown/path").expect("valid url") {
            UrlResolution::NoMatch { path } => assert_eq!(path, "/index.php?/unknown/path"),
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[test]
    fn malformed_input_is_a_distinct_error() {
        assert!(resolve("not a url").is_err());
    }
}
