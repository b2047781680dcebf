//! Prompt message rendering.
//!
//! Pure text builders so the wording and the pass-rate arithmetic stay
//! testable without a live server. The router fetches whatever records a
//! prompt needs and hands them here.

use crate::models::{Project, Run};

/// Body of the `test_case_template` prompt. Both arguments have already
/// been defaulted by the caller (`feature` is required upstream,
/// `priority` falls back to "Medium").
pub fn test_case_template(feature: &str, priority: &str) -> String {
    format!(
        "Create a comprehensive test case for the following feature: {feature}\n\
         \n\
         Priority: {priority}\n\
         \n\
         Please include:\n\
         1. Test Case Title\n\
         2. Description\n\
         3. Preconditions\n\
         4. Test Steps (numbered)\n\
         5. Expected Results\n\
         6. Post-conditions (if any)\n\
         \n\
         Format the test case in a clear, structured way that follows testing best practices."
    )
}

/// Body of the `test_run_summary` prompt, computed from the run's status
/// counters.
pub fn test_run_summary(project: &Project, run: &Run) -> String {
    let total = executed_total(run);
    format!(
        "Generate a comprehensive test run summary report for:\n\
         \n\
         Project: {}\n\
         Test Run: {}\n\
         Status: {}\n\
         \n\
         Test Results:\n\
         - Total Tests: {}\n\
         - Passed: {}\n\
         - Failed: {}\n\
         - Blocked: {}\n\
         - Untested: {}\n\
         - Retest: {}\n\
         - Pass Rate: {}%\n\
         \n\
         Please create a detailed summary report that includes:\n\
         1. Executive Summary\n\
         2. Test Execution Overview\n\
         3. Results Analysis\n\
         4. Key Findings\n\
         5. Recommendations\n\
         6. Next Steps\n\
         \n\
         Make the report professional and suitable for stakeholders.",
        project.name,
        run.name,
        if run.is_completed { "Completed" } else { "In Progress" },
        total,
        run.passed_count,
        run.failed_count,
        run.blocked_count,
        run.untested_count,
        run.retest_count,
        pass_rate(run.passed_count, total),
    )
}

/// Total tests in a run: the five standard status counters summed.
/// Custom statuses are not part of the reported total.
fn executed_total(run: &Run) -> u64 {
    run.passed_count + run.failed_count + run.blocked_count + run.untested_count + run.retest_count
}

/// Percentage of passed tests with one decimal place, or "0" for an
/// empty run (not "0.0", and never a division by zero).
fn pass_rate(passed: u64, total: u64) -> String {
    if total == 0 {
        "0".to_string()
    } else {
        format!("{:.1}", passed as f64 / total as f64 * 100.0)
    }
}
