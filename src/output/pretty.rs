//! Human-readable colored text formatter for compliance check results.

use crate::compliance::{CheckResult, Status};
use colored::Colorize;
use serde_json::Value;

/// Formats compliance check results as ANSI-colored text.
///
/// Each check prints its status and title on one line. When the check has a
/// reason it follows, indented, and with `verbose` the data the check
/// inspected is printed below it.
pub fn format(base_url: &str, results: &[CheckResult], verbose: bool) -> String {
    let mut out = format!("Performing a SCIM compliance check on {base_url} ...\n");

    for result in results {
        let status = match result.status {
            Status::Success => result.status.to_string().green().to_string(),
            Status::Skipped => result.status.to_string().yellow().to_string(),
            Status::Error => result.status.to_string().red().to_string(),
        };
        out.push_str(&format!("{status} {}\n", result.title));

        if let Some(ref reason) = result.reason {
            out.push_str(&format!("  {reason}\n"));
            if verbose {
                match result.data {
                    None | Some(Value::Null) => {}
                    Some(Value::String(ref s)) => out.push_str(&format!("  {}\n", s.dimmed())),
                    Some(ref data) => out.push_str(&format!("  {}\n", data.to_string().dimmed())),
                }
            }
        }
    }

    let (passed, failed, skipped) = count_by_status(results);
    out.push_str(&format!(
        "Result: {} passed, {} failed, {} skipped\n",
        passed, failed, skipped
    ));
    out
}

/// Counts of successful, failed and skipped checks, in a single pass.
pub fn count_by_status(results: &[CheckResult]) -> (usize, usize, usize) {
    results
        .iter()
        .fold((0, 0, 0), |(p, f, s), r| match r.status {
            Status::Success => (p + 1, f, s),
            Status::Error => (p, f + 1, s),
            Status::Skipped => (p, f, s + 1),
        })
}
