//! Output formatting.
//!
//! | Output | Module | Use case |
//! |--------|--------|----------|
//! | SCIM response payloads | [`json`] | Scripting, piping into `jq` |
//! | Compliance results, [`Pretty`](OutputFormat::Pretty) | [`pretty`] | Terminal / human review |
//! | Compliance results, [`Json`](OutputFormat::Json) | [`json`] | Automation / CI |
//!
//! Use [`format_results`] to render compliance results in either format.

pub mod json;
pub mod pretty;

use crate::compliance::CheckResult;

pub use json::formatted_payload;

/// Supported output formats for compliance check results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored text.
    #[default]
    Pretty,
    /// Machine-readable JSON.
    Json,
}

/// Formats compliance check results in the requested [`OutputFormat`].
pub fn format_results(
    base_url: &str,
    results: &[CheckResult],
    format: OutputFormat,
    verbose: bool,
) -> String {
    match format {
        OutputFormat::Pretty => pretty::format(base_url, results, verbose),
        OutputFormat::Json => json::format_results(base_url, results),
    }
}
