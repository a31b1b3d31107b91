//! JSON formatters.
//!
//! Payloads are indented with four spaces, or printed on a single line when
//! indentation is turned off with `--no-indent`. Compliance results are
//! always indented.

use crate::compliance::CheckResult;
use serde::Serialize;
use serde_json::Value;

const INDENTATION: &[u8] = b"    ";

/// Formats a payload for display.
///
/// # Examples
///
/// ```
/// use scim2_cli::output::formatted_payload;
/// use serde_json::json;
///
/// let payload = json!({"id": "42"});
/// assert_eq!(formatted_payload(&payload, false), r#"{"id":"42"}"#);
/// assert_eq!(formatted_payload(&payload, true), "{\n    \"id\": \"42\"\n}");
/// ```
pub fn formatted_payload(payload: &Value, indent: bool) -> String {
    if !indent {
        return payload.to_string();
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENTATION);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    match payload.serialize(&mut serializer) {
        Ok(()) => String::from_utf8(buf).unwrap_or_else(|_| payload.to_string()),
        Err(_) => payload.to_string(),
    }
}

/// Serializes compliance check results as an indented JSON document.
pub fn format_results(base_url: &str, results: &[CheckResult]) -> String {
    let document = serde_json::json!({
        "url": base_url,
        "results": results,
    });
    let mut out = formatted_payload(&document, true);
    out.push('\n');
    out
}
