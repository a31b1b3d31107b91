//! SCIM search parameters (RFC 7644 §3.4.2 and §3.4.3).

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SEARCH_REQUEST_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:SearchRequest";
pub const LIST_RESPONSE_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:ListResponse";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }
}

/// Query parameters shared by `GET` queries and `POST /.search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_attributes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

impl SearchRequest {
    /// Query string pairs for a `GET` request. Multi-valued parameters are
    /// repeated once per value.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for a in &self.attributes {
            pairs.push(("attributes".to_string(), a.clone()));
        }
        for a in &self.excluded_attributes {
            pairs.push(("excludedAttributes".to_string(), a.clone()));
        }
        if let Some(ref filter) = self.filter {
            pairs.push(("filter".to_string(), filter.clone()));
        }
        if let Some(ref sort_by) = self.sort_by {
            pairs.push(("sortBy".to_string(), sort_by.clone()));
        }
        if let Some(order) = self.sort_order {
            pairs.push(("sortOrder".to_string(), order.as_str().to_string()));
        }
        if let Some(start) = self.start_index {
            pairs.push(("startIndex".to_string(), start.to_string()));
        }
        if let Some(count) = self.count {
            pairs.push(("count".to_string(), count.to_string()));
        }
        pairs
    }

    /// JSON body for `POST /.search`.
    pub fn to_body(&self) -> Value {
        let mut body = serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Default::default()));
        if let Value::Object(ref mut map) = body {
            map.insert(
                "schemas".to_string(),
                Value::Array(vec![Value::String(SEARCH_REQUEST_SCHEMA.to_string())]),
            );
        }
        body
    }
}

/// Search input: either parameters built from flags, or a raw JSON document
/// piped on stdin and sent as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchInput {
    Parameters(SearchRequest),
    Raw(Value),
}

impl SearchInput {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        match self {
            SearchInput::Parameters(request) => request.query_pairs(),
            SearchInput::Raw(value) => raw_query_pairs(value),
        }
    }

    pub fn to_body(&self) -> Value {
        match self {
            SearchInput::Parameters(request) => request.to_body(),
            SearchInput::Raw(value) => value.clone(),
        }
    }
}

/// Flattens a JSON object into query pairs; arrays repeat their key.
fn raw_query_pairs(value: &Value) -> Vec<(String, String)> {
    let Value::Object(map) = value else {
        return vec![];
    };
    let mut pairs = Vec::new();
    for (key, value) in map {
        match value {
            Value::Array(items) => {
                for item in items {
                    pairs.push((key.clone(), scalar_to_string(item)));
                }
            }
            Value::Null => {}
            other => pairs.push((key.clone(), scalar_to_string(other))),
        }
    }
    pairs
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
