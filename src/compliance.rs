//! Server compliance checks for the `test` subcommand.
//!
//! [`check_server`] runs a fixed sequence of checks against a live server:
//!
//! 1. Each discovery endpoint (`/ServiceProviderConfig`, `/Schemas`,
//!    `/ResourceTypes`) answers with a valid document.
//! 2. Each registered resource type can be listed.
//! 3. Each resource type whose required attributes are all plain text goes
//!    through a create → query → replace → delete cycle, using generated
//!    values so the check leaves nothing behind.
//!
//! Checks never abort the run; every outcome becomes a [`CheckResult`].

use crate::acceptability::{is_acceptable, RequestContext};
use crate::client::{
    is_error_message, DiscoveryEndpoint, QueryTarget, ScimClient, Transport,
};
use crate::error::Error;
use crate::registry::ResourceRegistry;
use crate::schema::{AttributeType, ResourceTypeDescriptor, ID};
use crate::search::{SearchInput, SearchRequest};
use serde_json::{Map, Value};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Success,
    Error,
    Skipped,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => write!(f, "SUCCESS"),
            Status::Error => write!(f, "ERROR"),
            Status::Skipped => write!(f, "SKIPPED"),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct CheckResult {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub reason: Option<String>,
    pub data: Option<Value>,
}

impl CheckResult {
    fn success(title: String, description: &str, reason: Option<String>, data: Value) -> Self {
        CheckResult {
            title,
            description: description.to_string(),
            status: Status::Success,
            reason,
            data: Some(data),
        }
    }

    fn failure(title: String, description: &str, failure: Failure) -> Self {
        CheckResult {
            title,
            description: description.to_string(),
            status: Status::Error,
            reason: Some(failure.reason),
            data: failure.data,
        }
    }

    fn skipped(title: String, description: &str, reason: &str) -> Self {
        CheckResult {
            title,
            description: description.to_string(),
            status: Status::Skipped,
            reason: Some(reason.to_string()),
            data: None,
        }
    }
}

struct Failure {
    reason: String,
    data: Option<Value>,
}

/// Folds a client result and a returned SCIM Error message into one outcome.
fn outcome(result: crate::error::Result<Value>) -> Result<Value, Failure> {
    match result {
        Ok(value) if is_error_message(&value) => Err(Failure {
            reason: value
                .get("detail")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| "The server returned an error message".to_string()),
            data: Some(value),
        }),
        Ok(value) => Ok(value),
        Err(Error::ResponseValidation { message, payload }) => Err(Failure {
            reason: message,
            data: Some(payload),
        }),
        Err(e) => Err(Failure {
            reason: e.report(),
            data: None,
        }),
    }
}

/// Runs every check against the server behind `client`.
pub fn check_server<T: Transport>(
    client: &ScimClient<T>,
    registry: &ResourceRegistry,
) -> Vec<CheckResult> {
    let mut results = Vec::new();
    let no_search = SearchInput::Parameters(SearchRequest::default());

    for endpoint in DiscoveryEndpoint::ALL {
        let title = format!("Discover {}", endpoint.endpoint());
        let description = "The discovery endpoint returns a valid document";
        let result = outcome(client.query(QueryTarget::Discovery(endpoint), None, &no_search));
        results.push(match result {
            Ok(value) => {
                let reason = total_results(&value).map(|n| format!("{n} resources found"));
                CheckResult::success(title, description, reason, value)
            }
            Err(failure) => CheckResult::failure(title, description, failure),
        });
    }

    for descriptor in registry.descriptors() {
        results.push(check_listing(client, descriptor));
        results.extend(check_lifecycle(client, descriptor));
    }

    tracing::debug!(count = results.len(), "compliance checks finished");
    results
}

fn check_listing<T: Transport>(
    client: &ScimClient<T>,
    descriptor: &ResourceTypeDescriptor,
) -> CheckResult {
    let title = format!("List {} resources", descriptor.name);
    let description = "The resource endpoint returns a ListResponse";
    let search = SearchInput::Parameters(SearchRequest {
        count: Some(1),
        ..Default::default()
    });
    match outcome(client.query(QueryTarget::Resource(descriptor), None, &search)) {
        Ok(value) => {
            let reason = total_results(&value).map(|n| format!("{n} resources found"));
            CheckResult::success(title, description, reason, value)
        }
        Err(failure) => CheckResult::failure(title, description, failure),
    }
}

fn check_lifecycle<T: Transport>(
    client: &ScimClient<T>,
    descriptor: &ResourceTypeDescriptor,
) -> Vec<CheckResult> {
    let name = &descriptor.name;
    let titles = [
        format!("Create {name}"),
        format!("Query {name} by id"),
        format!("Replace {name}"),
        format!("Delete {name}"),
    ];
    let description = "The resource survives a create, query, replace and delete cycle";

    let payload = match generated_payload(descriptor, &unique_suffix()) {
        Ok(payload) => payload,
        Err(reason) => {
            return titles
                .into_iter()
                .map(|title| CheckResult::skipped(title, description, &reason))
                .collect();
        }
    };

    let mut results = Vec::new();
    let [create_title, query_title, replace_title, delete_title] = titles;

    let created = match outcome(client.create(descriptor, &payload)) {
        Ok(created) => created,
        Err(failure) => {
            results.push(CheckResult::failure(create_title, description, failure));
            for title in [query_title, replace_title, delete_title] {
                results.push(CheckResult::skipped(title, description, "Creation failed"));
            }
            return results;
        }
    };

    let Some(id) = created.get(ID).and_then(Value::as_str).map(str::to_string) else {
        results.push(CheckResult::failure(
            create_title,
            description,
            Failure {
                reason: "The created resource has no id".to_string(),
                data: Some(created),
            },
        ));
        for title in [query_title, replace_title, delete_title] {
            results.push(CheckResult::skipped(title, description, "Creation failed"));
        }
        return results;
    };
    results.push(CheckResult::success(
        create_title,
        description,
        Some(format!("Created with id {id}")),
        created.clone(),
    ));

    let no_search = SearchInput::Parameters(SearchRequest::default());
    results.push(
        match outcome(client.query(QueryTarget::Resource(descriptor), Some(&id), &no_search)) {
            Ok(value) => CheckResult::success(query_title, description, None, value),
            Err(failure) => CheckResult::failure(query_title, description, failure),
        },
    );

    let replacement = replacement_payload(descriptor, &created);
    results.push(match outcome(client.replace(descriptor, &replacement)) {
        Ok(value) => CheckResult::success(replace_title, description, None, value),
        Err(failure) => CheckResult::failure(replace_title, description, failure),
    });

    let deleted = client
        .delete(descriptor, &id)
        .map(|body| body.unwrap_or(Value::Null));
    results.push(match outcome(deleted) {
        Ok(value) => CheckResult::success(delete_title, description, None, value),
        Err(failure) => CheckResult::failure(delete_title, description, failure),
    });

    results
}

/// A creation payload filling every required attribute with a generated
/// value. Fails when a required attribute is not plain text.
pub fn generated_payload(descriptor: &ResourceTypeDescriptor, suffix: &str) -> Result<Value, String> {
    let mut object = Map::new();
    object.insert(
        "schemas".to_string(),
        Value::Array(vec![Value::String(descriptor.schema.clone())]),
    );

    for field in descriptor.fields.iter().filter(|f| {
        f.required && f.holds_value() && is_acceptable(RequestContext::Creation, descriptor, &f.path)
    }) {
        let textual = matches!(field.attr_type, AttributeType::String | AttributeType::Reference);
        if !textual || field.multi_valued || field.path.contains('.') {
            return Err(format!(
                "Required attribute '{}' cannot be generated",
                field.path
            ));
        }
        object.insert(
            field.path.clone(),
            Value::String(format!("scim2-cli-check-{suffix}")),
        );
    }

    if descriptor.field("externalId").is_some() {
        object.insert(
            "externalId".to_string(),
            Value::String(format!("scim2-cli-check-{suffix}")),
        );
    }
    Ok(Value::Object(object))
}

/// The created resource stripped of every attribute a replacement must not
/// carry.
fn replacement_payload(descriptor: &ResourceTypeDescriptor, created: &Value) -> Value {
    let Value::Object(map) = created else {
        return created.clone();
    };
    let kept = map
        .iter()
        .filter(|(key, _)| {
            key.as_str() == "schemas" || is_acceptable(RequestContext::Replacement, descriptor, key)
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Value::Object(kept)
}

fn total_results(value: &Value) -> Option<u64> {
    value.get("totalResults").and_then(Value::as_u64)
}

fn unique_suffix() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos().to_string())
        .unwrap_or_else(|_| std::process::id().to_string())
}
