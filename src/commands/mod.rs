//! Subcommand handlers.
//!
//! Each handler receives the [`Invocation`] built once in `main` and returns
//! the text to print on stdout. Failures bubble up as [`Error`] and are
//! rendered by the caller.

pub mod create;
pub mod delete;
pub mod query;
pub mod replace;
pub mod search;

use crate::acceptability::{is_acceptable, RequestContext};
use crate::client::{descriptor_for_payload, ScimClient, Transport};
use crate::error::{Error, Result};
use crate::factory::{build_command, indent_choice};
use crate::registry::ResourceRegistry;
use crate::schema::ResourceTypeDescriptor;
use crate::search::SearchRequest;
use serde_json::Value;

/// Everything a handler needs, assembled before dispatch and never mutated.
pub struct Invocation<T> {
    pub registry: ResourceRegistry,
    pub client: ScimClient<T>,
    /// JSON document piped on stdin, if any.
    pub stdin: Option<Value>,
}

impl<T: Transport> Invocation<T> {
    pub fn new(registry: ResourceRegistry, client: ScimClient<T>, stdin: Option<Value>) -> Self {
        Invocation {
            registry,
            client,
            stdin,
        }
    }
}

/// Parses piped input. Blank input counts as no input.
///
/// # Examples
///
/// ```
/// use scim2_cli::commands::parse_input;
///
/// assert_eq!(parse_input("  \n").unwrap(), None);
/// assert!(parse_input(r#"{"userName": "bjensen"}"#).unwrap().is_some());
/// assert!(parse_input("{not json").is_err());
/// ```
pub fn parse_input(raw: &str) -> Result<Option<Value>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(raw).map(Some).map_err(Error::InvalidJson)
}

/// A write request ready to be sent.
struct ResourceRequest<'a> {
    descriptor: &'a ResourceTypeDescriptor,
    payload: Value,
    indent: bool,
}

/// Resolves the resource type and payload of a `create` or `replace`.
///
/// `args` is the resource name followed by its attribute flags. Piped input
/// takes precedence over the flags. Without a resource name the type is
/// guessed from the `schemas` of the piped payload.
fn resource_request<'a, T: Transport>(
    invocation: &'a Invocation<T>,
    context: RequestContext,
    args: &[String],
    indent: bool,
) -> Result<ResourceRequest<'a>> {
    let Some(name) = args.first() else {
        return match invocation.stdin {
            Some(ref payload) => Ok(ResourceRequest {
                descriptor: descriptor_for_payload(&invocation.registry, payload)?,
                payload: payload.clone(),
                indent,
            }),
            None => Err(Error::NoInput {
                help: String::new(),
            }),
        };
    };

    let descriptor = invocation.registry.resolve(name)?;
    let spec = build_command(descriptor, context);
    let matches = spec.parse(args)?;
    let indent = indent_choice(&matches).unwrap_or(indent);

    let payload = match invocation.stdin {
        Some(ref payload) => payload.clone(),
        None => spec.payload(&matches)?.ok_or_else(|| Error::NoInput { help: spec.help() })?,
    };

    tracing::debug!(
        resource_type = %descriptor.name,
        %context,
        "resource payload assembled"
    );
    Ok(ResourceRequest {
        descriptor,
        payload,
        indent,
    })
}

/// Fails on the first requested or excluded attribute that `descriptor`
/// does not return in `context`.
fn check_attributes(
    request: &SearchRequest,
    context: RequestContext,
    descriptor: &ResourceTypeDescriptor,
) -> Result<()> {
    for attribute in request.attributes.iter().chain(&request.excluded_attributes) {
        if is_acceptable(context, descriptor, attribute) {
            continue;
        }
        // Rejection implies a declared mutability.
        if let Some(mutability) = descriptor.mutability(descriptor.normalize_path(attribute)) {
            return Err(Error::UnacceptableAttribute {
                attribute: attribute.clone(),
                resource_type: descriptor.name.clone(),
                mutability,
            });
        }
    }
    Ok(())
}
