//! SCIM client.
//!
//! [`ScimClient`] turns SCIM operations into HTTP exchanges over a
//! [`Transport`], checks the response status against the codes RFC 7644
//! allows for the operation, and validates the response document against the
//! expected schema.
//!
//! A SCIM Error message returned with an allowed error status is handed back
//! as the operation's output rather than raised, so that the caller can print
//! the server's diagnostic as-is.

pub mod http;

use crate::error::{Error, Result};
use crate::registry::ResourceRegistry;
use crate::schema::{
    ResourceTypeDescriptor, ResourceTypeDocument, SchemaDocument, ID, RESOURCE_TYPE_SCHEMA,
    SCHEMA_SCHEMA, SERVICE_PROVIDER_CONFIG_SCHEMA,
};
use crate::search::{SearchInput, LIST_RESPONSE_SCHEMA};
use serde_json::Value;
use std::fmt;

pub use http::HttpTransport;

pub const ERROR_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:Error";

const CREATION_STATUS: &[u16] = &[201, 307, 308, 400, 401, 403, 409, 500, 501];
const QUERY_STATUS: &[u16] = &[200, 307, 308, 400, 401, 403, 404, 500, 501];
const REPLACEMENT_STATUS: &[u16] = &[200, 307, 308, 400, 401, 403, 404, 409, 412, 500, 501];
const SEARCH_STATUS: &[u16] = &[200, 307, 308, 400, 401, 403, 404, 409, 413, 500, 501];
const DELETION_STATUS: &[u16] = &[204, 307, 308, 400, 401, 403, 404, 412, 500, 501];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// An HTTP request relative to the server base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Path segments appended to the base URL, unescaped.
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    fn new(method: Method, endpoint: &str) -> Self {
        HttpRequest {
            method,
            segments: endpoint
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            query: vec![],
            body: None,
        }
    }

    fn segment(mut self, segment: &str) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    /// `/`-joined path, for logs and tests.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Sends SCIM HTTP requests. Implemented by [`HttpTransport`] for real
/// servers; tests substitute an in-memory fake.
pub trait Transport {
    /// Base URL requests are resolved against.
    fn base_url(&self) -> &str;

    fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Discovery endpoints that are not resource types but can be queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryEndpoint {
    Schemas,
    ResourceTypes,
    ServiceProviderConfig,
}

impl DiscoveryEndpoint {
    pub const ALL: [DiscoveryEndpoint; 3] = [
        DiscoveryEndpoint::Schemas,
        DiscoveryEndpoint::ResourceTypes,
        DiscoveryEndpoint::ServiceProviderConfig,
    ];

    /// Lowercase name accepted by `query`.
    pub fn key(self) -> &'static str {
        match self {
            DiscoveryEndpoint::Schemas => "schema",
            DiscoveryEndpoint::ResourceTypes => "resourcetype",
            DiscoveryEndpoint::ServiceProviderConfig => "serviceproviderconfig",
        }
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            DiscoveryEndpoint::Schemas => "/Schemas",
            DiscoveryEndpoint::ResourceTypes => "/ResourceTypes",
            DiscoveryEndpoint::ServiceProviderConfig => "/ServiceProviderConfig",
        }
    }

    fn expected(self) -> Expected<'static> {
        match self {
            DiscoveryEndpoint::Schemas => Expected::Resource("Schema", SCHEMA_SCHEMA),
            DiscoveryEndpoint::ResourceTypes => Expected::Resource("ResourceType", RESOURCE_TYPE_SCHEMA),
            DiscoveryEndpoint::ServiceProviderConfig => {
                Expected::Resource("ServiceProviderConfig", SERVICE_PROVIDER_CONFIG_SCHEMA)
            }
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.key().eq_ignore_ascii_case(key))
    }
}

/// What a query is aimed at.
#[derive(Debug, Clone, Copy)]
pub enum QueryTarget<'a> {
    /// The server root, listing resources of every type.
    Root,
    Resource(&'a ResourceTypeDescriptor),
    Discovery(DiscoveryEndpoint),
}

impl<'a> QueryTarget<'a> {
    /// Resolves a `query` argument against the registry and the discovery
    /// endpoints.
    pub fn resolve(registry: &'a ResourceRegistry, name: &str) -> Result<Self> {
        if let Some(descriptor) = registry.get(name) {
            return Ok(QueryTarget::Resource(descriptor));
        }
        if let Some(endpoint) = DiscoveryEndpoint::from_key(name) {
            return Ok(QueryTarget::Discovery(endpoint));
        }
        let mut available = registry.names();
        available.extend(DiscoveryEndpoint::ALL.iter().map(|e| e.key().to_string()));
        Err(Error::UnknownResourceType {
            name: name.to_string(),
            available,
        })
    }
}

/// Expected shape of a successful response body.
#[derive(Debug, Clone, Copy)]
enum Expected<'a> {
    /// A resource listing `schema` in its `schemas`, named for messages.
    Resource(&'a str, &'a str),
    List,
    /// Any body, or none.
    Nothing,
}

pub struct ScimClient<T> {
    transport: T,
}

impl<T: Transport> ScimClient<T> {
    pub fn new(transport: T) -> Self {
        ScimClient { transport }
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `POST <endpoint>` with `payload`.
    pub fn create(&self, descriptor: &ResourceTypeDescriptor, payload: &Value) -> Result<Value> {
        let mut request = HttpRequest::new(Method::Post, &descriptor.endpoint);
        request.body = Some(payload.clone());
        let response = self.transport.send(request)?;
        self.check(response, CREATION_STATUS, expect_resource(descriptor))
            .map(Option::unwrap_or_default)
    }

    /// `PUT <endpoint>/<id>` with `payload`. The payload must carry an `id`.
    pub fn replace(&self, descriptor: &ResourceTypeDescriptor, payload: &Value) -> Result<Value> {
        let id = payload
            .get(ID)
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or(Error::MissingId)?;

        let mut request = HttpRequest::new(Method::Put, &descriptor.endpoint).segment(id);
        request.body = Some(payload.clone());
        let response = self.transport.send(request)?;
        self.check(response, REPLACEMENT_STATUS, expect_resource(descriptor))
            .map(Option::unwrap_or_default)
    }

    /// `GET` on the server root, a resource endpoint, or a single resource.
    pub fn query(&self, target: QueryTarget<'_>, id: Option<&str>, search: &SearchInput) -> Result<Value> {
        let (request, expected) = match (target, id) {
            (QueryTarget::Root, _) => (HttpRequest::new(Method::Get, "/"), Expected::List),
            (QueryTarget::Resource(d), None) => (HttpRequest::new(Method::Get, &d.endpoint), Expected::List),
            (QueryTarget::Resource(d), Some(id)) => (
                HttpRequest::new(Method::Get, &d.endpoint).segment(id),
                expect_resource(d),
            ),
            (QueryTarget::Discovery(DiscoveryEndpoint::ServiceProviderConfig), _) => (
                HttpRequest::new(Method::Get, DiscoveryEndpoint::ServiceProviderConfig.endpoint()),
                DiscoveryEndpoint::ServiceProviderConfig.expected(),
            ),
            (QueryTarget::Discovery(e), None) => (HttpRequest::new(Method::Get, e.endpoint()), Expected::List),
            (QueryTarget::Discovery(e), Some(id)) => {
                (HttpRequest::new(Method::Get, e.endpoint()).segment(id), e.expected())
            }
        };

        let mut request = request;
        request.query = search.query_pairs();
        let response = self.transport.send(request)?;
        self.check(response, QUERY_STATUS, expected)
            .map(Option::unwrap_or_default)
    }

    /// `POST /.search` with a SearchRequest body.
    pub fn search(&self, search: &SearchInput) -> Result<Value> {
        let mut request = HttpRequest::new(Method::Post, "/.search");
        request.body = Some(search.to_body());
        let response = self.transport.send(request)?;
        self.check(response, SEARCH_STATUS, Expected::List)
            .map(Option::unwrap_or_default)
    }

    /// `DELETE <endpoint>/<id>`. Returns the response body, if any.
    pub fn delete(&self, descriptor: &ResourceTypeDescriptor, id: &str) -> Result<Option<Value>> {
        let request = HttpRequest::new(Method::Delete, &descriptor.endpoint).segment(id);
        let response = self.transport.send(request)?;
        self.check(response, DELETION_STATUS, Expected::Nothing)
    }

    /// Builds a registry from the server's `/ResourceTypes` and `/Schemas`.
    ///
    /// Resource types whose schema the server does not publish are skipped.
    pub fn discover(&self) -> Result<ResourceRegistry> {
        let resource_types: Vec<ResourceTypeDocument> = self
            .list_resources(DiscoveryEndpoint::ResourceTypes)?
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(|e| Error::Schema(e.to_string())))
            .collect::<Result<_>>()?;
        let schemas: Vec<SchemaDocument> = self
            .list_resources(DiscoveryEndpoint::Schemas)?
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(|e| Error::Schema(e.to_string())))
            .collect::<Result<_>>()?;

        let mut descriptors = Vec::new();
        for resource_type in &resource_types {
            match schemas.iter().find(|s| s.id == resource_type.schema) {
                Some(schema) => descriptors.push(ResourceTypeDescriptor::from_schema_document(
                    schema,
                    Some(resource_type),
                )?),
                None => tracing::warn!(
                    resource_type = %resource_type.name,
                    schema = %resource_type.schema,
                    "server publishes no schema for resource type, skipping"
                ),
            }
        }

        tracing::debug!(count = descriptors.len(), "discovered resource types");
        Ok(ResourceRegistry::new(descriptors))
    }

    fn list_resources(&self, endpoint: DiscoveryEndpoint) -> Result<Vec<Value>> {
        let list = self.query(
            QueryTarget::Discovery(endpoint),
            None,
            &SearchInput::Parameters(Default::default()),
        )?;
        if is_error_message(&list) {
            return Err(Error::ResponseValidation {
                message: format!("Discovery of {} failed", endpoint.endpoint()),
                payload: list,
            });
        }
        match list.get("Resources") {
            Some(Value::Array(items)) => Ok(items.clone()),
            None => Ok(vec![]),
            Some(_) => Err(Error::ResponseValidation {
                message: "'Resources' is not an array".to_string(),
                payload: list,
            }),
        }
    }

    fn check(&self, response: HttpResponse, allowed: &[u16], expected: Expected<'_>) -> Result<Option<Value>> {
        let HttpResponse { status, body } = response;
        if !allowed.contains(&status) {
            return Err(Error::UnexpectedStatus { status, body });
        }

        if body.trim().is_empty() {
            return match expected {
                Expected::Nothing if status < 400 => Ok(None),
                _ if status >= 400 => Err(Error::ErrorStatus { status, body }),
                Expected::Resource(name, _) => Err(Error::ResponseValidation {
                    message: format!("Expected type {name} but got an empty response"),
                    payload: Value::Null,
                }),
                _ => Err(Error::ResponseValidation {
                    message: "Expected a ListResponse but got an empty response".to_string(),
                    payload: Value::Null,
                }),
            };
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| Error::ResponseValidation {
            message: format!("Response is not valid JSON: {e}"),
            payload: Value::String(body.clone()),
        })?;

        if is_error_message(&value) {
            return Ok(Some(value));
        }
        if status >= 400 {
            return Err(Error::ErrorStatus { status, body });
        }

        match expected {
            Expected::Resource(name, schema) => validate_schemas(&value, name, schema)?,
            Expected::List => validate_schemas(&value, "ListResponse", LIST_RESPONSE_SCHEMA)?,
            Expected::Nothing => {}
        }
        Ok(Some(value))
    }
}

fn expect_resource(descriptor: &ResourceTypeDescriptor) -> Expected<'_> {
    Expected::Resource(&descriptor.name, &descriptor.schema)
}

/// `schemas` of a SCIM document, empty when absent or malformed.
pub fn schemas_of(value: &Value) -> Vec<String> {
    value
        .get("schemas")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Returns `true` for a SCIM Error message (RFC 7644 §3.12).
pub fn is_error_message(value: &Value) -> bool {
    schemas_of(value).iter().any(|s| s == ERROR_SCHEMA)
}

fn validate_schemas(value: &Value, name: &str, schema: &str) -> Result<()> {
    let schemas = schemas_of(value);
    if schemas.iter().any(|s| s.eq_ignore_ascii_case(schema)) {
        return Ok(());
    }
    let got = if schemas.is_empty() {
        "undefined object with no schema".to_string()
    } else {
        schemas.join(", ")
    };
    Err(Error::ResponseValidation {
        message: format!("Expected type {name} but got {got}"),
        payload: value.clone(),
    })
}

/// Resolves the descriptor for a payload from its `schemas` attribute.
pub fn descriptor_for_payload<'a>(
    registry: &'a ResourceRegistry,
    payload: &Value,
) -> Result<&'a ResourceTypeDescriptor> {
    let schemas = schemas_of(payload);
    registry
        .by_schemas(&schemas)
        .ok_or(Error::UnknownPayloadSchema { schemas })
}
