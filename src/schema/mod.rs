//! Resource type descriptors.
//!
//! A [`ResourceTypeDescriptor`] is the in-memory form of a SCIM resource
//! type: its endpoint, its core schema URN and a flat, ordered list of
//! [`FieldDescriptor`]s. Descriptors come from three places:
//!
//! - the built-in [`defaults`] for `User` and `Group`;
//! - a schema document returned by a server's `/Schemas` endpoint, see
//!   [`ResourceTypeDescriptor::from_schema_document`];
//! - a user-supplied JSON file holding such documents, see [`load_file`].
//!
//! # Flattening
//!
//! Single-valued complex attributes are expanded into their sub-attributes
//! (`name` becomes `name.givenName`, `name.familyName`, ...). Multi-valued
//! attributes stay a single field whose value is a list; their
//! sub-attributes are still recorded so that mutability lookups on paths like
//! `members.type` resolve.

pub mod defaults;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Schema URN of SCIM schema documents.
pub const SCHEMA_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:Schema";
/// Schema URN of SCIM resource type documents.
pub const RESOURCE_TYPE_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:ResourceType";
/// Schema URN of the service provider configuration document.
pub const SERVICE_PROVIDER_CONFIG_SCHEMA: &str =
    "urn:ietf:params:scim:schemas:core:2.0:ServiceProviderConfig";

/// Name of the identifier attribute common to every resource.
pub const ID: &str = "id";

/// Per-attribute write/read restriction (RFC 7643 §2.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mutability {
    ReadOnly,
    WriteOnly,
    ReadWrite,
    Immutable,
}

impl fmt::Display for Mutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutability::ReadOnly => write!(f, "readOnly"),
            Mutability::WriteOnly => write!(f, "writeOnly"),
            Mutability::ReadWrite => write!(f, "readWrite"),
            Mutability::Immutable => write!(f, "immutable"),
        }
    }
}

/// SCIM attribute data types (RFC 7643 §2.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeType {
    String,
    Boolean,
    Decimal,
    Integer,
    DateTime,
    Binary,
    Reference,
    Complex,
}

/// One attribute path of a resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Dotted attribute path, e.g. `userName` or `name.givenName`.
    pub path: String,
    pub attr_type: AttributeType,
    /// `None` when the schema source declares no mutability.
    pub mutability: Option<Mutability>,
    pub multi_valued: bool,
    pub required: bool,
    pub description: Option<String>,
    /// Set for sub-attributes of a multi-valued complex attribute.
    pub within_multi_valued: bool,
}

impl FieldDescriptor {
    pub fn new(path: &str, attr_type: AttributeType, mutability: Mutability) -> Self {
        FieldDescriptor {
            path: path.to_string(),
            attr_type,
            mutability: Some(mutability),
            multi_valued: false,
            required: false,
            description: None,
            within_multi_valued: false,
        }
    }

    pub fn multi_valued(mut self) -> Self {
        self.multi_valued = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Returns `true` when the field carries a value of its own and can
    /// therefore become a command-line parameter.
    ///
    /// Single-valued complex parents are represented by their flattened
    /// sub-attributes and sub-attributes of multi-valued attributes travel
    /// inside their parent's list, so neither is a value holder.
    pub fn holds_value(&self) -> bool {
        if self.within_multi_valued {
            return false;
        }
        self.multi_valued || self.attr_type != AttributeType::Complex
    }
}

/// In-memory representation of one SCIM resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTypeDescriptor {
    /// Resource type name, e.g. `User`.
    pub name: String,
    /// Endpoint relative to the server base URL, e.g. `/Users`.
    pub endpoint: String,
    /// Core schema URN.
    pub schema: String,
    pub fields: Vec<FieldDescriptor>,
}

impl ResourceTypeDescriptor {
    /// Lowercase registry key.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }

    pub fn field(&self, path: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.path == path)
    }

    /// Mutability of `path`, or `None` for undeclared fields.
    pub fn mutability(&self, path: &str) -> Option<Mutability> {
        self.field(path).and_then(|f| f.mutability)
    }

    /// Strips this resource type's schema URN from a fully qualified
    /// attribute path (`urn:...:User:userName` → `userName`).
    pub fn normalize_path<'a>(&self, path: &'a str) -> &'a str {
        path.strip_prefix(self.schema.as_str())
            .and_then(|rest| rest.strip_prefix(':'))
            .unwrap_or(path)
    }

    /// Builds a descriptor from a schema document (RFC 7643 §7).
    ///
    /// `resource_type` supplies the name and endpoint when the schema comes
    /// with a resource type document; otherwise the schema's `name` is used
    /// and the endpoint defaults to `/<name>s`. The common attributes `id`,
    /// `externalId` and `meta` are prepended since servers do not list them.
    pub fn from_schema_document(
        schema: &SchemaDocument,
        resource_type: Option<&ResourceTypeDocument>,
    ) -> Result<Self> {
        let name = resource_type
            .map(|rt| rt.name.clone())
            .or_else(|| schema.name.clone())
            .ok_or_else(|| Error::Schema(format!("schema '{}' has no name", schema.id)))?;
        let endpoint = resource_type
            .map(|rt| rt.endpoint.clone())
            .unwrap_or_else(|| format!("/{name}s"));

        let mut fields = common_fields();
        for attribute in &schema.attributes {
            if fields.iter().any(|f| f.path == attribute.name) {
                continue;
            }
            flatten(attribute, None, false, &mut fields);
        }

        Ok(ResourceTypeDescriptor {
            name,
            endpoint: normalize_endpoint(&endpoint),
            schema: schema.id.clone(),
            fields,
        })
    }
}

fn normalize_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// `id`, `externalId` and `meta` (RFC 7643 §3.1).
pub(crate) fn common_fields() -> Vec<FieldDescriptor> {
    let meta = |sub: &str, attr_type| {
        FieldDescriptor::new(&format!("meta.{sub}"), attr_type, Mutability::ReadOnly)
    };
    vec![
        FieldDescriptor::new(ID, AttributeType::String, Mutability::ReadOnly)
            .describe("Unique identifier for the resource, assigned by the service provider."),
        FieldDescriptor::new("externalId", AttributeType::String, Mutability::ReadWrite)
            .describe("Identifier of the resource as defined by the provisioning client."),
        FieldDescriptor::new("meta", AttributeType::Complex, Mutability::ReadOnly),
        meta("resourceType", AttributeType::String),
        meta("created", AttributeType::DateTime),
        meta("lastModified", AttributeType::DateTime),
        meta("location", AttributeType::Reference),
        meta("version", AttributeType::String),
    ]
}

fn flatten(
    attribute: &AttributeDocument,
    parent: Option<(&str, Option<Mutability>)>,
    within_multi_valued: bool,
    out: &mut Vec<FieldDescriptor>,
) {
    let (path, mutability) = match parent {
        Some((parent_path, parent_mutability)) => (
            format!("{parent_path}.{}", attribute.name),
            attribute.mutability.or(parent_mutability),
        ),
        None => (attribute.name.clone(), attribute.mutability),
    };

    out.push(FieldDescriptor {
        path: path.clone(),
        attr_type: attribute.attr_type,
        mutability,
        multi_valued: attribute.multi_valued,
        required: attribute.required,
        description: attribute.description.clone(),
        within_multi_valued,
    });

    let nested_in_list = within_multi_valued || attribute.multi_valued;
    for sub in &attribute.sub_attributes {
        flatten(sub, Some((&path, mutability)), nested_in_list, out);
    }
}

/// A SCIM schema document (RFC 7643 §7).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeDocument>,
}

/// An attribute definition inside a [`SchemaDocument`].
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDocument {
    pub name: String,
    #[serde(rename = "type", default = "default_attr_type")]
    pub attr_type: AttributeType,
    #[serde(default)]
    pub multi_valued: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub mutability: Option<Mutability>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sub_attributes: Vec<AttributeDocument>,
}

fn default_attr_type() -> AttributeType {
    AttributeType::String
}

/// A SCIM resource type document (RFC 7643 §6).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTypeDocument {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub endpoint: String,
    pub schema: String,
}

/// Loads descriptors from a user-supplied JSON file.
///
/// The file holds either a single schema document, an array of them, or a
/// ListResponse whose `Resources` are schema documents. Schemas without a
/// `name` are rejected since the name is the subcommand users type.
pub fn load_file(path: &Path) -> Result<Vec<ResourceTypeDescriptor>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read schema file {}: {}", path.display(), e)))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| Error::Schema(format!("{}: {}", path.display(), e)))?;
    parse_schema_documents(value)?
        .iter()
        .map(|schema| ResourceTypeDescriptor::from_schema_document(schema, None))
        .collect()
}

/// Accepts a single schema document, an array, or a ListResponse of them.
pub fn parse_schema_documents(value: serde_json::Value) -> Result<Vec<SchemaDocument>> {
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) if map.contains_key("Resources") => {
            match map.remove("Resources") {
                Some(serde_json::Value::Array(items)) => items,
                _ => return Err(Error::Schema("'Resources' must be an array".to_string())),
            }
        }
        other => vec![other],
    };

    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(|e| Error::Schema(e.to_string())))
        .collect()
}
