//! Resource registry.
//!
//! Maps lowercase resource type names (`user`, `group`) to their
//! [`ResourceTypeDescriptor`]. Built once per invocation, read-only after.

use crate::error::{Error, Result};
use crate::schema::{self, ResourceTypeDescriptor};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    types: BTreeMap<String, ResourceTypeDescriptor>,
}

impl ResourceRegistry {
    pub fn new(descriptors: impl IntoIterator<Item = ResourceTypeDescriptor>) -> Self {
        let types = descriptors.into_iter().map(|d| (d.key(), d)).collect();
        ResourceRegistry { types }
    }

    /// The built-in `User` and `Group` resource types.
    pub fn with_defaults() -> Self {
        Self::new(schema::defaults::all())
    }

    /// Descriptors read from a user-supplied schema file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let descriptors = schema::load_file(path)?;
        tracing::debug!(
            path = %path.display(),
            count = descriptors.len(),
            "loaded resource types from schema file"
        );
        Ok(Self::new(descriptors))
    }

    /// Looks a resource type up by its case-insensitive name.
    pub fn get(&self, name: &str) -> Option<&ResourceTypeDescriptor> {
        self.types.get(&name.to_lowercase())
    }

    /// Like [`get`](Self::get), failing with
    /// [`Error::UnknownResourceType`] listing the registered names.
    pub fn resolve(&self, name: &str) -> Result<&ResourceTypeDescriptor> {
        self.get(name).ok_or_else(|| Error::UnknownResourceType {
            name: name.to_string(),
            available: self.names(),
        })
    }

    /// Finds the resource type whose core schema URN appears in `schemas`.
    pub fn by_schemas(&self, schemas: &[String]) -> Option<&ResourceTypeDescriptor> {
        self.types
            .values()
            .find(|d| schemas.iter().any(|s| s.eq_ignore_ascii_case(&d.schema)))
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.types.keys().cloned().collect()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ResourceTypeDescriptor> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
