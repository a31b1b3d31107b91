//! Field acceptability filter.
//!
//! Decides, for a given [`RequestContext`], which attributes of a resource
//! type may be submitted (creation, replacement) or requested back (query,
//! search). The rules only look at the attribute's [`Mutability`]:
//!
//! | Context | Rejected mutability |
//! |---------|---------------------|
//! | creation | read-only |
//! | replacement | read-only, immutable |
//! | query, search | write-only |
//!
//! Fields listed in [`RequestContext::required_fields`] are always
//! acceptable: a replacement must echo the resource `id` even though `id` is
//! read-only. Fields the descriptor does not declare carry no restriction.

use crate::schema::{Mutability, ResourceTypeDescriptor, ID};
use std::collections::BTreeSet;
use std::fmt;

/// The kind of protocol operation a payload is prepared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestContext {
    Creation,
    Replacement,
    Query,
    Search,
}

impl RequestContext {
    /// Fields the wire protocol requires in this context regardless of their
    /// mutability.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            RequestContext::Replacement => &[ID],
            _ => &[],
        }
    }

    fn rejects(self, mutability: Mutability) -> bool {
        match self {
            RequestContext::Creation => mutability == Mutability::ReadOnly,
            RequestContext::Replacement => {
                matches!(mutability, Mutability::ReadOnly | Mutability::Immutable)
            }
            RequestContext::Query | RequestContext::Search => mutability == Mutability::WriteOnly,
        }
    }
}

impl fmt::Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestContext::Creation => write!(f, "creation"),
            RequestContext::Replacement => write!(f, "replacement"),
            RequestContext::Query => write!(f, "query"),
            RequestContext::Search => write!(f, "search"),
        }
    }
}

/// Returns `false` when `field` must not appear in a `context` request for
/// resources described by `descriptor`.
///
/// # Examples
///
/// ```
/// use scim2_cli::acceptability::{is_acceptable, RequestContext};
/// use scim2_cli::schema::defaults;
///
/// let user = defaults::user();
/// assert!(!is_acceptable(RequestContext::Creation, &user, "id"));
/// assert!(is_acceptable(RequestContext::Replacement, &user, "id"));
/// assert!(!is_acceptable(RequestContext::Query, &user, "password"));
/// ```
pub fn is_acceptable(
    context: RequestContext,
    descriptor: &ResourceTypeDescriptor,
    field: &str,
) -> bool {
    let field = descriptor.normalize_path(field);
    if context.required_fields().contains(&field) {
        return true;
    }
    match descriptor.mutability(field) {
        Some(mutability) => !context.rejects(mutability),
        None => true,
    }
}

/// Every field of `descriptor` that [`is_acceptable`] rejects in `context`.
pub fn unacceptable_fields(
    context: RequestContext,
    descriptor: &ResourceTypeDescriptor,
) -> BTreeSet<String> {
    descriptor
        .fields
        .iter()
        .filter(|f| !is_acceptable(context, descriptor, &f.path))
        .map(|f| f.path.clone())
        .collect()
}
