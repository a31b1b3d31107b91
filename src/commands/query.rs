use super::{check_attributes, Invocation};
use crate::acceptability::RequestContext;
use crate::client::{QueryTarget, Transport};
use crate::error::Result;
use crate::output::formatted_payload;
use crate::search::{SearchInput, SearchRequest};

/// `scim2 query [RESOURCE] [ID]`
///
/// Without a resource type the server root is queried. A piped document
/// replaces the search flags and is sent as the query string unchecked.
pub fn run<T: Transport>(
    invocation: &Invocation<T>,
    resource: Option<&str>,
    id: Option<&str>,
    search: SearchRequest,
    indent: bool,
) -> Result<String> {
    let target = match resource {
        Some(name) => QueryTarget::resolve(&invocation.registry, name)?,
        None => QueryTarget::Root,
    };

    let input = match invocation.stdin {
        Some(ref raw) => SearchInput::Raw(raw.clone()),
        None => {
            if let QueryTarget::Resource(descriptor) = target {
                check_attributes(&search, RequestContext::Query, descriptor)?;
            }
            SearchInput::Parameters(search)
        }
    };

    let response = invocation.client.query(target, id, &input)?;
    Ok(formatted_payload(&response, indent))
}
