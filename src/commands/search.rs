use super::{check_attributes, Invocation};
use crate::acceptability::RequestContext;
use crate::client::Transport;
use crate::error::Result;
use crate::output::formatted_payload;
use crate::search::{SearchInput, SearchRequest};

/// `scim2 search`
///
/// Searches across every resource type, so requested attributes must be
/// returnable by all of them.
pub fn run<T: Transport>(invocation: &Invocation<T>, search: SearchRequest, indent: bool) -> Result<String> {
    let input = match invocation.stdin {
        Some(ref raw) => SearchInput::Raw(raw.clone()),
        None => {
            for descriptor in invocation.registry.descriptors() {
                check_attributes(&search, RequestContext::Search, descriptor)?;
            }
            SearchInput::Parameters(search)
        }
    };

    let response = invocation.client.search(&input)?;
    Ok(formatted_payload(&response, indent))
}
