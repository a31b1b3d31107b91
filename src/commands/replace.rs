use super::{resource_request, Invocation};
use crate::acceptability::RequestContext;
use crate::client::Transport;
use crate::error::Result;
use crate::output::formatted_payload;

/// `scim2 replace [RESOURCE [ATTRIBUTES]...]`
///
/// The payload must carry the `id` of the resource to replace, either in
/// the piped document or with `--id`.
pub fn run<T: Transport>(invocation: &Invocation<T>, args: &[String], indent: bool) -> Result<String> {
    let request = resource_request(invocation, RequestContext::Replacement, args, indent)?;
    let response = invocation.client.replace(request.descriptor, &request.payload)?;
    Ok(formatted_payload(&response, request.indent))
}
