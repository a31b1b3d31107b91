use super::{resource_request, Invocation};
use crate::acceptability::RequestContext;
use crate::client::Transport;
use crate::error::Result;
use crate::output::formatted_payload;

/// `scim2 create [RESOURCE [ATTRIBUTES]...]`
pub fn run<T: Transport>(invocation: &Invocation<T>, args: &[String], indent: bool) -> Result<String> {
    let request = resource_request(invocation, RequestContext::Creation, args, indent)?;
    let response = invocation.client.create(request.descriptor, &request.payload)?;
    Ok(formatted_payload(&response, request.indent))
}
