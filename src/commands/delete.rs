use super::Invocation;
use crate::client::Transport;
use crate::error::Result;
use crate::output::formatted_payload;

/// `scim2 delete RESOURCE ID`
///
/// Returns the response body when the server sent one, typically a SCIM
/// Error message.
pub fn run<T: Transport>(
    invocation: &Invocation<T>,
    resource: &str,
    id: &str,
    indent: bool,
) -> Result<Option<String>> {
    let descriptor = invocation.registry.resolve(resource)?;
    let response = invocation.client.delete(descriptor, id)?;
    Ok(response.map(|body| formatted_payload(&body, indent)))
}
