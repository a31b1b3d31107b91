//! Error type shared by every layer of the client.
//!
//! Failures raised below the command layer are all variants of [`Error`].
//! At the command boundary they are rendered with [`Error::report`], which
//! appends the diagnostic annotations from [`Error::notes`] to the primary
//! message, one per line.

use crate::schema::Mutability;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown resource type '{name}'. Available values are: {}", available.join(", "))]
    UnknownResourceType {
        name: String,
        available: Vec<String>,
    },

    /// Neither piped input nor any field parameter was supplied.
    #[error("No input provided")]
    NoInput { help: String },

    /// Rejected resource flags, or `--help` on a resource command. Rendered
    /// by clap itself.
    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error("Resource must have an id")]
    MissingId,

    #[error("Cannot guess the resource type of the payload (schemas: {})", schemas.join(", "))]
    UnknownPayloadSchema { schemas: Vec<String> },

    #[error("Invalid JSON input.\n{0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Could not read input: {0}")]
    Input(#[source] std::io::Error),

    #[error("Invalid header '{0}', expected 'Name: value'")]
    InvalidHeader(String),

    #[error("Invalid value for '--{parameter}': {reason}")]
    InvalidParameter { parameter: String, reason: String },

    #[error("Attribute '{attribute}' cannot be requested for {resource_type} resources: it is {mutability}")]
    UnacceptableAttribute {
        attribute: String,
        resource_type: String,
        mutability: Mutability,
    },

    #[error("No server URL given, use --url, SCIM_CLI_URL or the config file")]
    MissingUrl,

    #[error("{0}")]
    Config(String),

    #[error("Invalid schema document: {0}")]
    Schema(String),

    #[error("Unexpected response status code: {status}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Server responded with status code {status}")]
    ErrorStatus { status: u16, body: String },

    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("{message}")]
    ResponseValidation { message: String, payload: Value },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Diagnostic annotations attached to this error, in the order they
    /// should be displayed after the primary message.
    pub fn notes(&self) -> Vec<String> {
        match self {
            Error::Transport(e) => {
                let mut notes = Vec::new();
                let mut source = std::error::Error::source(e);
                while let Some(cause) = source {
                    notes.push(cause.to_string());
                    source = cause.source();
                }
                notes
            }
            Error::UnexpectedStatus { body, .. } | Error::ErrorStatus { body, .. }
                if !body.trim().is_empty() =>
            {
                vec![body.trim().to_string()]
            }
            Error::ResponseValidation { payload, .. } => {
                vec![payload.to_string()]
            }
            _ => vec![],
        }
    }

    /// Renders the user-facing message: the primary message followed by each
    /// note on its own line.
    pub fn report(&self) -> String {
        let mut out = self.to_string();
        for note in self.notes() {
            out.push('\n');
            out.push_str(&note);
        }
        out
    }
}
