//! # scim2-cli
//!
//! Command line client for SCIM 2.0 servers (RFC 7643, RFC 7644).
//!
//! Resources are created, replaced, queried, searched and deleted from the
//! command line, with one `--flag` per resource attribute derived from the
//! resource type's schema. A built-in checker reports on the server's SCIM
//! compliance.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use scim2_cli::acceptability::RequestContext;
//! use scim2_cli::client::{HttpTransport, ScimClient};
//! use scim2_cli::factory::build_command;
//! use scim2_cli::registry::ResourceRegistry;
//! use std::time::Duration;
//!
//! let registry = ResourceRegistry::with_defaults();
//! let user = registry.resolve("user")?;
//! let spec = build_command(user, RequestContext::Creation);
//! let matches = spec.parse(["user", "--user-name", "bjensen"])?;
//!
//! let transport = HttpTransport::new("https://scim.example.com/v2", &[], Duration::from_secs(10))?;
//! let client = ScimClient::new(transport);
//! if let Some(payload) = spec.payload(&matches)? {
//!     let created = client.create(user, &payload)?;
//!     println!("{created}");
//! }
//! # Ok::<(), scim2_cli::error::Error>(())
//! ```
//!
//! ## Architecture
//!
//! 1. **[`schema`]**: resource type descriptors, built in or read from SCIM
//!    schema documents.
//! 2. **[`registry`]**: resource types by lowercase name.
//! 3. **[`acceptability`]**: which attributes a request context accepts.
//! 4. **[`factory`]**: one command per resource type, one flag per
//!    acceptable attribute.
//! 5. **[`client`]**: SCIM operations over a pluggable
//!    [`Transport`](client::Transport) with status and response checks.
//! 6. **[`commands`]**: the subcommand handlers.
//! 7. **[`compliance`]**: server compliance checks.
//! 8. **[`output`]**: payload and check result formatting.

pub mod acceptability;
pub mod client;
pub mod commands;
pub mod compliance;
pub mod config;
pub mod error;
pub mod factory;
pub mod output;
pub mod registry;
pub mod schema;
pub mod search;
