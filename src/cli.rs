use clap::{Args, Parser, Subcommand};
use scim2_cli::output::OutputFormat;
use scim2_cli::search::{SearchRequest, SortOrder};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "scim2",
    version,
    about = "SCIM 2.0 command line client",
    long_about = "SCIM 2.0 command line client.\n\n\
        Resources are created, replaced, queried, searched and deleted on the \
        server given by --url. JSON piped to stdin is used as the request \
        payload and takes precedence over command line flags."
)]
pub struct Cli {
    /// Base URL of the SCIM server
    #[arg(long, env = "SCIM_CLI_URL", global = true)]
    pub url: Option<String>,

    /// Extra request header, as "Name: value" (repeatable)
    #[arg(long = "headers", short = 'H', value_name = "HEADER", global = true)]
    pub headers: Vec<String>,

    /// Custom config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON file with the schema documents of the server resource types
    #[arg(long, value_name = "FILE", global = true, conflicts_with = "discover")]
    pub schemas: Option<PathBuf>,

    /// Read resource types and schemas from the server discovery endpoints
    #[arg(long, global = true)]
    pub discover: bool,

    /// Log requests and responses to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a resource with a SCIM POST request
    #[command(after_help = "Run 'scim2 create <RESOURCE> --help' for the resource attributes.")]
    Create(ResourceArgs),

    /// Replace a resource with a SCIM PUT request
    #[command(after_help = "Run 'scim2 replace <RESOURCE> --help' for the resource attributes.")]
    Replace(ResourceArgs),

    /// Query resources with a SCIM GET request
    Query {
        /// Resource type, or one of schema, resourcetype, serviceproviderconfig
        resource: Option<String>,

        /// Resource id
        id: Option<String>,

        #[command(flatten)]
        search: SearchArgs,

        #[command(flatten)]
        indent: IndentArgs,
    },

    /// Search resources with a SCIM POST request on /.search
    Search {
        #[command(flatten)]
        search: SearchArgs,

        #[command(flatten)]
        indent: IndentArgs,
    },

    /// Delete a resource with a SCIM DELETE request
    Delete {
        /// Resource type
        resource: String,

        /// Resource id
        id: String,

        #[command(flatten)]
        indent: IndentArgs,
    },

    /// Check the server for SCIM compliance
    Test {
        /// Print the data inspected by each check
        #[arg(long, short)]
        verbose: bool,

        /// Output format
        #[arg(long, short, default_value = "pretty", value_enum)]
        format: OutputFormat,
    },
}

/// Resource type followed by its attribute flags. The attribute flags depend
/// on the resource type and are parsed by the resource command itself.
#[derive(Args)]
pub struct ResourceArgs {
    /// Indent JSON response payloads (default)
    #[arg(long, overrides_with = "no_indent")]
    pub indent: bool,

    /// Print JSON response payloads on a single line
    #[arg(long, overrides_with = "indent")]
    pub no_indent: bool,

    /// Resource type and its attribute flags
    #[arg(
        value_name = "RESOURCE [ATTRIBUTES]...",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub resource: Vec<String>,
}

#[derive(Args)]
pub struct IndentArgs {
    /// Indent JSON response payloads (default)
    #[arg(long, overrides_with = "no_indent")]
    pub indent: bool,

    /// Print JSON response payloads on a single line
    #[arg(long, overrides_with = "indent")]
    pub no_indent: bool,
}

impl IndentArgs {
    pub fn enabled(&self) -> bool {
        self.indent || !self.no_indent
    }
}

impl ResourceArgs {
    pub fn indent(&self) -> bool {
        self.indent || !self.no_indent
    }
}

#[derive(Args)]
pub struct SearchArgs {
    /// Attribute to return in the response (repeatable)
    #[arg(long = "attribute", value_name = "ATTRIBUTE")]
    pub attributes: Vec<String>,

    /// Attribute to remove from the default response attributes (repeatable)
    #[arg(long = "excluded-attribute", value_name = "ATTRIBUTE")]
    pub excluded_attributes: Vec<String>,

    /// 1-based index of the first result
    #[arg(long)]
    pub start_index: Option<u64>,

    /// Maximum number of results per page
    #[arg(long)]
    pub count: Option<u64>,

    /// Filter expression selecting a subset of resources
    #[arg(long)]
    pub filter: Option<String>,

    /// Attribute used to order the results
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Order in which --sort-by is applied
    #[arg(long, value_enum)]
    pub sort_order: Option<SortOrder>,
}

impl From<SearchArgs> for SearchRequest {
    fn from(args: SearchArgs) -> Self {
        SearchRequest {
            attributes: args.attributes,
            excluded_attributes: args.excluded_attributes,
            filter: args.filter,
            sort_by: args.sort_by,
            sort_order: args.sort_order,
            start_index: args.start_index,
            count: args.count,
        }
    }
}
