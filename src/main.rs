mod cli;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use scim2_cli::client::http::{parse_header, HttpTransport};
use scim2_cli::client::ScimClient;
use scim2_cli::commands::{self, Invocation};
use scim2_cli::config::Config;
use scim2_cli::error::{Error, Result};
use scim2_cli::registry::ResourceRegistry;
use std::io::{IsTerminal, Read};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "SCIM2_CLI_LOG";

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let verb = match cli.command {
        Commands::Create(_) => "create",
        Commands::Replace(_) => "replace",
        Commands::Query { .. } => "query",
        Commands::Search { .. } => "search",
        Commands::Delete { .. } => "delete",
        Commands::Test { .. } => "test",
    };

    match run(cli) {
        Ok(Some(output)) => println!("{output}"),
        Ok(None) => {}
        Err(Error::Usage(e)) => e.exit(),
        Err(Error::NoInput { help }) => {
            let help = if help.is_empty() {
                subcommand_help(verb)
            } else {
                help
            };
            print!("{help}");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e.report());
            std::process::exit(1);
        }
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<Option<String>> {
    let config = Config::load(cli.config.as_deref()).map_err(Error::Config)?;

    let url = cli.url.or_else(|| config.url.clone()).ok_or(Error::MissingUrl)?;
    let extra_headers = cli
        .headers
        .iter()
        .map(|raw| parse_header(raw))
        .collect::<Result<Vec<_>>>()?;
    let headers = config.merged_headers(&extra_headers);
    let client = ScimClient::new(HttpTransport::new(&url, &headers, config.timeout())?);

    let registry = match cli.schemas.or_else(|| config.schemas.clone()) {
        Some(path) => ResourceRegistry::from_file(&path)?,
        None if cli.discover || config.discover => client.discover()?,
        None => ResourceRegistry::with_defaults(),
    };

    let stdin = read_stdin()?;
    let invocation = Invocation::new(registry, client, stdin);

    match cli.command {
        Commands::Create(args) => {
            commands::create::run(&invocation, &args.resource, args.indent()).map(Some)
        }
        Commands::Replace(args) => {
            commands::replace::run(&invocation, &args.resource, args.indent()).map(Some)
        }
        Commands::Query {
            resource,
            id,
            search,
            indent,
        } => commands::query::run(
            &invocation,
            resource.as_deref(),
            id.as_deref(),
            search.into(),
            indent.enabled(),
        )
        .map(Some),
        Commands::Search { search, indent } => {
            commands::search::run(&invocation, search.into(), indent.enabled()).map(Some)
        }
        Commands::Delete {
            resource,
            id,
            indent,
        } => commands::delete::run(&invocation, &resource, &id, indent.enabled()),
        Commands::Test { verbose, format } => {
            Ok(Some(commands::test::run(&invocation, verbose, format)))
        }
    }
}

/// Reads piped input once. A terminal on stdin means no input.
fn read_stdin() -> Result<Option<serde_json::Value>> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }
    let mut raw = String::new();
    stdin.read_to_string(&mut raw).map_err(Error::Input)?;
    commands::parse_input(&raw)
}

fn subcommand_help(verb: &str) -> String {
    let mut cmd = Cli::command();
    cmd.build();
    match cmd.find_subcommand_mut(verb) {
        Some(sub) => sub.render_help().to_string(),
        None => cmd.render_help().to_string(),
    }
}
