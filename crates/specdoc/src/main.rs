//! specdoc CLI - API reference documentation generator.
//!
//! Provides commands for:
//! - `serve`: Serve the documentation page for a specification
//! - `bundle`: Write the documentation page to a single HTML file

mod commands;
mod dotted;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BundleArgs, ServeArgs};
use dotted::split_dotted;
use error::CliError;
use output::Output;

/// Log filter used when neither `--verbose` nor `RUST_LOG` is given.
const DEFAULT_FILTER: &str = "warn,specdoc_server=info";

/// specdoc - API reference documentation generator.
#[derive(Parser)]
#[command(name = "specdoc", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the documentation page.
    Serve(ServeArgs),
    /// Write the documentation page to a single HTML file.
    Bundle(BundleArgs),
}

fn main() {
    let (args, dotted) = split_dotted(std::env::args_os());
    let cli = Cli::parse_from(args);
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Serve(args) => args.verbose,
        Commands::Bundle(args) => args.verbose,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or the default filter
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Serve(args) => tokio::runtime::Runtime::new()
            .map_err(CliError::from)
            .and_then(|rt| rt.block_on(args.execute(dotted))),
        Commands::Bundle(args) => args.execute(dotted),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
