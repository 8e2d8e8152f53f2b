//! docsgraph CLI.
//!
//! Provides commands for:
//! - `generate`: Build and validate the docs graph, write JSON artifacts
//! - `llms`: Write the plain-text `llms.txt` dump
//! - `search`: Query a generated search index
//! - `serve`: Serve generated artifacts over HTTP

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{GenerateArgs, LlmsArgs, SearchArgs, ServeArgs};
use error::CliError;
use output::Output;

/// docsgraph - markdown docs graph generator.
#[derive(Parser)]
#[command(name = "dg", version, about)]
struct Cli {
    /// Enable verbose output (timing and summary logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the docs graph, search index and site config.
    Generate(GenerateArgs),
    /// Write llms.txt.
    Llms(LlmsArgs),
    /// Search a generated index.
    Search(SearchArgs),
    /// Serve generated artifacts.
    Serve(ServeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Generate(args) => args.execute(),
        Commands::Llms(args) => args.execute(),
        Commands::Search(args) => args.execute(),
        Commands::Serve(args) => run_async(args),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

fn run_async(args: ServeArgs) -> Result<(), CliError> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(args.execute())
}
