//! Lumo CLI - Documentation site toolkit.
//!
//! Provides commands for:
//! - `check`: Validate configuration and navigation
//! - `nav`: Resolve the sidebar for a locale
//! - `render`: Render diagram files to SVG

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, NavArgs, RenderArgs};
use output::Output;

/// Lumo - Documentation site toolkit.
#[derive(Parser)]
#[command(name = "lumo", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configuration and the navigation table.
    Check(CheckArgs),
    /// Resolve the sidebar for a locale and print it as JSON.
    Nav(NavArgs),
    /// Render diagram files to SVG via Kroki.
    Render(RenderArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // Check if verbose flag is set for the render command
    let verbose = matches!(&cli.command, Commands::Render(args) if args.verbose);

    // Initialize tracing with appropriate log level
    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Check(args) => args.execute(&output),
        Commands::Nav(args) => args.execute(&output),
        Commands::Render(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
