//! sc CLI - Shortcode renderer.
//!
//! Provides commands for:
//! - `render`: Expand shortcodes in a document
//! - `tags`: List the registered tags
//! - `scan`: List the tags found in a document without rendering

mod commands;
mod engine;
mod error;
mod frontmatter;
mod host;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{RenderArgs, ScanArgs, TagsArgs};
use output::Output;

/// sc - Shortcode renderer.
#[derive(Parser)]
#[command(name = "sc", version, about)]
struct Cli {
    /// Enable verbose output (info logs and config details).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand shortcodes in a document and print the result.
    Render(RenderArgs),
    /// List registered tags.
    Tags(TagsArgs),
    /// List the tags found in a document.
    Scan(ScanArgs),
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
        Commands::Render(args) => args.execute(&output, cli.verbose),
        Commands::Tags(args) => args.execute(&output),
        Commands::Scan(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
