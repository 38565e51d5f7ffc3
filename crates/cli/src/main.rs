//! canvas CLI
//!
//! Command-line scenario runner and demo front end for `canvas-core`.
//!
//! ## Subcommands
//!
//! ```text
//! canvas run       <scenario.json>                Replay a scenario file of edit intents
//! canvas inspect    <snapshot.json>                Print a persisted snapshot's summary
//! canvas new         -o <snapshot.json>             Write an empty snapshot
//! ```

mod args;
mod commands;
mod config;
mod scenario;

use args::Commands;
use clap::Parser;

/// canvas — an interactive architecture-diagram canvas engine.
#[derive(Parser, Debug)]
#[command(name = "canvas", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Suppress non-essential output.
    #[arg(long, global = true)]
    quiet: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args, cli.quiet),
        Commands::Inspect(args) => commands::inspect::run(args),
        Commands::New(args) => commands::new::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
