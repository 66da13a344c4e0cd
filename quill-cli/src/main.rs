//! Quill — build, inspect and render a views directory.
//!
//! # Usage
//!
//! ```text
//! quill build [--views DIR] [--config FILE] [TEMPLATE...]
//! quill list [--views DIR] [--config FILE] [--json]
//! quill render <TEMPLATE> [--data FILE] [--set k=v]... [--layout NAME] [--section key=NAME]...
//! ```
//!
//! Every command accepts `--mode development|production`; log verbosity follows
//! `RUST_LOG` (default `warn`).

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{build::BuildArgs, list::ListArgs, render::RenderArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "quill",
    version,
    about = "Compile and render template trees with layouts",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile templates and report per-file failures.
    Build(BuildArgs),

    /// List discovered templates grouped by directory.
    List(ListArgs),

    /// Render one template, optionally inside a layout.
    Render(RenderArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Build(args) => args.run(),
        Commands::List(args) => args.run(),
        Commands::Render(args) => args.run(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
