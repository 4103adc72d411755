mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "destiny",
    about = "Fortune ritual: enter your birth details, meet your character",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from destiny.yaml)
    #[arg(long, global = true, env = "DESTINY_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API and static assets
    Serve {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "3000")]
        port: u16,

        /// Don't open browser automatically
        #[arg(long)]
        no_open: bool,
    },

    /// Walk through the ritual in the terminal
    Ritual {
        /// Seed the fortune draw for a reproducible result
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Draw a fortune without entering birth details
    Draw {
        /// Seed the fortune draw for a reproducible result
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List the characters a ritual can reveal
    Characters,

    /// List stored ritual responses
    Responses,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Serve { port, no_open } => cmd::serve::run(&root, port, no_open),
        Commands::Ritual { seed } => cmd::ritual::run(&root, seed, cli.json),
        Commands::Draw { seed } => cmd::draw::run(&root, seed, cli.json),
        Commands::Characters => cmd::characters::run(&root, cli.json),
        Commands::Responses => cmd::responses::run(&root, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
