mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{booking::BookingSubcommand, key::KeySubcommand, tracker::TrackerSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "opsdesk",
    about = "Business-operations service — deals, bookings, keys, tracker, integrations",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .opsdesk/ or .git/)
    #[arg(long, global = true, env = "OPSDESK_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize opsdesk in the current project
    Init {
        /// Project name (default: directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Run the HTTP API server
    Serve {
        #[arg(long, default_value_t = 3170)]
        port: u16,
    },

    /// Show a project summary
    State,

    /// Manage software keys
    Key {
        #[command(subcommand)]
        subcommand: KeySubcommand,
    },

    /// Manage bookings
    Booking {
        #[command(subcommand)]
        subcommand: BookingSubcommand,
    },

    /// File and manage bugs and ideas
    Tracker {
        #[command(subcommand)]
        subcommand: TrackerSubcommand,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let root = root::resolve_root(cli.root.as_deref());

    match cli.command {
        Commands::Init { name } => cmd::init::run(&root, name, cli.json),
        Commands::Serve { port } => opsdesk_server::serve(root, port).await,
        Commands::State => cmd::state::run(&root, cli.json),
        Commands::Key { subcommand } => cmd::key::run(&root, subcommand, cli.json),
        Commands::Booking { subcommand } => cmd::booking::run(&root, subcommand, cli.json),
        Commands::Tracker { subcommand } => cmd::tracker::run(&root, subcommand, cli.json),
    }
}
