#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

mod command;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use command::{
    CommandStrategy, ExtractInput, ExtractStrategy, InfoStrategy, InitStrategy, RosterInput,
    RosterStrategy, SetUrlStrategy, SyncStrategy, VersionStrategy,
};

#[derive(Parser)]
#[command(name = "rostersync")]
#[command(about = "Pull a team roster from its GameChanger page", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/rostersync/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Init,
    /// Show version
    Version,
    /// Show configuration and database status
    Info,
    /// Store the GameChanger team page URL
    SetUrl {
        /// Team base URL, e.g. https://web.gc.com/teams/<id>
        url: String,
    },
    /// Fetch the team page and replace the stored roster
    Sync,
    /// Run the roster extractor on a local markdown file
    Extract {
        /// Markdown file to parse
        file: PathBuf,

        /// Print the full extraction as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the stored roster
    Roster {
        /// Sort by jersey number instead of page order
        #[arg(long)]
        by_number: bool,
    },
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = cli.config;
    match cli.command {
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Version => VersionStrategy.execute(()).await,
        Commands::Info => InfoStrategy.execute(config).await,
        Commands::SetUrl { url } => SetUrlStrategy.execute((config, url)).await,
        Commands::Sync => SyncStrategy.execute(config).await,
        Commands::Extract { file, json } => {
            ExtractStrategy
                .execute(ExtractInput { config, file, json })
                .await
        }
        Commands::Roster { by_number } => {
            RosterStrategy
                .execute(RosterInput { config, by_number })
                .await
        }
    }
}
