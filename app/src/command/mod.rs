//! Static strategy pattern for CLI commands.
//!
//! Each command is its own zero-sized type with an associated input type, so
//! dispatch in `main` is monomorphized.

use std::path::{Path, PathBuf};

use rostersync_config::Config;
use rostersync_store::RosterDatabase;
use tracing::info;

mod extract;
mod info;
mod init;
mod roster;
mod set_url;
mod sync;
mod version;

pub use extract::{ExtractInput, ExtractStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use roster::{RosterInput, RosterStrategy};
pub use set_url::SetUrlStrategy;
pub use sync::SyncStrategy;
pub use version::VersionStrategy;

/// `--config` override shared by commands that read the config file.
pub type ConfigPath = Option<PathBuf>;

/// Core trait defining the contract for all command strategies.
///
/// Adding a command means adding a type that implements this trait and a
/// variant in `main`.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Load the config from `path`, or from `~/rostersync/config.json`.
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Connect to the configured database, creating tables when missing.
async fn open_database(config: &Config) -> anyhow::Result<RosterDatabase> {
    info!("Opening roster database");
    RosterDatabase::new(&config.database.url).await
}
