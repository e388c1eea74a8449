use std::sync::Arc;

use rostersync_core::{RosterExtractor, RosterSync, SyncResponse};
use rostersync_providers::FirecrawlFetcher;
use tracing::info;

use super::{ConfigPath, load_config, open_database};

/// Runs one roster sync and prints the boundary response as JSON.
///
/// Exits with an error when the response is not a success, so scripts can
/// tell a replaced roster from everything else. The in-progress guard lives in
/// the service, so it only rejects overlap within this process.
#[derive(Debug, Clone, Copy)]
pub struct SyncStrategy;

impl super::CommandStrategy for SyncStrategy {
    type Input = ConfigPath;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = load_config(input.as_deref())?;

        let fetcher = FirecrawlFetcher::new(config.scraper.clone())?;
        let extractor = RosterExtractor::new(&config.roster.extractor)?;
        let db = Arc::new(open_database(&config).await?);

        let service = RosterSync::new(fetcher, db.clone(), db, extractor)
            .with_config(config.roster.sync.clone());

        info!(
            "Starting roster sync ({} resolution)",
            config.roster.sync.resolution
        );
        let result = service.sync().await;
        let response = SyncResponse::from(&result);

        println!("{}", serde_json::to_string_pretty(&response)?);

        if response.success {
            Ok(())
        } else {
            anyhow::bail!(
                "Roster sync failed: {}",
                response.error.as_deref().unwrap_or("unknown error")
            )
        }
    }
}
