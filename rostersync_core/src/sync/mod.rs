//! The "sync roster now" pipeline.
//!
//! read team URL → fetch page(s) → extract → replace persisted roster.
//! Only a non-empty extraction touches the roster store.

mod error;
mod response;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::extract::{ExtractionReport, RosterExtractor, ScrapeResult};
use crate::resolve::{ResolutionMode, resolve_roster_url, single_hop_url};
use crate::roster::RosterRow;
use crate::util::{GC_TEAM_URL_KEY, preview};
use crate::{PageFetcher, RosterStore, SettingsStore};

pub use error::{FetchError, SyncError};
pub use response::SyncResponse;

pub const FETCH_NOT_CONFIGURED: &str = "Firecrawl not configured";
pub const NO_TEAM_URL: &str = "No GameChanger team URL configured";
pub const SCRAPE_FAILED: &str = "Firecrawl scrape failed";
pub const NO_PLAYERS: &str = "Could not parse any players from the page";

/// Sync service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Settings key holding the team base URL.
    #[serde(default = "SyncConfig::default_team_url_key")]
    pub team_url_key: String,

    #[serde(default)]
    pub resolution: ResolutionMode,
}

impl SyncConfig {
    fn default_team_url_key() -> String {
        GC_TEAM_URL_KEY.to_string()
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            team_url_key: Self::default_team_url_key(),
            resolution: ResolutionMode::default(),
        }
    }
}

/// Result of a sync that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The stored roster now holds exactly these `count` players.
    Replaced {
        count: usize,
        strategy: Option<String>,
        roster_url: String,
    },
    /// The page parsed to nothing; the stored roster was left alone.
    NoPlayers {
        raw_preview: String,
        report: ExtractionReport,
    },
}

pub struct RosterSync<F, S, R>
where
    F: PageFetcher,
    S: SettingsStore,
    R: RosterStore,
{
    fetcher: F,
    settings: S,
    roster: R,
    extractor: RosterExtractor,
    config: SyncConfig,
    in_flight: Mutex<()>,
}

impl<F, S, R> RosterSync<F, S, R>
where
    F: PageFetcher,
    S: SettingsStore,
    R: RosterStore,
{
    pub fn new(fetcher: F, settings: S, roster: R, extractor: RosterExtractor) -> Self {
        Self {
            fetcher,
            settings,
            roster,
            extractor,
            config: SyncConfig::default(),
            in_flight: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub const fn extractor(&self) -> &RosterExtractor {
        &self.extractor
    }

    /// Run one sync.
    ///
    /// At most one sync runs per service; a call made while another is in
    /// flight returns [`SyncError::InProgress`] immediately.
    pub async fn sync(&self) -> Result<SyncOutcome, SyncError> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            warn!("Roster sync requested while another is running");
            return Err(SyncError::InProgress);
        };

        if !self.fetcher.is_configured() {
            error!("Scrape service credential missing");
            return Err(SyncError::Config(FETCH_NOT_CONFIGURED.to_string()));
        }

        let team_url = self.team_url().await?;
        let (roster_url, markdown) = self.fetch_roster_page(&team_url).await?;

        let extraction = self.extractor.extract(&markdown);
        let report = extraction.report;

        let entries = match extraction.result {
            ScrapeResult::Players { entries } => entries,
            ScrapeResult::NoPlayers { raw_preview } => {
                warn!(
                    "No players parsed from {} ({} chars); roster left unchanged",
                    roster_url, report.input_chars
                );
                return Ok(SyncOutcome::NoPlayers {
                    raw_preview,
                    report,
                });
            }
        };

        let rows = RosterRow::from_entries(&entries, Utc::now());
        self.roster.replace_all(&rows).await.map_err(|e| {
            error!("Roster replace failed: {e:#}");
            SyncError::Persistence(e.to_string())
        })?;

        info!("Replaced roster with {} players from {}", rows.len(), roster_url);
        Ok(SyncOutcome::Replaced {
            count: rows.len(),
            strategy: report.strategy,
            roster_url,
        })
    }

    async fn team_url(&self) -> Result<String, SyncError> {
        let value = self
            .settings
            .get(&self.config.team_url_key)
            .await
            .map_err(|e| {
                error!("Reading setting '{}' failed: {e:#}", self.config.team_url_key);
                SyncError::Persistence(e.to_string())
            })?;

        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| SyncError::Config(NO_TEAM_URL.to_string()))
    }

    /// Resolve the roster page for `team_url` and return it with its markdown.
    async fn fetch_roster_page(&self, team_url: &str) -> Result<(String, String), SyncError> {
        match self.config.resolution {
            ResolutionMode::TwoHop => {
                let base_markdown = self.fetch(team_url).await?;
                let roster_url = resolve_roster_url(team_url, &base_markdown);
                info!("Resolved roster page: {}", roster_url);
                let markdown = self.fetch(&roster_url).await?;
                Ok((roster_url, markdown))
            }
            ResolutionMode::SingleHop => {
                let roster_url = single_hop_url(team_url);
                let markdown = self.fetch(&roster_url).await?;
                Ok((roster_url, markdown))
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<String, SyncError> {
        info!("Scraping: {}", url);
        let markdown = self.fetcher.fetch_markdown(url).await.map_err(|source| {
            error!("Scrape of {url} failed: {source}");
            match source {
                FetchError::NotConfigured(_) => {
                    SyncError::Config(FETCH_NOT_CONFIGURED.to_string())
                }
                source => SyncError::Fetch {
                    url: url.to_string(),
                    source,
                },
            }
        })?;

        info!("Scraped markdown length: {}", markdown.chars().count());
        debug!("Scraped markdown preview: {}", preview(&markdown, 500));
        Ok(markdown)
    }
}
