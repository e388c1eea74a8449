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

use async_trait::async_trait;
use std::sync::Arc;

pub mod extract;
pub mod resolve;
pub mod roster;
pub mod sync;
pub mod util;

pub use extract::{
    Extraction, ExtractionReport, ExtractorConfig, PatternDef, PatternError, RosterExtractor,
    RosterMatcher, ScrapeResult, StrategyAttempt,
};
pub use resolve::ResolutionMode;
pub use roster::{RosterEntry, RosterRow};
pub use sync::{FetchError, RosterSync, SyncConfig, SyncError, SyncOutcome, SyncResponse};
pub use util::{GC_TEAM_URL_KEY, preview};

/// Renders a page (client-side JS included) and returns its text as markdown.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_markdown(&self, url: &str) -> Result<String, FetchError>;

    /// Whether the fetcher has what it needs (credentials) to make a request.
    fn is_configured(&self) -> bool {
        true
    }
}

/// Key-value settings shared with the rest of the site.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// Persisted roster. `replace_all` must be all-or-nothing.
#[async_trait]
pub trait RosterStore: Send + Sync {
    async fn replace_all(&self, rows: &[RosterRow]) -> anyhow::Result<()>;
    async fn list(&self) -> anyhow::Result<Vec<RosterRow>>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch_markdown(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch_markdown(url).await
    }

    fn is_configured(&self) -> bool {
        (**self).is_configured()
    }
}

#[async_trait]
impl<T: SettingsStore + ?Sized> SettingsStore for Arc<T> {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        (**self).set(key, value).await
    }
}

#[async_trait]
impl<T: RosterStore + ?Sized> RosterStore for Arc<T> {
    async fn replace_all(&self, rows: &[RosterRow]) -> anyhow::Result<()> {
        (**self).replace_all(rows).await
    }

    async fn list(&self) -> anyhow::Result<Vec<RosterRow>> {
        (**self).list().await
    }
}
