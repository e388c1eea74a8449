//! Integration tests for the roster sync pipeline.
//!
//! These tests verify that:
//! - Two-hop resolution fetches the linked Team page
//! - A page with no players leaves the stored roster untouched
//! - A successful sync replaces the stored roster wholesale
//! - Configuration errors stop the pipeline before any fetch
//! - Overlapping syncs are rejected

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rostersync_core::{
    FetchError, GC_TEAM_URL_KEY, PageFetcher, ResolutionMode, RosterEntry, RosterExtractor,
    RosterRow, RosterStore, RosterSync, SettingsStore, SyncConfig, SyncError, SyncOutcome,
    SyncResponse,
};

const BASE: &str = "https://web.example.com/teams/AbC123";
const TEAM_PAGE: &str = "https://web.example.com/teams/AbC123/2025-spring-tigers/team";
const BASE_PAGE: &str = "[Home](https://web.example.com/teams/AbC123)\n\
[Team](https://web.example.com/teams/AbC123/2025-spring-tigers/team)\n\
[Schedule](https://web.example.com/teams/AbC123/schedule)";
const TABLE_ROSTER: &str = "| # | Name | Pos |\n|---|---|---|\n\
| 12 | John Smith | OF |\n\
| 7 | Jane Doe | SS |";

#[derive(Default)]
struct FakeFetcher {
    pages: HashMap<String, String>,
    unconfigured: bool,
    yield_first: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    fn with_page(mut self, url: &str, markdown: &str) -> Self {
        self.pages.insert(url.to_string(), markdown.to_string());
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch_markdown(&self, url: &str) -> Result<String, FetchError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(url.to_string());
        }
        if self.yield_first {
            tokio::task::yield_now().await;
        }
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                status: 502,
                body: format!("no page at {url}"),
            })
    }

    fn is_configured(&self) -> bool {
        !self.unconfigured
    }
}

#[derive(Default)]
struct MemoryStore {
    settings: Mutex<HashMap<String, String>>,
    rows: Mutex<Vec<RosterRow>>,
    fail_replace: bool,
}

impl MemoryStore {
    fn with_team_url(url: &str) -> Self {
        let store = Self::default();
        if let Ok(mut settings) = store.settings.lock() {
            settings.insert(GC_TEAM_URL_KEY.to_string(), url.to_string());
        }
        store
    }

    fn seeded(self, names: &[&str]) -> Self {
        let entries: Vec<RosterEntry> = names
            .iter()
            .enumerate()
            .filter_map(|(i, name)| RosterEntry::new(&i.to_string(), name, ""))
            .collect();
        if let Ok(mut rows) = self.rows.lock() {
            *rows = RosterRow::from_entries(&entries, Utc::now());
        }
        self
    }

    fn names(&self) -> Vec<String> {
        self.rows
            .lock()
            .map(|rows| rows.iter().map(|r| r.player_name.clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let settings = self
            .settings
            .lock()
            .map_err(|_| anyhow::anyhow!("settings lock poisoned"))?;
        Ok(settings.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.settings
            .lock()
            .map_err(|_| anyhow::anyhow!("settings lock poisoned"))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[async_trait]
impl RosterStore for MemoryStore {
    async fn replace_all(&self, rows: &[RosterRow]) -> anyhow::Result<()> {
        if self.fail_replace {
            anyhow::bail!("insert into roster failed: constraint violation");
        }
        *self
            .rows
            .lock()
            .map_err(|_| anyhow::anyhow!("roster lock poisoned"))? = rows.to_vec();
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<RosterRow>> {
        Ok(self
            .rows
            .lock()
            .map_err(|_| anyhow::anyhow!("roster lock poisoned"))?
            .clone())
    }
}

type Service = RosterSync<Arc<FakeFetcher>, Arc<MemoryStore>, Arc<MemoryStore>>;

fn service(fetcher: &Arc<FakeFetcher>, store: &Arc<MemoryStore>) -> Service {
    let extractor =
        RosterExtractor::with_defaults().unwrap_or_else(|e| panic!("defaults must build: {e}"));
    RosterSync::new(fetcher.clone(), store.clone(), store.clone(), extractor)
}

#[tokio::test]
async fn two_hop_sync_replaces_roster() {
    let fetcher = Arc::new(
        FakeFetcher::default()
            .with_page(BASE, BASE_PAGE)
            .with_page(TEAM_PAGE, TABLE_ROSTER),
    );
    let store = Arc::new(
        MemoryStore::with_team_url(BASE).seeded(&["Old Player", "Gone Player", "Third Player"]),
    );

    let outcome = service(&fetcher, &store)
        .sync()
        .await
        .unwrap_or_else(|e| panic!("sync failed: {e}"));

    assert_eq!(
        outcome,
        SyncOutcome::Replaced {
            count: 2,
            strategy: Some("table_row".to_string()),
            roster_url: TEAM_PAGE.to_string(),
        }
    );
    assert_eq!(store.names(), vec!["John Smith", "Jane Doe"]);
    assert_eq!(fetcher.calls(), vec![BASE.to_string(), TEAM_PAGE.to_string()]);
    assert_eq!(
        SyncResponse::from(&outcome),
        SyncResponse::ok(2),
        "boundary response reports the count"
    );
}

#[tokio::test]
async fn two_hop_without_link_appends_team() {
    let base_with_slash = format!("{BASE}/");
    let fallback = format!("{BASE}/team");
    let fetcher = Arc::new(
        FakeFetcher::default()
            .with_page(&base_with_slash, "# Tigers\nWelcome!")
            .with_page(&fallback, "#7 Jane Doe - SS"),
    );
    let store = Arc::new(MemoryStore::with_team_url(&base_with_slash));

    let outcome = service(&fetcher, &store)
        .sync()
        .await
        .unwrap_or_else(|e| panic!("sync failed: {e}"));

    assert!(matches!(outcome, SyncOutcome::Replaced { count: 1, .. }));
    assert_eq!(fetcher.calls().last(), Some(&fallback));
}

#[tokio::test]
async fn single_hop_fetches_roster_path_once() {
    let roster_url = format!("{BASE}/roster");
    let fetcher = Arc::new(FakeFetcher::default().with_page(&roster_url, "4 | Max Ortiz | C"));
    let store = Arc::new(MemoryStore::with_team_url(BASE));

    let sync = service(&fetcher, &store).with_config(SyncConfig {
        resolution: ResolutionMode::SingleHop,
        ..SyncConfig::default()
    });
    let outcome = sync.sync().await.unwrap_or_else(|e| panic!("sync failed: {e}"));

    assert!(matches!(outcome, SyncOutcome::Replaced { count: 1, .. }));
    assert_eq!(fetcher.calls(), vec![roster_url]);
}

#[tokio::test]
async fn no_players_leaves_roster_untouched() {
    let fetcher = Arc::new(
        FakeFetcher::default()
            .with_page(BASE, BASE_PAGE)
            .with_page(TEAM_PAGE, "Roster coming soon. Check back later!"),
    );
    let store = Arc::new(MemoryStore::with_team_url(BASE).seeded(&["Kept Player"]));

    let outcome = service(&fetcher, &store)
        .sync()
        .await
        .unwrap_or_else(|e| panic!("sync failed: {e}"));

    let SyncOutcome::NoPlayers {
        raw_preview,
        report,
    } = &outcome
    else {
        panic!("expected NoPlayers, got {outcome:?}");
    };
    assert_eq!(raw_preview, "Roster coming soon. Check back later!");
    assert_eq!(report.attempts.len(), 4);
    assert_eq!(store.names(), vec!["Kept Player"]);

    let response = SyncResponse::from(&outcome);
    assert!(!response.success);
    assert_eq!(
        response.raw_preview.as_deref(),
        Some("Roster coming soon. Check back later!")
    );
}

#[tokio::test]
async fn missing_credential_is_config_error_without_fetch() {
    let fetcher = Arc::new(FakeFetcher {
        unconfigured: true,
        ..FakeFetcher::default()
    });
    let store = Arc::new(MemoryStore::with_team_url(BASE));

    let result = service(&fetcher, &store).sync().await;

    assert!(matches!(result, Err(SyncError::Config(ref m)) if m == "Firecrawl not configured"));
    assert!(fetcher.calls().is_empty());
}

#[tokio::test]
async fn missing_or_blank_team_url_is_config_error() {
    let fetcher = Arc::new(FakeFetcher::default());

    let unset = Arc::new(MemoryStore::default());
    let result = service(&fetcher, &unset).sync().await;
    assert!(
        matches!(result, Err(SyncError::Config(ref m)) if m == "No GameChanger team URL configured")
    );

    let blank = Arc::new(MemoryStore::with_team_url("   "));
    let result = service(&fetcher, &blank).sync().await;
    assert!(matches!(result, Err(SyncError::Config(_))));

    assert!(fetcher.calls().is_empty());
}

#[tokio::test]
async fn fetch_failure_is_distinct_from_no_players() {
    let fetcher = Arc::new(FakeFetcher::default());
    let store = Arc::new(MemoryStore::with_team_url(BASE).seeded(&["Kept Player"]));

    let result = service(&fetcher, &store).sync().await;

    let Err(SyncError::Fetch { url, source }) = &result else {
        panic!("expected fetch error, got {result:?}");
    };
    assert_eq!(url, BASE);
    assert!(matches!(source, FetchError::Status { status: 502, .. }));
    assert_eq!(store.names(), vec!["Kept Player"]);
    assert_eq!(
        SyncResponse::from(&result).error.as_deref(),
        Some("Firecrawl scrape failed")
    );
}

#[tokio::test]
async fn persistence_failure_reports_store_message() {
    let fetcher = Arc::new(
        FakeFetcher::default()
            .with_page(BASE, BASE_PAGE)
            .with_page(TEAM_PAGE, TABLE_ROSTER),
    );
    let store = Arc::new(MemoryStore {
        fail_replace: true,
        ..MemoryStore::with_team_url(BASE)
    });

    let result = service(&fetcher, &store).sync().await;

    assert!(
        matches!(result, Err(SyncError::Persistence(ref m)) if m.contains("constraint violation"))
    );
}

#[tokio::test]
async fn overlapping_sync_is_rejected() {
    let fetcher = Arc::new(FakeFetcher {
        yield_first: true,
        ..FakeFetcher::default()
            .with_page(BASE, BASE_PAGE)
            .with_page(TEAM_PAGE, TABLE_ROSTER)
    });
    let store = Arc::new(MemoryStore::with_team_url(BASE));
    let sync = service(&fetcher, &store);

    let (first, second) = tokio::join!(sync.sync(), sync.sync());

    assert!(matches!(first, Ok(SyncOutcome::Replaced { count: 2, .. })));
    assert!(matches!(second, Err(SyncError::InProgress)));
    assert_eq!(fetcher.calls().len(), 2, "only the first sync fetched");

    // The guard is released once the first sync finishes.
    assert!(sync.sync().await.is_ok());
}
