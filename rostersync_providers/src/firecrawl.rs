use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rostersync_core::{FetchError, PageFetcher, preview};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

/// Longest error body kept in a [`FetchError::Status`].
const ERROR_BODY_CHARS: usize = 500;

/// Firecrawl scrape service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirecrawlConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "FirecrawlConfig::default_base_url")]
    pub base_url: String,

    /// Milliseconds the service waits for client-side rendering before capture.
    #[serde(default = "FirecrawlConfig::default_wait_for_ms")]
    pub wait_for_ms: u64,

    #[serde(default = "FirecrawlConfig::default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "FirecrawlConfig::default_only_main_content")]
    pub only_main_content: bool,
}

impl FirecrawlConfig {
    fn default_base_url() -> String {
        "https://api.firecrawl.dev".to_string()
    }

    const fn default_wait_for_ms() -> u64 {
        3000
    }

    const fn default_timeout_secs() -> u64 {
        60
    }

    const fn default_only_main_content() -> bool {
        true
    }

    /// The API key, if one is set and not blank.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

impl Default for FirecrawlConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: Self::default_base_url(),
            wait_for_ms: Self::default_wait_for_ms(),
            timeout_secs: Self::default_timeout_secs(),
            only_main_content: Self::default_only_main_content(),
        }
    }
}

/// Fetches rendered pages as markdown through the Firecrawl scrape API.
///
/// Each call is a single request; failures are returned, never retried.
pub struct FirecrawlFetcher {
    client: Client,
    config: FirecrawlConfig,
}

impl FirecrawlFetcher {
    pub fn new(config: FirecrawlConfig) -> anyhow::Result<Self> {
        info!("Creating FirecrawlFetcher");
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.config.base_url = base_url;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &FirecrawlConfig {
        &self.config
    }

    fn scrape_endpoint(&self) -> String {
        format!("{}/v1/scrape", self.config.base_url.trim_end_matches('/'))
    }
}

/// JSON body for one scrape request.
fn scrape_request_body(url: &str, config: &FirecrawlConfig) -> Value {
    json!({
        "url": url,
        "formats": ["markdown"],
        "onlyMainContent": config.only_main_content,
        "waitFor": config.wait_for_ms,
    })
}

/// Pull the markdown out of a scrape response.
///
/// Looks at `data.markdown`, then a top-level `markdown`; anything else is an
/// empty page rather than an error.
fn markdown_from_response(response: &Value) -> String {
    response["data"]["markdown"]
        .as_str()
        .or_else(|| response["markdown"].as_str())
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl PageFetcher for FirecrawlFetcher {
    async fn fetch_markdown(&self, url: &str) -> Result<String, FetchError> {
        let Some(api_key) = self.config.api_key() else {
            return Err(FetchError::NotConfigured(
                "missing Firecrawl API key".to_string(),
            ));
        };

        debug!(
            "Firecrawl scrape: url={}, waitFor={}ms",
            url, self.config.wait_for_ms
        );

        let response = self
            .client
            .post(self.scrape_endpoint())
            .bearer_auth(api_key)
            .json(&scrape_request_body(url, &self.config))
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!("Firecrawl returned HTTP {} for {}", status.as_u16(), url);
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: preview(&body, ERROR_BODY_CHARS),
            });
        }

        let json: Value =
            serde_json::from_str(&body).map_err(|e| FetchError::Malformed(e.to_string()))?;

        Ok(markdown_from_response(&json))
    }

    fn is_configured(&self) -> bool {
        self.config.api_key().is_some()
    }
}
