use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use rostersync_core::{ExtractorConfig, SyncConfig};
use rostersync_providers::FirecrawlConfig;

/// Environment variable that overrides `scraper.api_key`.
pub const API_KEY_ENV: &str = "FIRECRAWL_API_KEY";

const CONFIG_DIR: &str = "rostersync";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub scraper: FirecrawlConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub roster: RosterConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "DatabaseConfig::default_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
        }
    }
}

impl DatabaseConfig {
    fn default_url() -> String {
        let db_path = dirs::home_dir()
            .unwrap_or_default()
            .join(CONFIG_DIR)
            .join("rostersync.db");
        format!("sqlite://{}?mode=rwc", db_path.display())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RosterConfig {
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(CONFIG_DIR))
    }

    pub fn default_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load `~/rostersync/config.json`, then apply environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'rostersync init' to create config.",
                config_path.display()
            );
        }

        let content = std::fs::read_to_string(config_path)?;
        let mut config: Self = serde_json::from_str(&content)?;
        debug!("Loaded config from {}", config_path.display());

        config.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// Replace the configured API key with `value` when it is non-blank.
    pub fn apply_api_key_override(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|v| !v.trim().is_empty()) {
            info!("Using Firecrawl API key from {}", API_KEY_ENV);
            self.scraper.api_key = Some(key);
        }
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join(CONFIG_FILE);
        Self::write_template(&config_path)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Add your Firecrawl API key (or export {API_KEY_ENV})");
        println!("   2. Run 'rostersync set-url <team-url>' with the GameChanger team page");
        println!("   3. Run 'rostersync sync' to pull the roster");
        println!();
        println!("🔧 Configuration options:");
        println!("   - scraper.wait_for_ms: render wait before the page is captured");
        println!("   - roster.sync.resolution: two_hop (default) or single_hop");
        println!("   - roster.extractor.extra_patterns: extra line patterns to try");
        println!();
        Ok(())
    }

    /// Write the default template to `config_path`.
    pub fn write_template(config_path: &Path) -> anyhow::Result<()> {
        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        let config_template = format!(
            r#"{{
  "scraper": {{
    "api_key": "your-firecrawl-api-key-here",
    "base_url": "https://api.firecrawl.dev",
    "wait_for_ms": 3000,
    "timeout_secs": 60,
    "only_main_content": true
  }},
  "database": {{
    "url": "{db_url}"
  }},
  "roster": {{
    "sync": {{
      "team_url_key": "gc_team_url",
      "resolution": "two_hop"
    }},
    "extractor": {{
      "extra_patterns": [],
      "denylist": ["Staff", "Coach", "Manager", "Home", "Schedule", "Team", "Stats", "Follow", "Roster"],
      "preview_chars": 2000
    }}
  }}
}}"#,
            db_url = DatabaseConfig::default_url().replace('\\', "\\\\"),
        );

        std::fs::write(config_path, config_template)?;
        Ok(())
    }
}
