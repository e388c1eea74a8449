use rostersync_core::SettingsStore;
use tracing::info;
use url::Url;

use super::{ConfigPath, load_config, open_database};

/// Stores the team base URL the sync reads.
#[derive(Debug, Clone, Copy)]
pub struct SetUrlStrategy;

impl super::CommandStrategy for SetUrlStrategy {
    type Input = (ConfigPath, String);

    async fn execute(&self, (config_path, url): Self::Input) -> anyhow::Result<()> {
        let config = load_config(config_path.as_deref())?;
        let url = validate_team_url(&url)?;

        let db = open_database(&config).await?;
        db.set(&config.roster.sync.team_url_key, &url).await?;

        info!("Team URL set to {}", url);
        println!("Team URL saved: {url}");
        Ok(())
    }
}

/// Accept absolute http(s) URLs only, trimmed and without a trailing slash.
fn validate_team_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim();
    let parsed =
        Url::parse(trimmed).map_err(|e| anyhow::anyhow!("Invalid team URL '{trimmed}': {e}"))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("Team URL must use http or https, got '{}'", parsed.scheme());
    }
    if parsed.host_str().is_none() {
        anyhow::bail!("Team URL has no host: '{trimmed}'");
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_team_page_url() {
        let url = validate_team_url("  https://web.gc.com/teams/AbC123/  ")
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(url, "https://web.gc.com/teams/AbC123");
    }

    #[test]
    fn rejects_relative_and_non_http_urls() {
        assert!(validate_team_url("teams/AbC123").is_err());
        assert!(validate_team_url("ftp://web.gc.com/teams/AbC123").is_err());
        assert!(validate_team_url("").is_err());
    }
}
