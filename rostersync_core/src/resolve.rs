//! Locating the roster page for a team.
//!
//! The roster lives behind a "Team" tab that naive path construction does not
//! always reach, so the default mode reads the team's base page first and
//! follows its `[Team](...)` link.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

#[expect(clippy::unwrap_used, reason = "literal pattern")]
static TEAM_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[Team\]\(\s*([^)\s]*/team)/?\s*\)").unwrap());

/// How the roster page URL is derived from the team's base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// Fetch the base page, follow its `[Team](...)` link, else `<base>/team`.
    #[default]
    TwoHop,
    /// Fetch `<base>/roster` directly.
    SingleHop,
}

impl std::fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TwoHop => write!(f, "two_hop"),
            Self::SingleHop => write!(f, "single_hop"),
        }
    }
}

/// `base` with one `/segment` appended, trailing slashes collapsed.
#[must_use]
pub fn append_segment(base: &str, segment: &str) -> String {
    format!("{}/{segment}", base.trim().trim_end_matches('/'))
}

/// The first `[Team](.../team)` link in `markdown`, made absolute against
/// `base` when it is relative.
#[must_use]
pub fn find_team_link(markdown: &str, base: &str) -> Option<String> {
    let link = TEAM_LINK.captures(markdown)?.get(1)?.as_str();

    if Url::parse(link).is_ok() {
        return Some(link.to_string());
    }

    let joined = Url::parse(base).ok()?.join(link).ok()?;
    debug!(link, resolved = %joined, "resolved relative team link");
    Some(joined.to_string())
}

/// Roster page for `base` given the markdown of the base page.
#[must_use]
pub fn resolve_roster_url(base: &str, base_markdown: &str) -> String {
    find_team_link(base_markdown, base).unwrap_or_else(|| append_segment(base, "team"))
}

/// Roster page for the single-hop mode.
#[must_use]
pub fn single_hop_url(base: &str) -> String {
    append_segment(base, "roster")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_team_link() {
        let markdown = "[Home](https://example.com/teams/123)\n\
                        [Team](https://example.com/teams/123/season/team)\n\
                        [Schedule](https://example.com/teams/123/schedule)";
        assert_eq!(
            resolve_roster_url("https://example.com/teams/123", markdown),
            "https://example.com/teams/123/season/team"
        );
    }

    #[test]
    fn appends_team_without_link() {
        assert_eq!(
            resolve_roster_url("https://example.com/teams/123", "# Welcome"),
            "https://example.com/teams/123/team"
        );
        assert_eq!(
            resolve_roster_url("https://example.com/teams/123/", ""),
            "https://example.com/teams/123/team"
        );
    }

    #[test]
    fn ignores_team_links_to_other_pages() {
        let markdown = "[Team](https://example.com/teams/123/schedule)";
        assert_eq!(find_team_link(markdown, "https://example.com/teams/123"), None);
    }

    #[test]
    fn relative_link_is_joined() {
        let markdown = "[Team](/teams/123/2025-spring/team)";
        assert_eq!(
            find_team_link(markdown, "https://example.com/teams/123").as_deref(),
            Some("https://example.com/teams/123/2025-spring/team")
        );
    }

    #[test]
    fn single_hop_appends_roster() {
        assert_eq!(
            single_hop_url("https://example.com/teams/123//"),
            "https://example.com/teams/123/roster"
        );
    }

    #[test]
    fn mode_serde_names() {
        let mode: ResolutionMode =
            serde_json::from_str("\"single_hop\"").unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(mode, ResolutionMode::SingleHop);
        assert_eq!(ResolutionMode::default().to_string(), "two_hop");
    }
}
