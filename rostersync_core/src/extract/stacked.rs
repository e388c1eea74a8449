//! Fallback for pages that render each player as a vertical stack of lines:
//!
//! ```text
//! 12
//! John Smith
//! OF
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::RosterMatcher;
use crate::roster::{RosterEntry, is_player_name};

/// Navigation and staff labels that show up where a name would be.
pub const DEFAULT_DENYLIST: &[&str] = &[
    "Staff", "Coach", "Manager", "Home", "Schedule", "Team", "Stats", "Follow", "Roster",
];

#[expect(clippy::unwrap_used, reason = "literal pattern")]
static JERSEY_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#?\d{1,3}$").unwrap());

#[expect(clippy::unwrap_used, reason = "literal pattern")]
static POSITION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[1-3]B|[A-Z]{1,3})(?:/(?:[1-3]B|[A-Z]{1,3}))?$").unwrap()
});

/// Number / name / optional position read off consecutive non-empty lines.
#[derive(Debug, Clone)]
pub struct StackedMatcher {
    denylist: Vec<String>,
}

impl StackedMatcher {
    pub const NAME: &'static str = "stacked_lines";

    #[must_use]
    pub fn new<I, S>(denylist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            denylist: denylist
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// The line starts with a denylisted word, ignoring case.
    ///
    /// Plain prefix match: "Coach Bob", "Coaches" and "Followers" are all rejected.
    fn is_denylisted(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.denylist.iter().any(|word| lower.starts_with(word.as_str()))
    }

    fn is_name_line(&self, line: &str) -> bool {
        line.chars().count() >= 2 && is_player_name(line) && !self.is_denylisted(line)
    }
}

impl Default for StackedMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_DENYLIST)
    }
}

impl RosterMatcher for StackedMatcher {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn try_match(&self, text: &str) -> Option<Vec<RosterEntry>> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let mut entries = Vec::new();
        let mut i = 0;
        while i < lines.len() {
            let number = lines[i];
            let name = lines
                .get(i + 1)
                .copied()
                .filter(|n| JERSEY_LINE.is_match(number) && self.is_name_line(n));

            if let Some(name) = name {
                let position = lines
                    .get(i + 2)
                    .copied()
                    .filter(|p| POSITION_LINE.is_match(p));

                if let Some(entry) = RosterEntry::new(number, name, position.unwrap_or("")) {
                    debug!(
                        strategy = Self::NAME,
                        number, name, position, "matched stacked entry"
                    );
                    entries.push(entry);
                    i += if position.is_some() { 3 } else { 2 };
                    continue;
                }
            }

            i += 1;
        }

        (!entries.is_empty()).then_some(entries)
    }
}
