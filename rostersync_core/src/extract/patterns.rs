//! Line-oriented roster patterns.
//!
//! Each pattern is a regex applied to every trimmed line of the page. The regex
//! must define the named groups `number` and `name`; `position` is optional.
//! Patterns can be loaded from configuration, so a new page layout only needs
//! a new `PatternDef`, not a code change.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::RosterMatcher;
use crate::roster::RosterEntry;

/// Characters left dangling when a separator has no position after it.
const SEPARATOR_CHARS: &[char] = &['-', '–', '|'];

/// A position code glued to the name with a hyphen: `Jane Doe-SS`.
#[expect(clippy::unwrap_used, reason = "literal pattern")]
static GLUED_POSITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>.+?)-(?P<position>(?:[1-3]B|[A-Z]{1,3})(?:/(?:[1-3]B|[A-Z]{1,3}))?)$")
        .unwrap()
});

/// Error type for pattern building.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid regex in pattern '{id}': {source}")]
    Regex {
        id: String,
        #[source]
        source: regex::Error,
    },

    #[error("pattern '{id}' is missing the named group '{group}'")]
    MissingGroup { id: String, group: &'static str },
}

/// Definition of a single line pattern.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatternDef {
    /// Strategy name, reported in diagnostics.
    pub id: String,

    /// Regex with named groups `number`, `name` and optionally `position`.
    pub pattern: String,
}

impl PatternDef {
    pub fn new(id: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pattern: pattern.into(),
        }
    }

    /// Compile into a matcher.
    ///
    /// # Errors
    /// Returns an error if the regex is invalid or lacks a required group.
    pub fn build(&self) -> Result<LineMatcher, PatternError> {
        let regex = Regex::new(&self.pattern).map_err(|source| PatternError::Regex {
            id: self.id.clone(),
            source,
        })?;

        for group in ["number", "name"] {
            if !regex.capture_names().flatten().any(|n| n == group) {
                return Err(PatternError::MissingGroup {
                    id: self.id.clone(),
                    group,
                });
            }
        }

        Ok(LineMatcher {
            id: self.id.clone(),
            regex,
        })
    }
}

/// Built-in line strategies, in priority order.
#[must_use]
pub fn default_patterns() -> Vec<PatternDef> {
    vec![
        // | 12 | John Smith | OF |
        PatternDef::new(
            "table_row",
            r"^\|\s*#?(?P<number>\d{1,3})\s*\|\s*(?P<name>[A-Za-z][A-Za-z\s.'-]*?)\s*\|\s*(?P<position>[A-Za-z0-9/\s]*?)\s*(?:\||$)",
        ),
        // #12 John Smith - OF, #12 John Smith | OF, #12 John Smith
        PatternDef::new(
            "hash_prefixed",
            r"^#(?P<number>\d{1,3})\s+(?P<name>[A-Za-z][A-Za-z\s.'-]*?)(?:(?:\s+[-–]|\s*\|)\s*(?P<position>[A-Za-z0-9/\s]*?))?\s*$",
        ),
        // 12 | John Smith | OF
        PatternDef::new(
            "pipe_delimited",
            r"^(?P<number>\d{1,3})\s*\|\s*(?P<name>[A-Za-z][A-Za-z\s.'-]*?)\s*\|\s*(?P<position>[A-Za-z0-9/\s]+)",
        ),
    ]
}

/// A compiled [`PatternDef`]. Every matching line contributes one entry.
#[derive(Debug, Clone)]
pub struct LineMatcher {
    id: String,
    regex: Regex,
}

impl LineMatcher {
    fn match_line(&self, line: &str) -> Option<RosterEntry> {
        let caps = self.regex.captures(line)?;
        let number = caps.name("number")?.as_str();
        let name = caps
            .name("name")?
            .as_str()
            .trim_end_matches(|c: char| c.is_whitespace() || SEPARATOR_CHARS.contains(&c));
        let position = caps.name("position").map_or("", |m| m.as_str().trim());

        if position.is_empty() {
            if let Some(glued) = GLUED_POSITION.captures(name) {
                return RosterEntry::new(number, &glued["name"], &glued["position"]);
            }
        }
        RosterEntry::new(number, name, position)
    }
}

/// Markdown headings (`# Roster`) never carry a player; `#12 ...` does.
fn is_heading(line: &str) -> bool {
    line.strip_prefix('#')
        .is_some_and(|rest| !rest.starts_with(|c: char| c.is_ascii_digit()))
}

impl RosterMatcher for LineMatcher {
    fn name(&self) -> &str {
        &self.id
    }

    fn try_match(&self, text: &str) -> Option<Vec<RosterEntry>> {
        let entries: Vec<RosterEntry> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !is_heading(line))
            .filter_map(|line| {
                let entry = self.match_line(line)?;
                debug!(strategy = %self.id, line, "matched roster line");
                Some(entry)
            })
            .collect();

        (!entries.is_empty()).then_some(entries)
    }
}
