use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One player as read off a roster page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub jersey_number: String,
    pub player_name: String,
    /// Position code; empty when the page did not show one.
    pub position: String,
}

impl RosterEntry {
    /// Normalize raw captures into an entry.
    ///
    /// Strips a leading `#` from the number and trims every field. Returns
    /// `None` unless the number is 1-3 digits and the name passes
    /// [`is_player_name`].
    #[must_use]
    pub fn new(jersey_number: &str, player_name: &str, position: &str) -> Option<Self> {
        let number = jersey_number.trim();
        let number = number.strip_prefix('#').unwrap_or(number).trim();
        if number.is_empty() || number.len() > 3 || !number.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let name = player_name.trim();
        if !is_player_name(name) {
            return None;
        }

        Some(Self {
            jersey_number: number.to_string(),
            player_name: name.to_string(),
            position: position.trim().to_string(),
        })
    }
}

/// Letters, spaces, periods, apostrophes and hyphens, starting with a letter.
#[must_use]
pub fn is_player_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphabetic() || matches!(c, ' ' | '.' | '\'' | '-'))
}

/// A roster entry as persisted by the sync service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRow {
    pub id: Uuid,
    pub jersey_number: String,
    pub player_name: String,
    pub position: String,
    /// Position of the entry in the scraped page, starting at 0.
    pub sort_index: i32,
    pub updated_at: DateTime<Utc>,
}

impl RosterRow {
    /// Stamp a freshly extracted batch with new ids and one shared timestamp.
    #[must_use]
    pub fn from_entries(entries: &[RosterEntry], updated_at: DateTime<Utc>) -> Vec<Self> {
        entries
            .iter()
            .zip(0_i32..)
            .map(|(entry, sort_index)| Self {
                id: Uuid::now_v7(),
                jersey_number: entry.jersey_number.clone(),
                player_name: entry.player_name.clone(),
                position: entry.position.clone(),
                sort_index,
                updated_at,
            })
            .collect()
    }

    /// Numeric jersey order used by the viewer-facing roster list.
    #[must_use]
    pub fn jersey_sort_key(&self) -> (u32, i32) {
        (
            self.jersey_number.parse().unwrap_or(u32::MAX),
            self.sort_index,
        )
    }
}
