//! Small helpers shared by the extractor and the sync service.

/// Settings key holding the team's base page URL.
pub const GC_TEAM_URL_KEY: &str = "gc_team_url";

/// Default number of characters kept in a raw-text diagnostic preview.
pub const DEFAULT_PREVIEW_CHARS: usize = 2000;

/// First `max_chars` characters of `text`.
///
/// Counts chars, not bytes, so a multi-byte character at the boundary is
/// never split.
#[must_use]
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
