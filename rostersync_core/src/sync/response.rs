use serde::{Deserialize, Serialize};

use super::{SyncError, SyncOutcome};

/// JSON body returned by the "sync roster now" action.
///
/// ```json
/// {"success": true, "count": 14}
/// {"success": false, "error": "Could not parse any players from the page", "raw_preview": "..."}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_preview: Option<String>,
}

impl SyncResponse {
    #[must_use]
    pub const fn ok(count: usize) -> Self {
        Self {
            success: true,
            count: Some(count),
            error: None,
            raw_preview: None,
        }
    }

    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            count: None,
            error: Some(error.into()),
            raw_preview: None,
        }
    }

    #[must_use]
    pub fn with_preview(mut self, raw_preview: String) -> Self {
        self.raw_preview = Some(raw_preview);
        self
    }
}

impl From<&SyncOutcome> for SyncResponse {
    fn from(outcome: &SyncOutcome) -> Self {
        match outcome {
            SyncOutcome::Replaced { count, .. } => Self::ok(*count),
            SyncOutcome::NoPlayers { raw_preview, .. } => {
                Self::failed(super::NO_PLAYERS).with_preview(raw_preview.clone())
            }
        }
    }
}

impl From<&SyncError> for SyncResponse {
    fn from(err: &SyncError) -> Self {
        Self::failed(err.public_message())
    }
}

impl From<&Result<SyncOutcome, SyncError>> for SyncResponse {
    fn from(result: &Result<SyncOutcome, SyncError>) -> Self {
        match result {
            Ok(outcome) => outcome.into(),
            Err(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::{FetchError, NO_PLAYERS};
    use serde_json::json;

    #[test]
    fn success_shape() {
        let value = serde_json::to_value(SyncResponse::ok(3)).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(value, json!({"success": true, "count": 3}));
    }

    #[test]
    fn no_players_shape() {
        let outcome = SyncOutcome::NoPlayers {
            raw_preview: "# Team".to_string(),
            report: crate::ExtractionReport::default(),
        };
        let value =
            serde_json::to_value(SyncResponse::from(&outcome)).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(
            value,
            json!({"success": false, "error": NO_PLAYERS, "raw_preview": "# Team"})
        );
    }

    #[test]
    fn fetch_failure_hides_upstream_detail() {
        let err = SyncError::Fetch {
            url: "https://example.com/team".to_string(),
            source: FetchError::Status {
                status: 503,
                body: "upstream exploded".to_string(),
            },
        };
        let response = SyncResponse::from(&err);
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Firecrawl scrape failed"));
        assert_eq!(response.raw_preview, None);
    }

    #[test]
    fn persistence_failure_keeps_store_message() {
        let result: Result<SyncOutcome, SyncError> =
            Err(SyncError::Persistence("disk full".to_string()));
        assert_eq!(
            SyncResponse::from(&result).error.as_deref(),
            Some("disk full")
        );
    }
}
