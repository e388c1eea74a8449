use thiserror::Error;

/// Failure of the page-fetch collaborator.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("scrape service not configured: {0}")]
    NotConfigured(String),

    #[error("scrape service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("scrape request failed: {0}")]
    Transport(String),

    #[error("unexpected scrape response: {0}")]
    Malformed(String),
}

/// Why a roster sync did not replace the stored roster.
///
/// A page that parsed to zero players is not an error; see
/// [`SyncOutcome::NoPlayers`](super::SyncOutcome::NoPlayers).
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("{0}")]
    Config(String),

    #[error("fetching {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("{0}")]
    Persistence(String),

    #[error("a roster sync is already running")]
    InProgress,
}

impl SyncError {
    /// Message reported to the caller at the service boundary.
    ///
    /// Upstream fetch details stay in the logs; the caller gets a generic line.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Fetch { .. } => super::SCRAPE_FAILED.to_string(),
            other => other.to_string(),
        }
    }
}
