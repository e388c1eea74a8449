//! Roster extraction from scraped page markdown.
//!
//! The page format belongs to a third party and changes without notice, so
//! extraction is an ordered cascade of small matchers instead of one grammar.
//! The first matcher that yields at least one entry wins; results from
//! different matchers are never mixed. The stacked-lines fallback always runs
//! last, after every line pattern has come up empty.

pub mod patterns;
pub mod stacked;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::roster::RosterEntry;
use crate::util::{DEFAULT_PREVIEW_CHARS, preview};

pub use patterns::{LineMatcher, PatternDef, PatternError, default_patterns};
pub use stacked::{DEFAULT_DENYLIST, StackedMatcher};

/// One strategy of the cascade.
pub trait RosterMatcher: Send + Sync {
    /// Strategy name used in logs and reports.
    fn name(&self) -> &str;

    /// Entries found in `text`, or `None` when the strategy does not apply.
    fn try_match(&self, text: &str) -> Option<Vec<RosterEntry>>;
}

/// Extractor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Extra line patterns, tried after the built-in ones.
    #[serde(default)]
    pub extra_patterns: Vec<PatternDef>,

    /// Words that disqualify a line from being a name in the stacked fallback.
    #[serde(default = "ExtractorConfig::default_denylist")]
    pub denylist: Vec<String>,

    /// Characters of raw input kept when nothing could be parsed.
    #[serde(default = "ExtractorConfig::default_preview_chars")]
    pub preview_chars: usize,
}

impl ExtractorConfig {
    fn default_denylist() -> Vec<String> {
        DEFAULT_DENYLIST.iter().map(ToString::to_string).collect()
    }

    const fn default_preview_chars() -> usize {
        DEFAULT_PREVIEW_CHARS
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            extra_patterns: Vec::new(),
            denylist: Self::default_denylist(),
            preview_chars: Self::default_preview_chars(),
        }
    }
}

/// Outcome of one extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScrapeResult {
    /// Entries in source order.
    Players { entries: Vec<RosterEntry> },
    /// Nothing usable; `raw_preview` is the start of the input.
    NoPlayers { raw_preview: String },
}

/// What each strategy produced on the way to the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    pub input_chars: usize,
    pub line_count: usize,
    pub attempts: Vec<StrategyAttempt>,
    /// The strategy whose entries were kept.
    pub strategy: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyAttempt {
    pub strategy: String,
    pub entries: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub result: ScrapeResult,
    pub report: ExtractionReport,
}

impl Extraction {
    #[must_use]
    pub fn entries(&self) -> &[RosterEntry] {
        match &self.result {
            ScrapeResult::Players { entries } => entries,
            ScrapeResult::NoPlayers { .. } => &[],
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// Ordered strategy cascade over page markdown.
pub struct RosterExtractor {
    matchers: Vec<Box<dyn RosterMatcher>>,
    fallback: Box<dyn RosterMatcher>,
    preview_chars: usize,
}

impl RosterExtractor {
    /// Build the cascade: built-in line patterns, configured extra patterns,
    /// then the stacked-lines fallback.
    ///
    /// # Errors
    /// Returns an error if any pattern fails to compile.
    pub fn new(config: &ExtractorConfig) -> Result<Self, PatternError> {
        let matchers = default_patterns()
            .iter()
            .chain(&config.extra_patterns)
            .map(|def| def.build().map(|m| Box::new(m) as Box<dyn RosterMatcher>))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            matchers,
            fallback: Box::new(StackedMatcher::new(&config.denylist)),
            preview_chars: config.preview_chars,
        })
    }

    /// Extractor with the built-in patterns and default denylist.
    ///
    /// # Errors
    /// Returns an error if the built-in patterns fail to compile.
    pub fn with_defaults() -> Result<Self, PatternError> {
        Self::new(&ExtractorConfig::default())
    }

    /// Append a matcher after the existing ones, ahead of the fallback.
    #[must_use]
    pub fn with_matcher(mut self, matcher: Box<dyn RosterMatcher>) -> Self {
        self.matchers.push(matcher);
        self
    }

    /// Strategy names in the order they are tried.
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&str> {
        self.cascade().map(|m| m.name()).collect()
    }

    fn cascade(&self) -> impl Iterator<Item = &Box<dyn RosterMatcher>> {
        self.matchers.iter().chain(std::iter::once(&self.fallback))
    }

    /// Run the cascade over `text`. Never fails; an unusable page yields
    /// [`ScrapeResult::NoPlayers`] with a preview of the input.
    #[must_use]
    pub fn extract(&self, text: &str) -> Extraction {
        let mut report = ExtractionReport {
            input_chars: text.chars().count(),
            line_count: text.lines().count(),
            ..ExtractionReport::default()
        };
        debug!(
            chars = report.input_chars,
            lines = report.line_count,
            "extracting roster from markdown"
        );

        for matcher in self.cascade() {
            let entries = matcher.try_match(text).unwrap_or_default();
            report.attempts.push(StrategyAttempt {
                strategy: matcher.name().to_string(),
                entries: entries.len(),
            });

            if entries.is_empty() {
                debug!(strategy = matcher.name(), "no entries");
                continue;
            }

            info!(
                strategy = matcher.name(),
                count = entries.len(),
                "parsed roster entries"
            );
            report.strategy = Some(matcher.name().to_string());
            return Extraction {
                result: ScrapeResult::Players { entries },
                report,
            };
        }

        warn!(
            chars = report.input_chars,
            strategies = report.attempts.len(),
            "could not parse any players"
        );
        debug!(preview = %preview(text, 500), "unparsed markdown");

        Extraction {
            result: ScrapeResult::NoPlayers {
                raw_preview: preview(text, self.preview_chars),
            },
            report,
        }
    }
}
