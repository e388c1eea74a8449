//! Offline extraction against a saved page, for tuning patterns without
//! spending scrape credits.

use std::path::PathBuf;

use rostersync_config::Config;
use rostersync_core::{Extraction, RosterExtractor, ScrapeResult};
use tracing::debug;

use super::{ConfigPath, load_config};

#[derive(Debug, Clone)]
pub struct ExtractInput {
    pub config: ConfigPath,
    pub file: PathBuf,
    pub json: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ExtractStrategy;

impl super::CommandStrategy for ExtractStrategy {
    type Input = ExtractInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        // Extraction needs no credentials, so a missing config file falls back to defaults.
        let config = load_config(input.config.as_deref()).unwrap_or_else(|e| {
            debug!("Using default extractor settings: {e}");
            Config::default()
        });

        let markdown = tokio::fs::read_to_string(&input.file)
            .await
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", input.file.display()))?;

        let extractor = RosterExtractor::new(&config.roster.extractor)?;
        let extraction = extractor.extract(&markdown);

        if input.json {
            println!("{}", serde_json::to_string_pretty(&extraction)?);
        } else {
            print_summary(&extraction);
        }

        Ok(())
    }
}

fn print_summary(extraction: &Extraction) {
    let report = &extraction.report;
    println!(
        "Input: {} chars, {} lines",
        report.input_chars, report.line_count
    );
    for attempt in &report.attempts {
        println!("  {:<16} {} entries", attempt.strategy, attempt.entries);
    }
    println!();

    match &extraction.result {
        ScrapeResult::Players { entries } => {
            println!(
                "{} players via {}:",
                entries.len(),
                report.strategy.as_deref().unwrap_or("?")
            );
            for entry in entries {
                println!(
                    "  #{:<3} {:<30} {}",
                    entry.jersey_number, entry.player_name, entry.position
                );
            }
        }
        ScrapeResult::NoPlayers { raw_preview } => {
            println!("No players found. Page preview:");
            println!("{raw_preview}");
        }
    }
}
