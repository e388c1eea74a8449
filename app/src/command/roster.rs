use rostersync_core::{RosterRow, RosterStore};

use super::{ConfigPath, load_config, open_database};

#[derive(Debug, Clone)]
pub struct RosterInput {
    pub config: ConfigPath,
    pub by_number: bool,
}

/// Prints the stored roster, in page order or by jersey number.
#[derive(Debug, Clone, Copy)]
pub struct RosterStrategy;

impl super::CommandStrategy for RosterStrategy {
    type Input = RosterInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = load_config(input.config.as_deref())?;
        let db = open_database(&config).await?;

        let mut rows = db.list().await?;
        if rows.is_empty() {
            println!("No roster stored. Run 'rostersync sync' first.");
            return Ok(());
        }
        if input.by_number {
            rows.sort_by_key(RosterRow::jersey_sort_key);
        }

        for row in &rows {
            println!(
                "#{:<3} {:<30} {}",
                row.jersey_number, row.player_name, row.position
            );
        }
        if let Some(updated_at) = rows.iter().map(|r| r.updated_at).max() {
            println!("\n{} players, updated {}", rows.len(), updated_at.to_rfc3339());
        }

        Ok(())
    }
}
