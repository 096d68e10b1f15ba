//! Spawn table preview.

use anyhow::{Context, Result};
use clap::Parser;

use stonefall_core::{TableRequest, build_from_table};

use super::show_encounter;
use crate::content::{ContentArgs, EncounterArgs};
use crate::output::OutputFormat;

/// Build an encounter from a spawn table
#[derive(Parser)]
pub struct Table {
    /// Spawn table key (see `list tables`)
    #[arg(value_name = "KEY")]
    key: String,

    #[command(flatten)]
    content: ContentArgs,

    #[command(flatten)]
    encounter: EncounterArgs,

    /// Cap on the number of enemies
    #[arg(short, long)]
    max_enemies: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

impl Table {
    pub fn execute(self) -> Result<()> {
        let registry = self.content.load()?;
        let seed = self.encounter.resolve_seed();

        let mut request = TableRequest::new(self.encounter.level, self.encounter.size)
            .with_difficulty(self.encounter.difficulty())
            .with_seed(seed.clone());
        if let Some(max) = self.max_enemies {
            request = request.with_max_enemies(max);
        }

        let encounter = build_from_table(
            &registry,
            &registry,
            &self.key,
            &request,
            &registry.config().encounter,
        )
        .with_context(|| format!("Failed to build spawn table '{}'", self.key))?;
        show_encounter(
            &registry,
            format!("table:{}", self.key),
            &seed,
            &encounter,
            self.encounter.level,
            self.format,
        )
    }
}
