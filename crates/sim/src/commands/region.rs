//! Region encounter preview.

use anyhow::{Context, Result};
use clap::Parser;

use stonefall_core::RegionRequest;
use stonefall_core::roll_for_region;

use super::show_encounter;
use crate::content::{ContentArgs, EncounterArgs};
use crate::output::OutputFormat;

/// Roll an encounter for a world region
#[derive(Parser)]
pub struct Region {
    /// Region key (see `list regions`)
    #[arg(value_name = "KEY")]
    key: String,

    #[command(flatten)]
    content: ContentArgs,

    #[command(flatten)]
    encounter: EncounterArgs,

    /// Draw from the region's spawn tables instead of its presets
    #[arg(short, long)]
    tables: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

impl Region {
    pub fn execute(self) -> Result<()> {
        let registry = self.content.load()?;
        let seed = self.encounter.resolve_seed();

        let request = RegionRequest {
            party_level: self.encounter.level,
            party_size: self.encounter.size,
            difficulty: self.encounter.difficulty(),
            seed: Some(seed.clone()),
            use_spawn_table: self.tables,
        };
        let (source, encounter) = roll_for_region(
            &registry,
            &registry,
            &self.key,
            &request,
            &registry.config().encounter,
        )
        .with_context(|| format!("Failed to roll region '{}'", self.key))?;
        show_encounter(
            &registry,
            format!("{}/{source}", self.key),
            &seed,
            &encounter,
            self.encounter.level,
            self.format,
        )
    }
}
