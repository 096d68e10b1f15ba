//! Budgeted procedural roll straight from the catalog.

use anyhow::{Context, Result};
use clap::Parser;

use stonefall_core::{EncounterRequest, Tier, roll_encounter};

use super::show_encounter;
use crate::content::{ContentArgs, EncounterArgs};
use crate::output::OutputFormat;

/// Roll an encounter against the party's threat budget
#[derive(Parser)]
pub struct Roll {
    #[command(flatten)]
    content: ContentArgs,

    #[command(flatten)]
    encounter: EncounterArgs,

    /// Only enemies carrying one of these biome tags
    #[arg(short, long = "biome", value_name = "TAG", value_delimiter = ',')]
    biomes: Vec<String>,

    /// Only enemies of these families
    #[arg(short, long = "family", value_name = "FAMILY", value_delimiter = ',')]
    families: Vec<String>,

    /// Explicit tier filter, replacing the level-based gate
    #[arg(short, long = "tier", value_name = "TIER", value_delimiter = ',')]
    tiers: Vec<Tier>,

    /// Cap on the number of enemies
    #[arg(short, long)]
    max_enemies: Option<usize>,

    /// Keep boss tiers on easy and standard rolls
    #[arg(long)]
    allow_bosses: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

impl Roll {
    pub fn execute(self) -> Result<()> {
        let registry = self.content.load()?;
        let seed = self.encounter.resolve_seed();

        let mut request = EncounterRequest::new(self.encounter.level, self.encounter.size)
            .with_difficulty(self.encounter.difficulty())
            .with_seed(seed.clone())
            .allow_bosses_below_hard(self.allow_bosses);
        if !self.biomes.is_empty() {
            request = request.with_biomes(self.biomes);
        }
        if !self.families.is_empty() {
            request = request.with_families(self.families);
        }
        if !self.tiers.is_empty() {
            request = request.with_tiers(self.tiers);
        }
        if let Some(max) = self.max_enemies {
            request = request.with_max_enemies(max);
        }

        let encounter = roll_encounter(&registry, &request, &registry.config().encounter)
            .context("Failed to roll encounter")?;
        show_encounter(
            &registry,
            format!("roll:{}", self.encounter.difficulty()),
            &seed,
            &encounter,
            self.encounter.level,
            self.format,
        )
    }
}
