//! Preset preview.

use anyhow::{Context, Result};
use clap::Parser;

use stonefall_core::encounter::PresetOverrides;
use stonefall_core::roll_preset;

use super::show_encounter;
use crate::content::{ContentArgs, EncounterArgs};
use crate::output::OutputFormat;

/// Roll an encounter from a named preset
#[derive(Parser)]
pub struct Preset {
    /// Preset key (see `list presets`)
    #[arg(value_name = "KEY")]
    key: String,

    #[command(flatten)]
    content: ContentArgs,

    // Difficulty falls back to the preset's own when omitted.
    #[command(flatten)]
    encounter: EncounterArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

impl Preset {
    pub fn execute(self) -> Result<()> {
        let registry = self.content.load()?;
        let seed = self.encounter.resolve_seed();

        let mut overrides = PresetOverrides::party(self.encounter.level, self.encounter.size)
            .with_seed(seed.clone());
        if let Some(difficulty) = self.encounter.difficulty {
            overrides = overrides.with_difficulty(difficulty);
        }

        let encounter = roll_preset(
            &registry,
            &registry,
            &self.key,
            &overrides,
            &registry.config().encounter,
        )
        .with_context(|| format!("Failed to roll preset '{}'", self.key))?;
        show_encounter(
            &registry,
            format!("preset:{}", self.key),
            &seed,
            &encounter,
            self.encounter.level,
            self.format,
        )
    }
}
