//! Auto-played battle.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use stonefall_content::ContentRegistry;
use stonefall_core::encounter::PresetOverrides;
use stonefall_core::env::mix_seed;
use stonefall_core::{
    CombatSession, Difficulty, EncounterDefinition, EncounterRequest, EncounterSeed, PcgRng,
    RegionRequest, TableRequest, build_from_table, roll_encounter, roll_for_region, roll_preset,
};

use crate::autoplay;
use crate::content::{ContentArgs, PartyArgs, resolve_seed};
use crate::output::{self, BattleReport, OutputFormat, PreviewReport};

/// Salt separating the combat stream from the encounter stream.
const COMBAT_SALT: u64 = 0xBA77;

/// Roll an encounter and let the party fight it out
#[derive(Parser)]
#[command(group = clap::ArgGroup::new("source").multiple(false))]
pub struct Battle {
    #[command(flatten)]
    content: ContentArgs,

    #[command(flatten)]
    party: PartyArgs,

    /// Difficulty (easy, standard, hard, deadly)
    #[arg(short, long)]
    difficulty: Option<Difficulty>,

    /// Seed for both the encounter and the fight
    #[arg(short, long)]
    seed: Option<EncounterSeed>,

    /// Fight a spawn table instead of a budgeted roll
    #[arg(long, value_name = "KEY", group = "source")]
    table: Option<String>,

    /// Fight a preset instead of a budgeted roll
    #[arg(long, value_name = "KEY", group = "source")]
    preset: Option<String>,

    /// Fight whatever a region offers
    #[arg(long, value_name = "KEY", group = "source")]
    region: Option<String>,

    /// Abort after this many simulation steps
    #[arg(long, default_value_t = 200_000)]
    max_steps: usize,

    /// Output format
    #[arg(long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

impl Battle {
    pub fn execute(self) -> Result<()> {
        let registry = self.content.load()?;
        let config = registry.config();
        let seed = resolve_seed(self.seed.as_ref());

        let mut party = self.party.build(config)?;
        let level = party.average_level();
        let size = party.len() as u32;

        let (source, encounter) = self.encounter(&registry, &seed, level, size)?;
        let preview = encounter.preview(level, &config.combat, &config.encounter);
        info!(%source, enemies = encounter.len(), "encounter ready");

        let rng = PcgRng::new(mix_seed(seed.to_state(), COMBAT_SALT, 0));
        let mut session = CombatSession::start(&mut party, &encounter, registry.env(), config, rng)
            .context("Failed to start combat")?;
        let log = autoplay::run(&mut session, self.max_steps)?;
        let summary = session
            .summary()
            .cloned()
            .context("Battle ended without a summary")?;

        let report = BattleReport {
            encounter: PreviewReport {
                source,
                seed: &seed,
                preview: &preview,
            },
            log: &log,
            summary: &summary,
        };
        match self.format {
            OutputFormat::Summary => output::print_battle(&report),
            OutputFormat::Json => output::print_json(&report)?,
        }
        Ok(())
    }

    fn encounter(
        &self,
        registry: &ContentRegistry,
        seed: &EncounterSeed,
        level: u32,
        size: u32,
    ) -> Result<(String, EncounterDefinition)> {
        let config = &registry.config().encounter;
        let difficulty = self.difficulty.unwrap_or_default();

        if let Some(key) = &self.table {
            let request = TableRequest::new(level, size)
                .with_difficulty(difficulty)
                .with_seed(seed.clone());
            let encounter = build_from_table(registry, registry, key, &request, config)
                .with_context(|| format!("Failed to build spawn table '{key}'"))?;
            return Ok((format!("table:{key}"), encounter));
        }

        if let Some(key) = &self.preset {
            let mut overrides = PresetOverrides::party(level, size).with_seed(seed.clone());
            if let Some(difficulty) = self.difficulty {
                overrides = overrides.with_difficulty(difficulty);
            }
            let encounter = roll_preset(registry, registry, key, &overrides, config)
                .with_context(|| format!("Failed to roll preset '{key}'"))?;
            return Ok((format!("preset:{key}"), encounter));
        }

        if let Some(key) = &self.region {
            let request = RegionRequest {
                party_level: level,
                party_size: size,
                difficulty,
                seed: Some(seed.clone()),
                use_spawn_table: false,
            };
            let (source, encounter) = roll_for_region(registry, registry, key, &request, config)
                .with_context(|| format!("Failed to roll region '{key}'"))?;
            return Ok((format!("{key}/{source}"), encounter));
        }

        let request = EncounterRequest::new(level, size)
            .with_difficulty(difficulty)
            .with_seed(seed.clone());
        let encounter =
            roll_encounter(registry, &request, config).context("Failed to roll encounter")?;
        Ok((format!("roll:{difficulty}"), encounter))
    }
}
