//! Content and party arguments shared by every subcommand.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, info};

use stonefall_content::{ConfigLoader, ContentFactory, ContentRegistry, builtin};
use stonefall_core::{
    Attribute, Class, Difficulty, EncounterSeed, GameConfig, Party, PartyMember, Race,
};

const DATA_DIR_ENV: &str = "STONEFALL_DATA_DIR";
const CONFIG_ENV: &str = "STONEFALL_CONFIG";

const MEMBER_NAMES: [&str; 4] = ["Aria", "Bram", "Cora", "Dane"];

/// Where content and rule tuning come from.
#[derive(Args, Clone, Debug, Default)]
pub struct ContentArgs {
    /// Directory with enemies.ron, tables.ron, abilities.ron, items.ron and
    /// an optional config.toml (env: STONEFALL_DATA_DIR). Defaults to the
    /// bundled content.
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// TOML rule overrides (env: STONEFALL_CONFIG). A missing file keeps the
    /// defaults.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ContentArgs {
    pub fn load(&self) -> Result<ContentRegistry> {
        let data_dir = self
            .data_dir
            .clone()
            .or_else(|| read_env::<PathBuf>(DATA_DIR_ENV));

        let registry = match data_dir {
            Some(dir) => {
                info!("Loading content from {}", dir.display());
                ContentFactory::new(&dir)
                    .load_registry()
                    .with_context(|| format!("Failed to load content from {}", dir.display()))?
            }
            None => {
                debug!("Using bundled content");
                builtin().context("Bundled content is invalid")?
            }
        };

        let config_path = self.config.clone().or_else(|| read_env::<PathBuf>(CONFIG_ENV));
        match config_path {
            Some(path) => {
                let config = ConfigLoader::load_or_default(&path)?;
                Ok(registry.with_config(config))
            }
            None => Ok(registry),
        }
    }
}

/// Party context for encounter rolls.
#[derive(Args, Clone, Debug)]
pub struct EncounterArgs {
    /// Average party level
    #[arg(short, long, default_value_t = 1)]
    pub level: u32,

    /// Number of party members
    #[arg(short = 'n', long, default_value_t = 3)]
    pub size: u32,

    /// Difficulty (easy, standard, hard, deadly)
    #[arg(short, long)]
    pub difficulty: Option<Difficulty>,

    /// Seed; numbers and text are both accepted. Drawn at random when omitted.
    #[arg(short, long)]
    pub seed: Option<EncounterSeed>,
}

impl EncounterArgs {
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty.unwrap_or_default()
    }

    pub fn resolve_seed(&self) -> EncounterSeed {
        resolve_seed(self.seed.as_ref())
    }
}

/// The given seed, or a fresh random one that is logged for replay.
pub fn resolve_seed(seed: Option<&EncounterSeed>) -> EncounterSeed {
    seed.cloned().unwrap_or_else(|| {
        let seed = rand::random::<u64>();
        info!(seed, "No seed given, drew a fresh one");
        EncounterSeed::Number(seed)
    })
}

/// Party composition for battles.
#[derive(Args, Clone, Debug)]
pub struct PartyArgs {
    /// Comma-separated classes, one member each
    #[arg(
        short,
        long,
        value_delimiter = ',',
        default_values_t = [Class::Warrior, Class::Cleric, Class::Wizard]
    )]
    pub party: Vec<Class>,

    /// Race shared by every member
    #[arg(short, long, default_value_t = Race::Human)]
    pub race: Race,

    /// Starting level of every member
    #[arg(short, long, default_value_t = 1)]
    pub level: u32,
}

impl PartyArgs {
    /// Recruits the members, levels them up and spends their points on
    /// their class's primary attribute.
    pub fn build(&self, config: &GameConfig) -> Result<Party> {
        let progression = &config.progression;
        let mut party = Party::new(progression);
        for (index, class) in self.party.iter().enumerate() {
            let name = MEMBER_NAMES
                .get(index)
                .map_or_else(|| format!("Hero {}", index + 1), |name| (*name).to_string());
            party
                .recruit(name, self.race, *class, progression)
                .with_context(|| format!("Failed to recruit a {class}"))?;
        }

        let xp = PartyMember::xp_for_level(self.level, progression);
        for member in party.members_mut() {
            member.grant_xp(xp, progression);
            // Overflow past the attribute cap goes to CON.
            for attribute in [member.class().primary(), Attribute::Con] {
                let points = member.unspent_points();
                if points == 0 {
                    break;
                }
                member
                    .allocate(attribute, points)
                    .with_context(|| format!("Failed to allocate points for {}", member.name))?;
            }
            debug!(
                name = %member.name,
                class = %member.class(),
                level = member.level(),
                hp = member.max_hp(),
                "party member ready"
            );
        }
        Ok(party)
    }
}

fn read_env<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|value| value.parse().ok())
}
