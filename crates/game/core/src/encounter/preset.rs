//! Named roll presets and region-level encounter selection.

use rand::Rng;
use tracing::debug;

use super::builder::{EncounterRequest, rng_for, roll_encounter};
use super::definition::EncounterDefinition;
use super::difficulty::Difficulty;
use super::error::EncounterError;
use super::spawn::{TableRequest, build_from_table};
use crate::config::EncounterConfig;
use crate::env::{EncounterPreset, EncounterSeed, EnemyOracle, TablesOracle};

/// Caller-side overrides applied on top of a preset's defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PresetOverrides {
    pub party_level: Option<u32>,
    pub party_size: Option<u32>,
    pub seed: Option<EncounterSeed>,
    pub difficulty: Option<Difficulty>,
    pub biomes: Option<Vec<String>>,
    pub families: Option<Vec<String>>,
    pub max_enemies: Option<usize>,
    pub allow_bosses_below_hard: Option<bool>,
}

impl PresetOverrides {
    pub fn party(party_level: u32, party_size: u32) -> Self {
        Self {
            party_level: Some(party_level),
            party_size: Some(party_size),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: impl Into<EncounterSeed>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Merges the overrides with `preset`'s defaults.
    pub fn resolve(&self, preset: &EncounterPreset) -> EncounterRequest {
        let defaults = &preset.defaults;
        let base = EncounterRequest::default();
        EncounterRequest {
            party_level: self.party_level.unwrap_or(base.party_level),
            party_size: self.party_size.unwrap_or(base.party_size),
            difficulty: self.difficulty.unwrap_or(defaults.difficulty),
            biomes: self.biomes.clone().or_else(|| defaults.biomes.clone()),
            families: self.families.clone().or_else(|| defaults.families.clone()),
            tiers: None,
            seed: self.seed.clone(),
            max_enemies: Some(self.max_enemies.unwrap_or(defaults.max_enemies)),
            allow_bosses_below_hard: self
                .allow_bosses_below_hard
                .unwrap_or(defaults.allow_bosses_below_hard),
        }
    }
}

/// Rolls an encounter from a named preset.
///
/// # Errors
///
/// [`EncounterError::UnknownPreset`] for an unregistered key, otherwise
/// whatever [`roll_encounter`] reports.
pub fn roll_preset<T, O>(
    tables: &T,
    catalog: &O,
    key: &str,
    overrides: &PresetOverrides,
    config: &EncounterConfig,
) -> Result<EncounterDefinition, EncounterError>
where
    T: TablesOracle + ?Sized,
    O: EnemyOracle + ?Sized,
{
    let preset = tables
        .preset(key)
        .ok_or_else(|| EncounterError::UnknownPreset(key.to_string()))?;
    let request = overrides.resolve(preset);
    debug!(preset = %preset.key, difficulty = %request.difficulty, "rolling preset");
    roll_encounter(catalog, &request, config)
}

/// Which builder produced a region encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EncounterSource {
    Table(String),
    Preset(String),
}

impl core::fmt::Display for EncounterSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Table(key) => write!(f, "table:{key}"),
            Self::Preset(key) => write!(f, "preset:{key}"),
        }
    }
}

/// Party context for [`roll_for_region`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionRequest {
    pub party_level: u32,
    pub party_size: u32,
    pub difficulty: Difficulty,
    pub seed: Option<EncounterSeed>,
    /// Prefer the region's spawn tables over its presets.
    pub use_spawn_table: bool,
}

impl Default for RegionRequest {
    fn default() -> Self {
        Self {
            party_level: 1,
            party_size: 3,
            difficulty: Difficulty::Standard,
            seed: None,
            use_spawn_table: false,
        }
    }
}

/// Picks one of a region's encounter sources by seed and builds it.
///
/// Spawn tables are used only when requested and present; presets are the
/// default source.
///
/// # Errors
///
/// - [`EncounterError::UnknownRegion`] for an unregistered region.
/// - [`EncounterError::EmptyRegion`] when the region lists no usable source.
pub fn roll_for_region<T, O>(
    tables: &T,
    catalog: &O,
    region_key: &str,
    request: &RegionRequest,
    config: &EncounterConfig,
) -> Result<(EncounterSource, EncounterDefinition), EncounterError>
where
    T: TablesOracle + ?Sized,
    O: EnemyOracle + ?Sized,
{
    let region = tables
        .region(region_key)
        .ok_or_else(|| EncounterError::UnknownRegion(region_key.to_string()))?;
    let mut rng = rng_for(request.seed.as_ref());

    if request.use_spawn_table && !region.spawn_tables.is_empty() {
        let key = &region.spawn_tables[rng.gen_range(0..region.spawn_tables.len())];
        debug!(region = %region.key, table = %key, "region encounter from spawn table");
        let table_request = TableRequest {
            party_level: request.party_level,
            party_size: request.party_size,
            difficulty: request.difficulty,
            seed: request.seed.clone(),
            max_enemies: None,
        };
        let encounter = build_from_table(tables, catalog, key, &table_request, config)?;
        return Ok((EncounterSource::Table(key.clone()), encounter));
    }

    if region.presets.is_empty() {
        return Err(EncounterError::EmptyRegion(region.key.clone()));
    }

    let key = &region.presets[rng.gen_range(0..region.presets.len())];
    debug!(region = %region.key, preset = %key, "region encounter from preset");
    let overrides = PresetOverrides {
        seed: request.seed.clone(),
        difficulty: Some(request.difficulty),
        ..PresetOverrides::party(request.party_level, request.party_size)
    };
    let encounter = roll_preset(tables, catalog, key, &overrides, config)?;
    Ok((EncounterSource::Preset(key.clone()), encounter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::fixtures::catalog;
    use crate::env::{PresetDefaults, Region, SlotRole, SpawnSlot, SpawnTable, Tier};

    struct Tables {
        tables: Vec<SpawnTable>,
        presets: Vec<EncounterPreset>,
        regions: Vec<Region>,
    }

    impl TablesOracle for Tables {
        fn spawn_table(&self, key: &str) -> Option<&SpawnTable> {
            self.tables.iter().find(|t| t.key == key)
        }
        fn spawn_tables(&self) -> Vec<&SpawnTable> {
            self.tables.iter().collect()
        }
        fn preset(&self, key: &str) -> Option<&EncounterPreset> {
            self.presets.iter().find(|p| p.key == key)
        }
        fn presets(&self) -> Vec<&EncounterPreset> {
            self.presets.iter().collect()
        }
        fn region(&self, key: &str) -> Option<&Region> {
            self.regions.iter().find(|r| r.key == key)
        }
        fn regions(&self) -> Vec<&Region> {
            self.regions.iter().collect()
        }
    }

    fn fixture() -> Tables {
        Tables {
            tables: vec![SpawnTable {
                key: "crypt".into(),
                name: "Crypt".into(),
                slots: vec![SpawnSlot {
                    role: SlotRole::Minion,
                    count: (2, 3),
                    tiers: None,
                    families: None,
                    biomes: None,
                    names: vec!["Skeleton".into()],
                    require_at_least: 0,
                }],
            }],
            presets: vec![
                EncounterPreset {
                    key: "crypt".into(),
                    name: "Crypt".into(),
                    defaults: PresetDefaults {
                        biomes: Some(vec!["crypt".into()]),
                        families: Some(vec!["Undead".into()]),
                        difficulty: Difficulty::Standard,
                        max_enemies: 2,
                        allow_bosses_below_hard: false,
                    },
                    recommended_levels: (1, 4),
                },
                EncounterPreset {
                    key: "lair".into(),
                    name: "Lair".into(),
                    defaults: PresetDefaults {
                        biomes: None,
                        families: Some(vec!["Dragon".into()]),
                        difficulty: Difficulty::Deadly,
                        max_enemies: 3,
                        allow_bosses_below_hard: true,
                    },
                    recommended_levels: (9, 12),
                },
            ],
            regions: vec![
                Region {
                    key: "Barrows".into(),
                    biomes: vec!["crypt".into()],
                    level_range: (1, 4),
                    presets: vec!["crypt".into()],
                    spawn_tables: vec!["crypt".into()],
                },
                Region {
                    key: "Nowhere".into(),
                    biomes: Vec::new(),
                    level_range: (1, 1),
                    presets: Vec::new(),
                    spawn_tables: Vec::new(),
                },
            ],
        }
    }

    #[test]
    fn overrides_win_over_defaults() {
        let tables = fixture();
        let preset = tables.preset("lair").unwrap();
        let request = PresetOverrides {
            max_enemies: Some(1),
            ..PresetOverrides::party(10, 4).with_difficulty(Difficulty::Hard)
        }
        .resolve(preset);
        assert_eq!(request.party_level, 10);
        assert_eq!(request.difficulty, Difficulty::Hard);
        assert_eq!(request.max_enemies, Some(1));
        assert!(request.allow_bosses_below_hard);
        assert_eq!(request.families, Some(vec!["Dragon".to_string()]));

        let defaulted = PresetOverrides::default().resolve(preset);
        assert_eq!((defaulted.party_level, defaulted.party_size), (1, 3));
        assert_eq!(defaulted.difficulty, Difficulty::Deadly);
    }

    #[test]
    fn preset_rolls_follow_filters() {
        let (tables, catalog) = (fixture(), catalog());
        let config = EncounterConfig::default();
        for seed in 0..50u64 {
            let overrides = PresetOverrides::party(2, 3).with_seed(seed);
            let encounter = roll_preset(&tables, &catalog, "crypt", &overrides, &config).unwrap();
            assert!((1..=2).contains(&encounter.len()));
            assert!(encounter.iter().all(|e| e.key == "Skeleton"));
        }
    }

    #[test]
    fn unknown_keys_are_named_errors() {
        let (tables, catalog) = (fixture(), catalog());
        let config = EncounterConfig::default();
        assert_eq!(
            roll_preset(&tables, &catalog, "nope", &PresetOverrides::default(), &config),
            Err(EncounterError::UnknownPreset("nope".into()))
        );
        assert_eq!(
            roll_for_region(&tables, &catalog, "Atlantis", &RegionRequest::default(), &config),
            Err(EncounterError::UnknownRegion("Atlantis".into()))
        );
        assert_eq!(
            roll_for_region(&tables, &catalog, "Nowhere", &RegionRequest::default(), &config),
            Err(EncounterError::EmptyRegion("Nowhere".into()))
        );
    }

    #[test]
    fn region_source_follows_request() {
        let (tables, catalog) = (fixture(), catalog());
        let config = EncounterConfig::default();
        let mut request = RegionRequest {
            party_level: 2,
            seed: Some("barrows".into()),
            ..RegionRequest::default()
        };

        let (source, _) = roll_for_region(&tables, &catalog, "Barrows", &request, &config).unwrap();
        assert_eq!(source, EncounterSource::Preset("crypt".into()));

        request.use_spawn_table = true;
        let (source, encounter) =
            roll_for_region(&tables, &catalog, "Barrows", &request, &config).unwrap();
        assert_eq!(source, EncounterSource::Table("crypt".into()));
        assert!(encounter.iter().all(|e| e.tier == Tier::Normal));
    }
}
