//! Hand-authored spawn tables, encounter presets and regions.

use super::enemies::Tier;
use crate::encounter::Difficulty;

/// Narrative role of a spawn slot. Affects nothing but logs and previews.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SlotRole {
    Minion,
    Pack,
    Elite,
    Captain,
    Boss,
}

/// One slot of a spawn table.
///
/// When `names` is non-empty it replaces the tier/family/biome filters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnSlot {
    pub role: SlotRole,
    /// Inclusive pick-count range.
    pub count: (u32, u32),
    #[cfg_attr(feature = "serde", serde(default))]
    pub tiers: Option<Vec<Tier>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub families: Option<Vec<String>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub biomes: Option<Vec<String>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub names: Vec<String>,
    /// Fall back to a global normal-tier pick if the slot's pool is empty.
    #[cfg_attr(feature = "serde", serde(default))]
    pub require_at_least: u32,
}

/// An ordered recipe of slots.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnTable {
    pub key: String,
    pub name: String,
    pub slots: Vec<SpawnSlot>,
}

/// Default arguments for a procedural roll.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PresetDefaults {
    #[cfg_attr(feature = "serde", serde(default))]
    pub biomes: Option<Vec<String>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub families: Option<Vec<String>>,
    pub difficulty: Difficulty,
    pub max_enemies: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub allow_bosses_below_hard: bool,
}

/// Named bundle of [`PresetDefaults`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterPreset {
    pub key: String,
    pub name: String,
    pub defaults: PresetDefaults,
    /// Inclusive party-level range the preset was tuned for.
    pub recommended_levels: (u32, u32),
}

/// A world region with its encounter sources.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    pub key: String,
    pub biomes: Vec<String>,
    pub level_range: (u32, u32),
    #[cfg_attr(feature = "serde", serde(default))]
    pub presets: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub spawn_tables: Vec<String>,
}

/// Summary row for listings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    pub key: String,
    pub name: String,
}

/// Read-only access to spawn tables, presets and regions.
pub trait TablesOracle: Send + Sync {
    fn spawn_table(&self, key: &str) -> Option<&SpawnTable>;

    fn spawn_tables(&self) -> Vec<&SpawnTable>;

    fn preset(&self, key: &str) -> Option<&EncounterPreset>;

    fn presets(&self) -> Vec<&EncounterPreset>;

    fn region(&self, key: &str) -> Option<&Region>;

    fn regions(&self) -> Vec<&Region>;

    /// `(key, name)` for every spawn table.
    fn list_spawn_tables(&self) -> Vec<CatalogEntry> {
        self.spawn_tables()
            .into_iter()
            .map(|table| CatalogEntry {
                key: table.key.clone(),
                name: table.name.clone(),
            })
            .collect()
    }

    /// `(key, name)` for every preset.
    fn list_presets(&self) -> Vec<CatalogEntry> {
        self.presets()
            .into_iter()
            .map(|preset| CatalogEntry {
                key: preset.key.clone(),
                name: preset.name.clone(),
            })
            .collect()
    }
}
