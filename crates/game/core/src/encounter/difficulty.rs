//! Difficulty, budget and threat model.

use crate::config::EncounterConfig;
use crate::env::EnemyArchetype;
use crate::stats::derived::round_to;

/// Encounter difficulty setting.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Difficulty {
    Easy,
    #[default]
    Standard,
    Hard,
    Deadly,
}

impl Difficulty {
    /// Easy and standard rolls strip boss/mythic tiers unless overridden.
    pub const fn is_easy_or_standard(self) -> bool {
        matches!(self, Self::Easy | Self::Standard)
    }
}

/// Total threat capacity: `max(1, round(per_member[difficulty] × party_size))`.
pub fn budget_for(party_size: u32, difficulty: Difficulty, config: &EncounterConfig) -> u32 {
    let per_member = config.budget_per_member.per_member(difficulty);
    per_member.saturating_mul(party_size).max(1)
}

/// Cost of an enemy relative to the party.
///
/// `max(min_threat, tier_weight × (1 + step × (enemy_level − party_level)))`,
/// rounded to 2 decimals. Under-leveled trash is cheap, over-leveled picks
/// are expensive, and nothing is free.
pub fn threat_for(enemy: &EnemyArchetype, party_level: u32, config: &EncounterConfig) -> f64 {
    let base = config.tier_weight(enemy.tier);
    let delta = f64::from(enemy.level) - f64::from(party_level);
    let scaled = round_to(base * (1.0 + config.level_step * delta), 2);
    scaled.max(config.min_threat)
}
