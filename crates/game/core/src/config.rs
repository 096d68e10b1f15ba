//! Tunable rule parameters.
//!
//! Every value has a compile-time default; hosts may override any subset
//! from a TOML file (see `stonefall-content`'s `ConfigLoader`). Missing keys
//! fall back to the defaults below.
use std::time::Duration;

use crate::encounter::Difficulty;
use crate::env::Tier;

/// Inclusive integer range used for reward rolls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardRange {
    pub min: u32,
    pub max: u32,
}

impl RewardRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Combat loop parameters (ATB pacing, AP economy, rewards).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Fill time in seconds for a DEX-20 combatant before the DEX curve applies.
    pub base_atb_seconds: f64,
    /// Hard floor for fill time regardless of DEX.
    pub min_atb_seconds: f64,
    pub base_ap_per_turn: u32,
    pub ap_carry_cap: u32,
    /// Freeze every readiness clock while a ready actor waits in the queue.
    pub pause_mode: bool,
    pub max_enemy_swings: u32,
    pub xp_reward: RewardRange,
    pub gold_reward: RewardRange,
    pub loot_chance_pct: u32,
    pub loot_item: String,
    pub flee_chance_pct: u32,
    pub crit_multiplier: f64,
    pub enemy_crit_pct: f64,
    pub enemy_turn_delay_ms: u64,
    pub reduced_motion: bool,
}

impl CombatConfig {
    pub const DEFAULT_BASE_ATB_SECONDS: f64 = 3.0;
    pub const DEFAULT_MIN_ATB_SECONDS: f64 = 2.0;
    pub const DEFAULT_BASE_AP_PER_TURN: u32 = 3;
    pub const DEFAULT_AP_CARRY_CAP: u32 = 2;
    pub const DEFAULT_MAX_ENEMY_SWINGS: u32 = 3;
    pub const DEFAULT_LOOT_ITEM: &'static str = "minor_tonic";

    pub fn new() -> Self {
        Self {
            base_atb_seconds: Self::DEFAULT_BASE_ATB_SECONDS,
            min_atb_seconds: Self::DEFAULT_MIN_ATB_SECONDS,
            base_ap_per_turn: Self::DEFAULT_BASE_AP_PER_TURN,
            ap_carry_cap: Self::DEFAULT_AP_CARRY_CAP,
            pause_mode: true,
            max_enemy_swings: Self::DEFAULT_MAX_ENEMY_SWINGS,
            xp_reward: RewardRange::new(30, 60),
            gold_reward: RewardRange::new(5, 12),
            loot_chance_pct: 30,
            loot_item: Self::DEFAULT_LOOT_ITEM.to_string(),
            flee_chance_pct: 50,
            crit_multiplier: 1.5,
            enemy_crit_pct: 5.0,
            enemy_turn_delay_ms: 260,
            reduced_motion: false,
        }
    }

    /// Largest AP pool any combatant can hold during a turn.
    pub fn max_ap(&self) -> u32 {
        self.base_ap_per_turn + self.ap_carry_cap
    }

    /// UI pacing delay before an enemy resolves its turn.
    pub fn enemy_turn_delay(&self) -> Duration {
        if self.reduced_motion {
            Duration::ZERO
        } else {
            Duration::from_millis(self.enemy_turn_delay_ms)
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Threat budget granted per party member, by difficulty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BudgetTable {
    pub easy: u32,
    pub standard: u32,
    pub hard: u32,
    pub deadly: u32,
}

impl BudgetTable {
    pub const fn per_member(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Standard => self.standard,
            Difficulty::Hard => self.hard,
            Difficulty::Deadly => self.deadly,
        }
    }
}

impl Default for BudgetTable {
    fn default() -> Self {
        Self {
            easy: 2,
            standard: 3,
            hard: 4,
            deadly: 6,
        }
    }
}

/// Encounter budgeting and selection parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncounterConfig {
    pub budget_per_member: BudgetTable,
    /// Threat weight indexed by tier ordinal - 1 (normal .. mythic).
    pub tier_weights: [f64; 5],
    /// Threat change per level of difference between enemy and party.
    pub level_step: f64,
    pub min_threat: f64,
    /// Budget overshoot allowed while the pick list is still empty.
    pub first_pick_tolerance: f64,
    pub tolerance: f64,
    pub early_stop_chance: f64,
    pub default_max_enemies: usize,
    pub table_max_enemies: usize,
    /// Probability of drawing from the cheaper half of a slot pool.
    pub cheap_half_bias: f64,
    pub slot_pick_attempts: u32,
    pub xp_per_threat: f64,
}

impl EncounterConfig {
    pub fn tier_weight(&self, tier: Tier) -> f64 {
        self.tier_weights[tier.ordinal() as usize - 1]
    }
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            budget_per_member: BudgetTable::default(),
            tier_weights: [1.0, 2.0, 4.0, 8.0, 12.0],
            level_step: 0.25,
            min_threat: 0.5,
            first_pick_tolerance: 1.25,
            tolerance: 1.05,
            early_stop_chance: 0.12,
            default_max_enemies: 5,
            table_max_enemies: 6,
            cheap_half_bias: 0.7,
            slot_pick_attempts: 5,
            xp_per_threat: 12.0,
        }
    }
}

/// Character creation and leveling parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProgressionConfig {
    pub level_cap: u32,
    pub level1_points: u32,
    pub points_per_level: u32,
    /// Cumulative XP for level n is `xp_curve_factor * n * (n - 1)`.
    pub xp_curve_factor: u32,
    pub max_party_size: usize,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            level_cap: 40,
            level1_points: 14,
            points_per_level: 4,
            xp_curve_factor: 100,
            max_party_size: 4,
        }
    }
}

/// Aggregate of every tunable rule table.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub combat: CombatConfig,
    pub encounter: EncounterConfig,
    pub progression: ProgressionConfig,
}

impl GameConfig {
    // ===== compile-time limits =====
    /// Upper bound on simultaneous status effects per combatant.
    pub const MAX_STATUS_EFFECTS: usize = 8;

    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let config = GameConfig::new();
        assert_eq!(config.combat.max_ap(), 5);
        assert_eq!(config.combat.xp_reward, RewardRange::new(30, 60));
        assert_eq!(config.encounter.budget_per_member.per_member(Difficulty::Deadly), 6);
        assert_eq!(config.encounter.tier_weight(Tier::Boss), 8.0);
        assert_eq!(config.progression.level_cap, 40);
    }

    #[test]
    fn reduced_motion_skips_enemy_delay() {
        let mut combat = CombatConfig::new();
        assert_eq!(combat.enemy_turn_delay(), Duration::from_millis(260));
        combat.reduced_motion = true;
        assert_eq!(combat.enemy_turn_delay(), Duration::ZERO);
    }
}
