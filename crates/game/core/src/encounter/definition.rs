//! Encounter definitions: the builders' output, before instantiation.

use std::collections::BTreeMap;

use super::difficulty::threat_for;
use crate::combat::EnemyInstance;
use crate::config::{CombatConfig, EncounterConfig, RewardRange};
use crate::env::{EnemyArchetype, Tier};

/// Ordered list of archetypes produced by a builder.
///
/// Pure data: replayable, inspectable and serializable for a pre-battle
/// preview. Instances with mutable HP come from [`Self::instantiate`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterDefinition {
    pub enemies: Vec<EnemyArchetype>,
}

/// One grouped row of a preview.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollapsedEntry {
    pub key: String,
    pub count: u32,
    pub tier: Tier,
    pub level: u32,
    pub emoji: String,
}

/// What the party sees before committing to a fight.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterPreview {
    pub rows: Vec<CollapsedEntry>,
    pub total_enemies: usize,
    pub xp_range: RewardRange,
    pub gold_range: RewardRange,
    /// Threat-based XP estimate for the encounter.
    pub threat_xp: u32,
}

impl EncounterDefinition {
    pub fn new(enemies: Vec<EnemyArchetype>) -> Self {
        Self { enemies }
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnemyArchetype> {
        self.enemies.iter()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.enemies.iter().map(|enemy| enemy.key.as_str()).collect()
    }

    /// Number of boss-tier-or-above enemies.
    pub fn boss_count(&self) -> usize {
        self.enemies
            .iter()
            .filter(|enemy| enemy.tier.is_boss_or_above())
            .count()
    }

    /// Groups enemies by key, sorted by key.
    pub fn collapse(&self) -> Vec<CollapsedEntry> {
        let mut grouped: BTreeMap<&str, CollapsedEntry> = BTreeMap::new();
        for enemy in &self.enemies {
            grouped
                .entry(enemy.key.as_str())
                .or_insert_with(|| CollapsedEntry {
                    key: enemy.key.clone(),
                    count: 0,
                    tier: enemy.tier,
                    level: enemy.level,
                    emoji: enemy.emoji.clone(),
                })
                .count += 1;
        }
        grouped.into_values().collect()
    }

    /// Σ round(xp_per_threat × threat) over every enemy.
    pub fn xp_for(&self, party_level: u32, config: &EncounterConfig) -> u32 {
        self.enemies
            .iter()
            .map(|enemy| {
                (config.xp_per_threat * threat_for(enemy, party_level, config)).round() as u32
            })
            .sum()
    }

    /// Creates combat-ready instances with unique ids (`foe_<slug>_<index>`).
    pub fn instantiate(&self) -> Vec<EnemyInstance> {
        self.enemies
            .iter()
            .enumerate()
            .map(|(index, archetype)| EnemyInstance::from_archetype(archetype, index))
            .collect()
    }

    pub fn preview(
        &self,
        party_level: u32,
        combat: &CombatConfig,
        encounter: &EncounterConfig,
    ) -> EncounterPreview {
        EncounterPreview {
            rows: self.collapse(),
            total_enemies: self.len(),
            xp_range: combat.xp_reward,
            gold_range: combat.gold_reward,
            threat_xp: self.xp_for(party_level, encounter),
        }
    }
}

impl FromIterator<EnemyArchetype> for EncounterDefinition {
    fn from_iter<I: IntoIterator<Item = EnemyArchetype>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
