//! Victory rewards and the post-battle summary.

use std::collections::BTreeMap;

use rand::Rng;

use super::entity::CombatantId;
use super::events::CombatOutcome;
use crate::config::{CombatConfig, RewardRange};
use crate::party::{MemberId, XpGain};

/// Per-member tallies accumulated during one session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemberStats {
    pub dealt: u32,
    pub taken: u32,
    pub heal_given: u32,
    pub heal_received: u32,
}

/// Tallies keyed by party member. Enemies are not tracked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatsLedger {
    members: BTreeMap<MemberId, MemberStats>,
}

impl StatsLedger {
    pub fn new(members: impl IntoIterator<Item = MemberId>) -> Self {
        Self {
            members: members
                .into_iter()
                .map(|id| (id, MemberStats::default()))
                .collect(),
        }
    }

    /// Records HP lost to a hit; `source` is `None` for damage over time.
    pub fn damage(&mut self, source: Option<CombatantId>, target: CombatantId, amount: u32) {
        if let Some(CombatantId::Ally(id)) = source {
            if let Some(stats) = self.members.get_mut(&id) {
                stats.dealt += amount;
            }
        }
        if let CombatantId::Ally(id) = target {
            if let Some(stats) = self.members.get_mut(&id) {
                stats.taken += amount;
            }
        }
    }

    pub fn heal(&mut self, source: MemberId, target: MemberId, amount: u32) {
        if let Some(stats) = self.members.get_mut(&source) {
            stats.heal_given += amount;
        }
        if let Some(stats) = self.members.get_mut(&target) {
            stats.heal_received += amount;
        }
    }

    pub fn get(&self, id: MemberId) -> MemberStats {
        self.members.get(&id).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MemberId, MemberStats)> + '_ {
        self.members.iter().map(|(id, stats)| (*id, *stats))
    }
}

/// Rolled victory rewards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rewards {
    pub xp: u32,
    pub gold: u32,
    /// Item IDs granted, one entry per unit.
    pub loot: Vec<String>,
}

impl Rewards {
    /// XP and gold from their uniform ranges plus a flat loot chance.
    pub fn roll<R: Rng + ?Sized>(config: &CombatConfig, rng: &mut R) -> Self {
        let xp = roll_range(config.xp_reward, rng);
        let gold = roll_range(config.gold_reward, rng);
        let mut loot = Vec::new();
        if rng.gen_range(1..=100) <= config.loot_chance_pct {
            loot.push(config.loot_item.clone());
        }
        Self { xp, gold, loot }
    }
}

fn roll_range<R: Rng + ?Sized>(range: RewardRange, rng: &mut R) -> u32 {
    if range.min >= range.max {
        return range.min;
    }
    rng.gen_range(range.min..=range.max)
}

/// One row of the post-battle summary.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemberSummary {
    pub id: MemberId,
    pub name: String,
    pub stats: MemberStats,
    pub level_up: Option<XpGain>,
}

/// End-of-combat record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSummary {
    pub outcome: CombatOutcome,
    /// Present on victory only.
    pub rewards: Option<Rewards>,
    pub turns: u32,
    pub members: Vec<MemberSummary>,
}

impl BattleSummary {
    pub fn xp_gained(&self) -> u32 {
        self.rewards.as_ref().map_or(0, |r| r.xp)
    }

    pub fn gold_gained(&self) -> u32 {
        self.rewards.as_ref().map_or(0, |r| r.gold)
    }

    pub fn loot(&self) -> &[String] {
        self.rewards
            .as_ref()
            .map(|r| r.loot.as_slice())
            .unwrap_or_default()
    }
}
