//! Status effects carried by combatants.
//!
//! Durations count the holder's own turns. An effect ticks down when its
//! holder ends a turn, except on the turn it was applied, so a one-turn
//! self-buff covers the enemy turns that follow it.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::env::{BuffStat, StatChange};
use crate::stats::DerivedStats;

/// What a status does while active.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    Buff { stat: BuffStat, change: StatChange },
    Debuff { stat: BuffStat, change: StatChange },
    /// Absorbs incoming damage before HP.
    Shield { remaining: u32 },
    /// Loses `potency` HP (at least 1) at each turn start.
    Poison { potency: u32 },
    /// Discount on the next ability's AP cost.
    CostReduction { amount: u32 },
    /// Extra AP granted at the next turn start.
    BonusAp { amount: u32 },
}

impl StatusKind {
    pub fn is_harmful(&self) -> bool {
        matches!(self, Self::Debuff { .. } | Self::Poison { .. })
    }

    fn same_slot(&self, other: &Self) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }
}

/// A single status effect.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    /// Ability key that applied the effect.
    pub source: String,
    pub kind: StatusKind,
    /// Holder turn ends left before the effect expires.
    pub turns_left: u8,
    /// Session turn number on which the effect landed.
    pub applied_on_turn: u32,
}

/// Active status effects on a combatant.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { GameConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    /// Adds an effect.
    ///
    /// Re-applying the same source and kind refreshes the existing effect
    /// instead of stacking. Returns `false` when the list is full.
    pub fn add(&mut self, effect: StatusEffect) -> bool {
        if let Some(existing) = self
            .effects
            .iter_mut()
            .find(|e| e.source == effect.source && e.kind.same_slot(&effect.kind))
        {
            *existing = effect;
            return true;
        }
        self.effects.try_push(effect).is_ok()
    }

    /// Applies buff/debuff modifiers to derived DEF, RES and attack.
    pub fn modify(&self, mut stats: DerivedStats) -> DerivedStats {
        for change in self.changes(BuffStat::Defense) {
            stats.def = change.apply(stats.def);
        }
        for change in self.changes(BuffStat::Resist) {
            stats.res = change.apply(stats.res);
        }
        for change in self.changes(BuffStat::Attack) {
            stats.p_atk = change.apply(f64::from(stats.p_atk)).round() as i32;
            stats.m_atk = change.apply(f64::from(stats.m_atk)).round() as i32;
        }
        stats
    }

    /// DEX after dexterity modifiers.
    pub fn dexterity(&self, base: i32) -> i32 {
        self.changes(BuffStat::Dexterity)
            .fold(f64::from(base), |dex, change| change.apply(dex))
            .round() as i32
    }

    /// Multiplier on readiness fill time (1.0 when unmodified).
    pub fn atb_scale(&self) -> f64 {
        self.changes(BuffStat::AtbTime)
            .fold(1.0, |scale, change| change.apply(scale))
            .max(0.1)
    }

    /// Percent chance for incoming basic attacks to miss.
    pub fn evasion_pct(&self) -> f64 {
        self.changes(BuffStat::Evasion)
            .fold(0.0, |pct, change| change.apply(pct))
            .clamp(0.0, 100.0)
    }

    /// Runs `damage` through shields; returns `(absorbed, remaining)`.
    pub fn absorb(&mut self, damage: u32) -> (u32, u32) {
        let mut remaining = damage;
        for effect in &mut self.effects {
            if remaining == 0 {
                break;
            }
            if let StatusKind::Shield { remaining: shield } = &mut effect.kind {
                let soaked = (*shield).min(remaining);
                *shield -= soaked;
                remaining -= soaked;
            }
        }
        self.effects
            .retain(|e| !matches!(e.kind, StatusKind::Shield { remaining: 0 }));
        (damage - remaining, remaining)
    }

    pub fn shield_total(&self) -> u32 {
        self.effects
            .iter()
            .map(|e| match e.kind {
                StatusKind::Shield { remaining } => remaining,
                _ => 0,
            })
            .sum()
    }

    /// Poison damage due at turn start, or `None` when not poisoned.
    pub fn poison_tick(&self) -> Option<u32> {
        let mut poisoned = false;
        let total: u32 = self
            .effects
            .iter()
            .filter_map(|e| match e.kind {
                StatusKind::Poison { potency } => {
                    poisoned = true;
                    Some(potency)
                }
                _ => None,
            })
            .sum();
        poisoned.then_some(total.max(1))
    }

    /// Removes and sums every pending cost reduction.
    pub fn take_cost_reduction(&mut self) -> u32 {
        self.take(|kind| match kind {
            StatusKind::CostReduction { amount } => Some(*amount),
            _ => None,
        })
    }

    /// Peeks the pending cost reduction without consuming it.
    pub fn cost_reduction(&self) -> u32 {
        self.effects
            .iter()
            .map(|e| match e.kind {
                StatusKind::CostReduction { amount } => amount,
                _ => 0,
            })
            .sum()
    }

    /// Removes and sums every pending bonus AP grant.
    pub fn take_bonus_ap(&mut self) -> u32 {
        self.take(|kind| match kind {
            StatusKind::BonusAp { amount } => Some(*amount),
            _ => None,
        })
    }

    /// Ticks durations at the holder's turn end.
    ///
    /// Effects applied on `current_turn` are skipped. Returns the sources of
    /// effects that expired.
    pub fn expire(&mut self, current_turn: u32) -> Vec<String> {
        let mut expired = Vec::new();
        for effect in &mut self.effects {
            if effect.applied_on_turn == current_turn {
                continue;
            }
            effect.turns_left = effect.turns_left.saturating_sub(1);
            if effect.turns_left == 0 {
                expired.push(effect.source.clone());
            }
        }
        self.effects.retain(|e| e.turns_left > 0);
        expired
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    fn changes(&self, stat: BuffStat) -> impl Iterator<Item = StatChange> + '_ {
        self.effects.iter().filter_map(move |e| match e.kind {
            StatusKind::Buff { stat: s, change } | StatusKind::Debuff { stat: s, change }
                if s == stat =>
            {
                Some(change)
            }
            _ => None,
        })
    }

    fn take(&mut self, pick: impl Fn(&StatusKind) -> Option<u32>) -> u32 {
        let total = self.effects.iter().filter_map(|e| pick(&e.kind)).sum();
        self.effects.retain(|e| pick(&e.kind).is_none());
        total
    }
}
