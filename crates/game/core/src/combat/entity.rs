//! Combatants: the shared capability interface plus enemy instances.

use std::collections::BTreeMap;

use super::status::StatusEffects;
use crate::config::CombatConfig;
use crate::env::{AiBehavior, DamageRange, EnemyArchetype, Tier};
use crate::party::MemberId;
use crate::stats::{DerivedStats, atb_seconds};

/// Identifies a combatant inside one session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatantId {
    Ally(MemberId),
    /// Index into the session's enemy list.
    Enemy(usize),
}

impl CombatantId {
    pub const fn is_ally(&self) -> bool {
        matches!(self, Self::Ally(_))
    }

    pub const fn is_enemy(&self) -> bool {
        matches!(self, Self::Enemy(_))
    }
}

impl core::fmt::Display for CombatantId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Ally(id) => write!(f, "ally{id}"),
            Self::Enemy(index) => write!(f, "enemy#{index}"),
        }
    }
}

/// Per-fight runtime fields carried by every combatant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatState {
    /// AP left in the current turn.
    pub ap: u32,
    /// AP banked for the next turn.
    pub carried_ap: u32,
    pub carry_cap: u32,
    pub statuses: StatusEffects,
    /// Remaining owner turns per ability key.
    pub cooldowns: BTreeMap<String, u8>,
}

impl CombatState {
    pub fn new(carry_cap: u32) -> Self {
        Self {
            ap: 0,
            carried_ap: 0,
            carry_cap,
            statuses: StatusEffects::empty(),
            cooldowns: BTreeMap::new(),
        }
    }

    pub fn cooldown(&self, key: &str) -> u8 {
        self.cooldowns.get(key).copied().unwrap_or(0)
    }

    pub fn start_cooldown(&mut self, key: &str, turns: u8) {
        if turns > 0 {
            self.cooldowns.insert(key.to_string(), turns);
        }
    }

    /// Decrements every running cooldown by one turn.
    pub fn tick_cooldowns(&mut self) {
        for turns in self.cooldowns.values_mut() {
            *turns = turns.saturating_sub(1);
        }
        self.cooldowns.retain(|_, turns| *turns > 0);
    }

    /// Clears up to `max` running cooldowns in key order; returns how many.
    pub fn reset_cooldowns(&mut self, max: u32) -> u32 {
        let keys: Vec<String> = self.cooldowns.keys().take(max as usize).cloned().collect();
        for key in &keys {
            self.cooldowns.remove(key);
        }
        keys.len() as u32
    }
}

impl Default for CombatState {
    fn default() -> Self {
        Self::new(CombatConfig::DEFAULT_AP_CARRY_CAP)
    }
}

/// Damage after shields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageTaken {
    pub absorbed: u32,
    /// HP actually lost.
    pub lost: u32,
}

/// Capability interface shared by allies and enemies.
///
/// The scheduler and the resolution loop treat both sides through this
/// trait; nothing outside the session cares which side an entity is on.
pub trait Combatant {
    fn display_name(&self) -> &str;

    /// Derived stats before status modifiers.
    fn base_stats(&self) -> DerivedStats;

    fn hp(&self) -> u32;

    fn max_hp(&self) -> u32;

    /// Sets HP; implementors clamp into `[0, max_hp]`.
    fn set_hp(&mut self, hp: u32);

    /// DEX that drives the readiness clock.
    fn pace_dexterity(&self) -> i32;

    fn state(&self) -> &CombatState;

    fn state_mut(&mut self) -> &mut CombatState;

    fn is_alive(&self) -> bool {
        self.hp() > 0
    }

    fn effective_stats(&self) -> DerivedStats {
        self.state().statuses.modify(self.base_stats())
    }

    /// Live readiness threshold in seconds. Recomputed on every call so
    /// DEX buffs land immediately.
    fn atb_threshold(&self, config: &CombatConfig) -> f64 {
        let statuses = &self.state().statuses;
        let dex = statuses.dexterity(self.pace_dexterity());
        atb_seconds(dex, config.base_atb_seconds, config.min_atb_seconds) * statuses.atb_scale()
    }

    /// Routes damage through shields, then HP.
    fn apply_damage(&mut self, amount: u32) -> DamageTaken {
        let (absorbed, remaining) = self.state_mut().statuses.absorb(amount);
        let before = self.hp();
        self.set_hp(before.saturating_sub(remaining));
        DamageTaken {
            absorbed,
            lost: before - self.hp(),
        }
    }

    /// Heals without overhealing; returns the HP actually restored.
    fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp();
        self.set_hp(before.saturating_add(amount).min(self.max_hp()));
        self.hp() - before
    }
}

/// A live enemy, owned by one combat session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyInstance {
    pub instance_id: String,
    pub key: String,
    pub family: String,
    pub tier: Tier,
    pub level: u32,
    pub hp_current: u32,
    pub hp_max: u32,
    pub atk: i32,
    pub def: i32,
    pub damage: DamageRange,
    pub ai: AiBehavior,
    pub emoji: String,
    pub combat: CombatState,
}

impl EnemyInstance {
    /// Instantiates `archetype` as the `index`-th enemy of an encounter.
    pub fn from_archetype(archetype: &EnemyArchetype, index: usize) -> Self {
        let hp = archetype.hp.max(1);
        Self {
            instance_id: format!("foe_{}_{index}", slug(&archetype.key)),
            key: archetype.key.clone(),
            family: archetype.family.clone(),
            tier: archetype.tier,
            level: archetype.level,
            hp_current: hp,
            hp_max: hp,
            atk: archetype.atk,
            def: archetype.def,
            damage: archetype.damage,
            ai: archetype.ai,
            emoji: archetype.emoji.clone(),
            combat: CombatState::default(),
        }
    }

    /// Pacing DEX: `10 + min(20, round(level × 1.5))`.
    pub fn pace_dex(level: u32) -> i32 {
        let scaled = (f64::from(level.max(1)) * 1.5).round() as i32;
        10 + scaled.min(20)
    }
}

impl Combatant for EnemyInstance {
    fn display_name(&self) -> &str {
        &self.key
    }

    fn base_stats(&self) -> DerivedStats {
        let def = f64::from(self.def);
        DerivedStats {
            hp: self.hp_max,
            p_atk: self.atk,
            m_atk: self.atk,
            def,
            res: def,
            crit_pct: 0.0,
            status_apply_scalar: 1.0,
            status_resist_pct: 0.0,
        }
    }

    fn hp(&self) -> u32 {
        self.hp_current
    }

    fn max_hp(&self) -> u32 {
        self.hp_max
    }

    fn set_hp(&mut self, hp: u32) {
        self.hp_current = hp.min(self.hp_max);
    }

    fn pace_dexterity(&self) -> i32 {
        Self::pace_dex(self.level)
    }

    fn state(&self) -> &CombatState {
        &self.combat
    }

    fn state_mut(&mut self) -> &mut CombatState {
        &mut self.combat
    }
}

/// Lowercases and replaces every non-alphanumeric run with `-`.
fn slug(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for ch in key.chars().map(|ch| ch.to_ascii_lowercase()) {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out
}
