//! Declarative ability catalog.
//!
//! An ability is a cost, a target selector and a list of effects. The combat
//! resolver interprets the effects generically; nothing dispatches on an
//! ability's name.

use crate::party::Class;
use crate::stats::{Attribute, AttributeBlock};

/// Which damage helper an effect uses.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DamageKind {
    /// PAtk against DEF.
    Physical,
    /// MAtk against RES.
    Magical,
}

/// Who an ability lands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TargetSelector {
    Caster,
    /// One living ally, chosen by the player.
    Ally,
    /// One living enemy, chosen by the player.
    Enemy,
    AllAllies,
    AllEnemies,
    /// The chosen enemy plus the next living enemies in formation order, up
    /// to this many in total.
    EnemyLine(u8),
}

impl TargetSelector {
    /// Whether the player must name a target.
    pub const fn needs_target(&self) -> bool {
        matches!(self, Self::Ally | Self::Enemy | Self::EnemyLine(_))
    }

    pub const fn hits_enemies(&self) -> bool {
        matches!(self, Self::Enemy | Self::AllEnemies | Self::EnemyLine(_))
    }
}

/// `flat + attribute × ratio`, floored.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scaling {
    pub from: Attribute,
    pub ratio: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flat: f64,
}

impl Scaling {
    pub fn amount(&self, attributes: &AttributeBlock) -> u32 {
        let raw = self.flat + f64::from(attributes.get(self.from)) * self.ratio;
        raw.floor().max(0.0) as u32
    }
}

/// Stat touched by a buff or debuff.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BuffStat {
    Defense,
    Resist,
    /// Both PAtk and MAtk.
    Attack,
    /// Feeds the live readiness threshold.
    Dexterity,
    /// Multiplies the readiness fill time directly.
    AtbTime,
    /// Chance in percent for incoming basic attacks to miss.
    Evasion,
}

/// How a modifier changes its stat.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatChange {
    /// `value × (1 + pct/100)`
    Percent(f64),
    /// `value + amount`
    Flat(f64),
}

impl StatChange {
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Self::Percent(pct) => value * (1.0 + pct / 100.0),
            Self::Flat(amount) => value + amount,
        }
    }
}

/// One declarative effect of an ability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AbilityEffect {
    /// Damage through the physical/magical helper with a power multiplier.
    Damage { kind: DamageKind, power: f64 },
    Heal { scaling: Scaling },
    /// Absorbs incoming damage until depleted or expired.
    Shield { scaling: Scaling, duration: u8 },
    Buff { stat: BuffStat, change: StatChange, duration: u8 },
    Debuff { stat: BuffStat, change: StatChange, duration: u8 },
    /// Damage over time, ticking at the holder's turn start.
    Poison { chance_pct: f64, potency: u32, duration: u8 },
    /// Extra crit chance for this ability's damage effects.
    CritBonus { pct: f64 },
    /// Extra AP at the holder's next turn start (still bounded by max AP).
    GainNextTurnAp { amount: u32 },
    /// Next ability the holder uses costs this much less.
    CostReduction { amount: u32 },
    /// Clears up to `max` running cooldowns on the target.
    ResetCooldowns { max: u32 },
}

/// An ability definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityDefinition {
    pub key: String,
    pub name: String,
    pub classes: Vec<Class>,
    /// Character level at which the ability unlocks.
    pub unlock_level: u32,
    pub ap_cost: u32,
    /// Owner turns before the ability can be used again.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: u8,
    pub target: TargetSelector,
    pub effects: Vec<AbilityEffect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
}

impl AbilityDefinition {
    pub fn usable_by(&self, class: Class, level: u32) -> bool {
        self.classes.contains(&class) && level >= self.unlock_level
    }

    /// Sum of every crit bonus effect.
    pub fn crit_bonus(&self) -> f64 {
        self.effects
            .iter()
            .map(|effect| match effect {
                AbilityEffect::CritBonus { pct } => *pct,
                _ => 0.0,
            })
            .sum()
    }
}

/// Read-only access to the ability catalog.
pub trait AbilityOracle: Send + Sync {
    fn ability(&self, key: &str) -> Option<&AbilityDefinition>;

    fn abilities(&self) -> Vec<&AbilityDefinition>;

    /// Abilities a class has unlocked at `level`, in catalog order.
    fn abilities_for(&self, class: Class, level: u32) -> Vec<&AbilityDefinition> {
        self.abilities()
            .into_iter()
            .filter(|ability| ability.usable_by(class, level))
            .collect()
    }
}

impl AbilityOracle for Vec<AbilityDefinition> {
    fn ability(&self, key: &str) -> Option<&AbilityDefinition> {
        self.iter().find(|ability| ability.key == key)
    }

    fn abilities(&self) -> Vec<&AbilityDefinition> {
        self.iter().collect()
    }
}
