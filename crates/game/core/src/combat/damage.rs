//! Damage helpers and crit rolls.
//!
//! # Formula
//!
//! ```text
//! raw    = attack × power − defense
//! damage = max(1, floor(raw × uniform(0.95, 1.05)))
//!
//! if critical:
//!     damage = max(1, floor(damage × crit_multiplier))
//! ```
//!
//! Damage never drops below 1, so pure defense scaling cannot stall a fight.

use rand::Rng;

use crate::env::DamageKind;
use crate::stats::DerivedStats;

/// Lower bound of the damage variance roll.
pub const VARIANCE_MIN: f64 = 0.95;
/// Upper bound of the damage variance roll.
pub const VARIANCE_MAX: f64 = 1.05;

/// Resolved damage of one hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hit {
    pub damage: u32,
    pub critical: bool,
}

/// PAtk against DEF.
pub fn physical_damage<R: Rng + ?Sized>(p_atk: f64, def: f64, power: f64, rng: &mut R) -> u32 {
    scaled(p_atk, def, power, rng)
}

/// MAtk against RES.
pub fn magical_damage<R: Rng + ?Sized>(m_atk: f64, res: f64, power: f64, rng: &mut R) -> u32 {
    scaled(m_atk, res, power, rng)
}

/// Picks the physical or magical helper from the attacker/defender stats.
pub fn damage_for<R: Rng + ?Sized>(
    kind: DamageKind,
    attacker: &DerivedStats,
    defender: &DerivedStats,
    power: f64,
    rng: &mut R,
) -> u32 {
    match kind {
        DamageKind::Physical => {
            physical_damage(f64::from(attacker.p_atk), defender.def, power, rng)
        }
        DamageKind::Magical => magical_damage(f64::from(attacker.m_atk), defender.res, power, rng),
    }
}

/// Rolls a crit against a percentage chance.
pub fn roll_crit<R: Rng + ?Sized>(crit_pct: f64, rng: &mut R) -> bool {
    rng.gen_bool((crit_pct / 100.0).clamp(0.0, 1.0))
}

/// Applies the flat crit multiplier after the base roll.
pub fn apply_crit(damage: u32, multiplier: f64) -> u32 {
    (f64::from(damage) * multiplier).floor().max(1.0) as u32
}

/// Base roll plus crit check in one step.
pub fn strike<R: Rng + ?Sized>(
    base: u32,
    crit_pct: f64,
    crit_multiplier: f64,
    rng: &mut R,
) -> Hit {
    let critical = roll_crit(crit_pct, rng);
    let damage = if critical {
        apply_crit(base, crit_multiplier)
    } else {
        base.max(1)
    };
    Hit { damage, critical }
}

fn scaled<R: Rng + ?Sized>(attack: f64, defense: f64, power: f64, rng: &mut R) -> u32 {
    let variance = rng.gen_range(VARIANCE_MIN..=VARIANCE_MAX);
    let raw = (attack * power - defense) * variance;
    raw.floor().max(1.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::PcgRng;

    #[test]
    fn damage_is_at_least_one() {
        let mut rng = PcgRng::new(11);
        for attack in [-50.0, 0.0, 1.0, 5.0] {
            for defense in [0.0, 10.0, 500.0] {
                assert!(physical_damage(attack, defense, 1.0, &mut rng) >= 1);
                assert!(magical_damage(attack, defense, 0.5, &mut rng) >= 1);
            }
        }
    }

    #[test]
    fn variance_stays_in_band() {
        let mut rng = PcgRng::new(3);
        for _ in 0..500 {
            let damage = physical_damage(120.0, 20.0, 1.0, &mut rng);
            assert!((94..=105).contains(&damage), "{damage}");
        }
    }

    #[test]
    fn power_scales_attack_before_defense() {
        let mut rng = PcgRng::new(5);
        for _ in 0..100 {
            let damage = physical_damage(100.0, 50.0, 2.0, &mut rng);
            assert!((142..=157).contains(&damage));
        }
    }

    #[test]
    fn crit_multiplies_after_roll() {
        assert_eq!(apply_crit(10, 1.5), 15);
        assert_eq!(apply_crit(1, 1.5), 1);
        assert_eq!(apply_crit(3, 1.5), 4);

        let mut rng = PcgRng::new(1);
        assert!(!roll_crit(0.0, &mut rng));
        assert!(roll_crit(100.0, &mut rng));
        assert!(roll_crit(250.0, &mut rng));
        assert_eq!(strike(8, 100.0, 1.5, &mut rng), Hit { damage: 12, critical: true });
        assert_eq!(strike(8, 0.0, 1.5, &mut rng), Hit { damage: 8, critical: false });
    }
}
