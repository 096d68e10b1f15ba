//! Derived combat stats.
//!
//! Pure functions of (attributes, gear, class HP baseline). Never stored
//! canonically: characters cache the result and invalidate it whenever
//! attributes, level or equipment change.

use super::attributes::AttributeBlock;
use super::gear::GearModifiers;

/// Crit chance cap in percent.
pub const CRIT_CAP_PCT: f64 = 40.0;
/// Status resistance cap in percent.
pub const STATUS_RESIST_CAP_PCT: f64 = 60.0;
/// HP baseline used when no class baseline is known.
pub const DEFAULT_BASE_HP: u32 = 100;

/// Combat-ready numbers computed from an attribute block.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedStats {
    pub hp: u32,
    pub p_atk: i32,
    pub m_atk: i32,
    pub def: f64,
    pub res: f64,
    pub crit_pct: f64,
    pub status_apply_scalar: f64,
    pub status_resist_pct: f64,
}

impl DerivedStats {
    /// Computes derived stats.
    ///
    /// Formulas:
    /// - HP: baseHP + CON×6 + STR×2
    /// - PAtk: weapon + STR×2, MAtk: focus + INT×2
    /// - DEF: armor + CON×0.5 + DEX×0.3 + block (1 decimal)
    /// - RES: ward + WIS×0.5 + CON×0.3 (1 decimal)
    /// - crit%: min(40, DEX×0.3 + LCK×0.4) (1 decimal)
    /// - status scalar: 1 + INT/100 + WIS/150 (2 decimals)
    /// - status resist%: min(60, LCK×0.4)
    ///
    /// Readiness time depends on the combat config and lives in
    /// [`atb_seconds`].
    pub fn derive(attributes: &AttributeBlock, gear: &GearModifiers, base_hp: u32) -> Self {
        let str = f64::from(attributes.str());
        let dex = f64::from(attributes.dex());
        let con = f64::from(attributes.con());
        let int = f64::from(attributes.int());
        let wis = f64::from(attributes.wis());
        let lck = f64::from(attributes.lck());

        let hp = (f64::from(base_hp) + con * 6.0 + str * 2.0).floor().max(1.0) as u32;
        let crit = round_to(dex * 0.3 + lck * 0.4 + gear.crit, 1);

        Self {
            hp,
            p_atk: gear.weapon + attributes.str() * 2,
            m_atk: gear.focus + attributes.int() * 2,
            def: round_to(gear.armor + con * 0.5 + dex * 0.3 + gear.block, 1),
            res: round_to(gear.ward + wis * 0.5 + con * 0.3, 1),
            crit_pct: crit.min(CRIT_CAP_PCT),
            status_apply_scalar: round_to(1.0 + int / 100.0 + wis / 150.0, 2),
            status_resist_pct: round_to(lck * 0.4, 1).min(STATUS_RESIST_CAP_PCT),
        }
    }
}

/// Readiness fill time for a given DEX.
///
/// `max(floor, base × 100 / (80 + DEX))`, rounded to 2 decimals. Higher DEX
/// fills faster; the floor bounds it from below. DEX is clamped at 0 so
/// debuffs can't push the divisor negative.
pub fn atb_seconds(dex: i32, base: f64, floor: f64) -> f64 {
    let dex = f64::from(dex.max(0));
    round_to(base * 100.0 / (80.0 + dex), 2).max(floor)
}

/// Rounds half away from zero to `decimals` places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_one_baseline() {
        let derived = DerivedStats::derive(
            &AttributeBlock::starting(),
            &GearModifiers::none(),
            DEFAULT_BASE_HP,
        );
        assert_eq!(derived.hp, 180);
        assert_eq!(derived.p_atk, 20);
        assert_eq!(derived.m_atk, 20);
        assert_eq!(derived.def, 8.0);
        assert_eq!(derived.res, 8.0);
        assert_eq!(derived.crit_pct, 7.0);
        assert_eq!(derived.status_apply_scalar, 1.17);
        assert_eq!(derived.status_resist_pct, 4.0);
    }

    #[test]
    fn gear_feeds_attack_and_defense() {
        let gear = GearModifiers {
            weapon: 3,
            focus: 2,
            armor: 4.0,
            block: 1.0,
            ward: 2.5,
            crit: 0.0,
        };
        let derived = DerivedStats::derive(&AttributeBlock::starting(), &gear, 120);
        assert_eq!(derived.hp, 200);
        assert_eq!(derived.p_atk, 23);
        assert_eq!(derived.m_atk, 22);
        assert_eq!(derived.def, 13.0);
        assert_eq!(derived.res, 10.5);
    }

    #[test]
    fn caps_hold_across_the_attribute_band() {
        for dex in (10..=60).step_by(5) {
            for lck in (10..=60).step_by(5) {
                for con in [10, 35, 60] {
                    let block = AttributeBlock::new(10, dex, con, 10, 10, lck);
                    let derived = DerivedStats::derive(&block, &GearModifiers::none(), 0);
                    assert!(derived.crit_pct <= CRIT_CAP_PCT);
                    assert!(derived.status_resist_pct <= STATUS_RESIST_CAP_PCT);
                    assert!(derived.hp >= 1);
                }
            }
        }

        let maxed = DerivedStats::derive(&AttributeBlock::uniform(60), &GearModifiers::none(), 0);
        assert_eq!(maxed.crit_pct, 40.0);
        assert_eq!(maxed.status_resist_pct, 24.0);
    }

    #[test]
    fn atb_time_shrinks_with_dex_and_respects_floor() {
        assert_eq!(atb_seconds(10, 3.0, 2.0), 3.33);
        assert_eq!(atb_seconds(40, 3.0, 2.0), 2.5);
        assert_eq!(atb_seconds(60, 3.0, 2.0), 2.14);
        assert_eq!(atb_seconds(200, 3.0, 2.0), 2.0);
        assert!(atb_seconds(20, 3.0, 2.0) < atb_seconds(10, 3.0, 2.0));
    }
}
