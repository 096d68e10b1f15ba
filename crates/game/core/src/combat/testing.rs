//! Shared fixtures for combat unit tests.

use rand::RngCore;

use super::entity::EnemyInstance;
use crate::config::ProgressionConfig;
use crate::env::{
    AbilityDefinition, AbilityEffect, AbilityOracle, BuffStat, ConsumableEffect, DamageKind,
    GameEnv, ItemDefinition, ItemKind, ItemOracle, Scaling, StatChange, TargetSelector, Tier,
    fixtures::archetype,
};
use crate::party::{Class, Party, Race};
use crate::stats::Attribute;

/// Rng that returns the same word forever.
///
/// `FixedRng(0)` makes `gen_range` return its low bound and `gen_bool(p)`
/// succeed for any `p > 0`. `FixedRng(u64::MAX)` fails every `gen_bool(p)`
/// with `p < 1`; only use it on paths that never call `gen_range`.
#[derive(Clone, Copy, Debug)]
pub struct FixedRng(pub u64);

impl RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 {
        self.0 as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let bytes = self.0.to_le_bytes();
        for (i, byte) in dest.iter_mut().enumerate() {
            *byte = bytes[i % 8];
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Human warriors (every attribute 12): 216 HP, PAtk 24, DEF 9.6, crit 8.4%.
pub fn arena(size: usize) -> Party {
    let progression = ProgressionConfig::default();
    let mut party = Party::new(&progression);
    for name in ["Aria", "Bram", "Cora", "Dane"].into_iter().take(size) {
        party
            .recruit(name, Race::Human, Class::Warrior, &progression)
            .unwrap();
    }
    party
}

/// Level-1 enemy (pace DEX 12, ATK 3, DEF 10) with the given HP.
pub fn enemy(key: &str, tier: Tier, hp: u32) -> EnemyInstance {
    let mut enemy = EnemyInstance::from_archetype(&archetype(key, "Beast", tier, 1, &[]), 0);
    enemy.hp_max = hp;
    enemy.hp_current = hp;
    enemy
}

fn ability(
    key: &str,
    classes: &[Class],
    ap_cost: u32,
    cooldown: u8,
    target: TargetSelector,
    effects: Vec<AbilityEffect>,
) -> AbilityDefinition {
    AbilityDefinition {
        key: key.to_string(),
        name: key.to_string(),
        classes: classes.to_vec(),
        unlock_level: 1,
        ap_cost,
        cooldown,
        target,
        effects,
        description: String::new(),
    }
}

/// A handful of abilities covering every effect kind, plus two items.
pub fn fixtures() -> (Vec<AbilityDefinition>, Vec<ItemDefinition>) {
    let everyone = [Class::Warrior, Class::Cleric];
    let abilities = vec![
        ability(
            "power_strike",
            &everyone,
            2,
            2,
            TargetSelector::Enemy,
            vec![
                AbilityEffect::Damage {
                    kind: DamageKind::Physical,
                    power: 1.5,
                },
                AbilityEffect::CritBonus { pct: 10.0 },
            ],
        ),
        ability(
            "cleave",
            &everyone,
            2,
            0,
            TargetSelector::EnemyLine(2),
            vec![AbilityEffect::Damage {
                kind: DamageKind::Physical,
                power: 1.0,
            }],
        ),
        ability(
            "mend",
            &everyone,
            1,
            0,
            TargetSelector::Ally,
            vec![AbilityEffect::Heal {
                scaling: Scaling {
                    from: Attribute::Wis,
                    ratio: 1.0,
                    flat: 8.0,
                },
            }],
        ),
        ability(
            "aegis",
            &everyone,
            1,
            0,
            TargetSelector::Caster,
            vec![AbilityEffect::Shield {
                scaling: Scaling {
                    from: Attribute::Con,
                    ratio: 1.0,
                    flat: 0.0,
                },
                duration: 2,
            }],
        ),
        ability(
            "haste",
            &everyone,
            1,
            0,
            TargetSelector::AllAllies,
            vec![AbilityEffect::Buff {
                stat: BuffStat::Dexterity,
                change: StatChange::Flat(10.0),
                duration: 2,
            }],
        ),
        ability(
            "sunder",
            &everyone,
            1,
            0,
            TargetSelector::Enemy,
            vec![AbilityEffect::Debuff {
                stat: BuffStat::Defense,
                change: StatChange::Percent(-50.0),
                duration: 2,
            }],
        ),
        ability(
            "venom",
            &everyone,
            1,
            0,
            TargetSelector::Enemy,
            vec![AbilityEffect::Poison {
                chance_pct: 100.0,
                potency: 4,
                duration: 2,
            }],
        ),
        ability(
            "channel",
            &everyone,
            1,
            0,
            TargetSelector::Caster,
            vec![
                AbilityEffect::GainNextTurnAp { amount: 1 },
                AbilityEffect::CostReduction { amount: 1 },
            ],
        ),
        ability(
            "refresh",
            &everyone,
            1,
            0,
            TargetSelector::Ally,
            vec![AbilityEffect::ResetCooldowns { max: 1 }],
        ),
        ability(
            "smite",
            &[Class::Cleric],
            1,
            0,
            TargetSelector::Enemy,
            vec![AbilityEffect::Damage {
                kind: DamageKind::Magical,
                power: 1.0,
            }],
        ),
    ];
    let items = vec![
        ItemDefinition {
            id: "minor_tonic".into(),
            name: "Minor Tonic".into(),
            kind: ItemKind::Consumable(ConsumableEffect::Heal(20)),
            price: 15,
            description: String::new(),
        },
        ItemDefinition {
            id: "torch".into(),
            name: "Torch".into(),
            kind: ItemKind::Consumable(ConsumableEffect::Light),
            price: 4,
            description: String::new(),
        },
    ];
    (abilities, items)
}

pub fn env<'a>(abilities: &'a impl AbilityOracle, items: &'a impl ItemOracle) -> GameEnv<'a> {
    GameEnv::new(
        None,
        None,
        Some(abilities as &dyn AbilityOracle),
        Some(items as &dyn ItemOracle),
    )
}
