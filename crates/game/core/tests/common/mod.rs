#![allow(dead_code)]

use stonefall_core::combat::CombatSession;
use stonefall_core::env::{
    AbilityEffect, AiBehavior, ConsumableEffect, DamageKind, DamageRange, EncounterPreset,
    ItemKind, Region, SpawnTable, TargetSelector,
};
use stonefall_core::{
    AbilityDefinition, AbilityOracle, AttributeBlock, Class, CombatantId, EnemyArchetype, GameEnv,
    ItemDefinition, ItemOracle, MemberId, Party, PartyMember, ProgressionConfig, Race,
    TablesOracle, Tier,
};

pub fn archetype(key: &str, family: &str, tier: Tier, level: u32, tags: &[&str]) -> EnemyArchetype {
    EnemyArchetype {
        key: key.to_string(),
        family: family.to_string(),
        tier,
        level,
        hp: 8 + level * 4,
        atk: 2 + level as i32,
        def: 8 + level as i32,
        damage: DamageRange::new(1, 4),
        ai: AiBehavior::Random,
        emoji: String::new(),
        moves: Vec::new(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

/// Small catalog spanning every tier, sorted by key.
pub fn catalog() -> Vec<EnemyArchetype> {
    let mut enemies = vec![
        archetype("Bandit", "Humanoid", Tier::Normal, 2, &["road"]),
        archetype("Cave Bear", "Beast", Tier::Elite, 4, &["forest", "caves"]),
        archetype("Dire Wolf", "Beast", Tier::Elite, 3, &["forest"]),
        archetype("Giant Rat", "Beast", Tier::Normal, 1, &["caves", "sewer"]),
        archetype("Goblin", "Goblinoid", Tier::Normal, 1, &["plains", "caves"]),
        archetype("Lich", "Undead", Tier::Boss, 9, &["ruin"]),
        archetype("Red Dragon", "Dragon", Tier::Boss, 12, &["mountain"]),
        archetype("Skeleton", "Undead", Tier::Normal, 2, &["crypt"]),
        archetype("Tarrasque", "Monstrosity", Tier::Mythic, 14, &[]),
        archetype("Wolf", "Beast", Tier::Normal, 1, &["forest"]),
        archetype("Wraith", "Undead", Tier::Champion, 6, &["ruin"]),
    ];
    enemies.sort_by(|a, b| a.key.cmp(&b.key));
    enemies
}

pub fn abilities() -> Vec<AbilityDefinition> {
    vec![AbilityDefinition {
        key: "meteor".into(),
        name: "Meteor".into(),
        classes: vec![Class::Warrior],
        unlock_level: 1,
        ap_cost: 4,
        cooldown: 0,
        target: TargetSelector::AllEnemies,
        effects: vec![AbilityEffect::Damage {
            kind: DamageKind::Magical,
            power: 3.0,
        }],
        description: String::new(),
    }]
}

pub fn items() -> Vec<ItemDefinition> {
    vec![ItemDefinition {
        id: "minor_tonic".into(),
        name: "Minor Tonic".into(),
        kind: ItemKind::Consumable(ConsumableEffect::Heal(10)),
        price: 15,
        description: String::new(),
    }]
}

pub fn env<'a>(abilities: &'a impl AbilityOracle, items: &'a impl ItemOracle) -> GameEnv<'a> {
    GameEnv::new(
        None,
        None,
        Some(abilities as &dyn AbilityOracle),
        Some(items as &dyn ItemOracle),
    )
}

/// A single level-1 character with 10 in every attribute.
pub fn solo(class: Class) -> Party {
    let progression = ProgressionConfig::default();
    let mut party = Party::new(&progression);
    party
        .add_member(PartyMember::with_attributes(
            MemberId(1),
            "Solo",
            Race::Human,
            class,
            AttributeBlock::starting(),
            progression.level1_points,
        ))
        .unwrap();
    party
}

/// Ticks until some turn begins and returns the actor.
pub fn next_turn<R: rand::RngCore>(session: &mut CombatSession<'_, R>) -> CombatantId {
    for _ in 0..10_000 {
        if let Some(actor) = session.current_actor() {
            return actor;
        }
        session.advance(0.05).unwrap();
    }
    panic!("no turn began");
}

pub struct Tables {
    pub spawn_tables: Vec<SpawnTable>,
}

impl TablesOracle for Tables {
    fn spawn_table(&self, key: &str) -> Option<&SpawnTable> {
        self.spawn_tables.iter().find(|t| t.key == key)
    }

    fn spawn_tables(&self) -> Vec<&SpawnTable> {
        self.spawn_tables.iter().collect()
    }

    fn preset(&self, _key: &str) -> Option<&EncounterPreset> {
        None
    }

    fn presets(&self) -> Vec<&EncounterPreset> {
        Vec::new()
    }

    fn region(&self, _key: &str) -> Option<&Region> {
        None
    }

    fn regions(&self) -> Vec<&Region> {
        Vec::new()
    }
}
