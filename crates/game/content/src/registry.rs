//! In-memory content registry.
//!
//! [`ContentRegistry`] owns every catalog and answers all four oracle traits,
//! so one value can back a whole [`GameEnv`].

use std::collections::BTreeSet;
use std::fmt;

use stonefall_core::env::{EncounterPreset, Region, SpawnTable};
use stonefall_core::{
    AbilityDefinition, AbilityOracle, EnemyArchetype, EnemyOracle, GameConfig, GameEnv,
    ItemDefinition, ItemOracle, TablesOracle,
};

/// A problem found by [`ContentRegistry::issues`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentIssue {
    /// Two entries of one catalog share a key.
    DuplicateKey { catalog: &'static str, key: String },
    /// `owner` points at a `kind` entry that does not exist.
    MissingReference {
        owner: String,
        kind: &'static str,
        key: String,
    },
    /// A spawn slot names an enemy missing from the catalog. The builder
    /// skips such names, so this is only a warning.
    UnknownSlotEnemy { table: String, name: String },
}

impl ContentIssue {
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::UnknownSlotEnemy { .. })
    }
}

impl fmt::Display for ContentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateKey { catalog, key } => {
                write!(f, "duplicate key '{}' in {} catalog", key, catalog)
            }
            Self::MissingReference { owner, kind, key } => {
                write!(f, "'{}' references unknown {} '{}'", owner, kind, key)
            }
            Self::UnknownSlotEnemy { table, name } => {
                write!(f, "spawn table '{}' names unknown enemy '{}'", table, name)
            }
        }
    }
}

/// Every catalog plus the rule configuration.
#[derive(Clone, Debug, Default)]
pub struct ContentRegistry {
    /// Sorted by key.
    enemies: Vec<EnemyArchetype>,
    spawn_tables: Vec<SpawnTable>,
    presets: Vec<EncounterPreset>,
    regions: Vec<Region>,
    abilities: Vec<AbilityDefinition>,
    items: Vec<ItemDefinition>,
    config: GameConfig,
}

impl ContentRegistry {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_enemies(mut self, mut enemies: Vec<EnemyArchetype>) -> Self {
        enemies.sort_by(|a, b| a.key.cmp(&b.key));
        self.enemies = enemies;
        self
    }

    pub fn with_tables(
        mut self,
        spawn_tables: Vec<SpawnTable>,
        presets: Vec<EncounterPreset>,
        regions: Vec<Region>,
    ) -> Self {
        self.spawn_tables = spawn_tables;
        self.presets = presets;
        self.regions = regions;
        self
    }

    pub fn with_abilities(mut self, abilities: Vec<AbilityDefinition>) -> Self {
        self.abilities = abilities;
        self
    }

    pub fn with_items(mut self, items: Vec<ItemDefinition>) -> Self {
        self.items = items;
        self
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Bundles every oracle for the encounter builders and combat.
    pub fn env(&self) -> GameEnv<'_> {
        GameEnv::with_all(self, self, self, self)
    }

    /// Cross-checks keys and references between catalogs.
    pub fn issues(&self) -> Vec<ContentIssue> {
        let mut issues = Vec::new();

        duplicates(&mut issues, "enemy", self.enemies.iter().map(|e| e.key.as_str()));
        duplicates(
            &mut issues,
            "spawn table",
            self.spawn_tables.iter().map(|t| t.key.as_str()),
        );
        duplicates(&mut issues, "preset", self.presets.iter().map(|p| p.key.as_str()));
        duplicates(&mut issues, "region", self.regions.iter().map(|r| r.key.as_str()));
        duplicates(&mut issues, "ability", self.abilities.iter().map(|a| a.key.as_str()));
        duplicates(&mut issues, "item", self.items.iter().map(|i| i.id.as_str()));

        for region in &self.regions {
            for preset in &region.presets {
                if self.preset(preset).is_none() {
                    issues.push(ContentIssue::MissingReference {
                        owner: region.key.clone(),
                        kind: "preset",
                        key: preset.clone(),
                    });
                }
            }
            for table in &region.spawn_tables {
                if self.spawn_table(table).is_none() {
                    issues.push(ContentIssue::MissingReference {
                        owner: region.key.clone(),
                        kind: "spawn table",
                        key: table.clone(),
                    });
                }
            }
        }

        let loot = &self.config.combat.loot_item;
        if self.item(loot).is_none() {
            issues.push(ContentIssue::MissingReference {
                owner: "combat.loot_item".to_string(),
                kind: "item",
                key: loot.clone(),
            });
        }

        for table in &self.spawn_tables {
            for name in table.slots.iter().flat_map(|slot| &slot.names) {
                if self.archetype(name).is_none() {
                    issues.push(ContentIssue::UnknownSlotEnemy {
                        table: table.key.clone(),
                        name: name.clone(),
                    });
                }
            }
        }

        issues
    }
}

fn duplicates<'a>(
    issues: &mut Vec<ContentIssue>,
    catalog: &'static str,
    keys: impl Iterator<Item = &'a str>,
) {
    let mut seen = BTreeSet::new();
    for key in keys {
        if !seen.insert(key) {
            issues.push(ContentIssue::DuplicateKey {
                catalog,
                key: key.to_string(),
            });
        }
    }
}

impl EnemyOracle for ContentRegistry {
    fn archetype(&self, key: &str) -> Option<&EnemyArchetype> {
        self.enemies
            .binary_search_by(|enemy| enemy.key.as_str().cmp(key))
            .ok()
            .map(|index| &self.enemies[index])
    }

    fn archetypes(&self) -> &[EnemyArchetype] {
        &self.enemies
    }
}

impl TablesOracle for ContentRegistry {
    fn spawn_table(&self, key: &str) -> Option<&SpawnTable> {
        self.spawn_tables.iter().find(|table| table.key == key)
    }

    fn spawn_tables(&self) -> Vec<&SpawnTable> {
        self.spawn_tables.iter().collect()
    }

    fn preset(&self, key: &str) -> Option<&EncounterPreset> {
        self.presets.iter().find(|preset| preset.key == key)
    }

    fn presets(&self) -> Vec<&EncounterPreset> {
        self.presets.iter().collect()
    }

    fn region(&self, key: &str) -> Option<&Region> {
        self.regions.iter().find(|region| region.key == key)
    }

    fn regions(&self) -> Vec<&Region> {
        self.regions.iter().collect()
    }
}

impl AbilityOracle for ContentRegistry {
    fn ability(&self, key: &str) -> Option<&AbilityDefinition> {
        self.abilities.iter().find(|ability| ability.key == key)
    }

    fn abilities(&self) -> Vec<&AbilityDefinition> {
        self.abilities.iter().collect()
    }
}

impl ItemOracle for ContentRegistry {
    fn item(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.iter().find(|item| item.id == id)
    }

    fn items(&self) -> Vec<&ItemDefinition> {
        self.items.iter().collect()
    }
}
