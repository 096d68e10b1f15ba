//! Spawn-table builder: fills a hand-authored slot recipe under a budget.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, trace};

use super::builder::{Priced, price_pool, rng_for};
use super::definition::EncounterDefinition;
use super::difficulty::{Difficulty, budget_for, threat_for};
use super::error::EncounterError;
use crate::config::EncounterConfig;
use crate::env::{
    EncounterSeed, EnemyArchetype, EnemyFilter, EnemyOracle, SpawnSlot, SpawnTable, TablesOracle,
    Tier, enemies_for,
};

/// Arguments for [`build_from_table`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TableRequest {
    pub party_level: u32,
    pub party_size: u32,
    pub difficulty: Difficulty,
    pub seed: Option<EncounterSeed>,
    /// `None` uses [`EncounterConfig::table_max_enemies`].
    pub max_enemies: Option<usize>,
}

impl TableRequest {
    pub fn new(party_level: u32, party_size: u32) -> Self {
        Self {
            party_level,
            party_size,
            ..Self::default()
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_seed(mut self, seed: impl Into<EncounterSeed>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    pub fn with_max_enemies(mut self, max_enemies: usize) -> Self {
        self.max_enemies = Some(max_enemies);
        self
    }
}

impl Default for TableRequest {
    fn default() -> Self {
        Self {
            party_level: 1,
            party_size: 3,
            difficulty: Difficulty::Standard,
            seed: None,
            max_enemies: None,
        }
    }
}

/// Running pick list with budget bookkeeping.
struct Fill<'c> {
    picked: Vec<&'c EnemyArchetype>,
    used: f64,
    budget: f64,
    party_level: u32,
}

impl<'c> Fill<'c> {
    fn fits(&self, threat: f64) -> bool {
        // The first pick may overshoot so a table never comes back empty.
        self.used + threat <= self.budget || self.picked.is_empty()
    }

    fn try_add(&mut self, enemy: &'c EnemyArchetype, config: &EncounterConfig) -> bool {
        let threat = threat_for(enemy, self.party_level, config);
        if !self.fits(threat) {
            return false;
        }
        self.picked.push(enemy);
        self.used += threat;
        true
    }
}

/// Builds an encounter from a named spawn table.
///
/// # Errors
///
/// - [`EncounterError::UnknownTable`] when `key` is not registered.
/// - [`EncounterError::NoCandidates`] when not even the normal-tier fallback
///   can produce an enemy.
pub fn build_from_table<T, O>(
    tables: &T,
    catalog: &O,
    key: &str,
    request: &TableRequest,
    config: &EncounterConfig,
) -> Result<EncounterDefinition, EncounterError>
where
    T: TablesOracle + ?Sized,
    O: EnemyOracle + ?Sized,
{
    let table = tables
        .spawn_table(key)
        .ok_or_else(|| EncounterError::UnknownTable(key.to_string()))?;
    let mut rng = rng_for(request.seed.as_ref());
    fill_table(table, catalog, request, config, &mut rng, || rng_for(request.seed.as_ref()))
}

fn fill_table<'c, O, R, F>(
    table: &SpawnTable,
    catalog: &'c O,
    request: &TableRequest,
    config: &EncounterConfig,
    rng: &mut R,
    fresh_rng: F,
) -> Result<EncounterDefinition, EncounterError>
where
    O: EnemyOracle + ?Sized,
    R: Rng + ?Sized,
    F: FnOnce() -> crate::env::PcgRng,
{
    let max_enemies = request.max_enemies.unwrap_or(config.table_max_enemies);
    let mut fill = Fill {
        picked: Vec::new(),
        used: 0.0,
        budget: f64::from(budget_for(request.party_size, request.difficulty, config)),
        party_level: request.party_level,
    };
    let cheap_bias = config.cheap_half_bias.clamp(0.0, 1.0);

    debug!(table = %table.key, budget = fill.budget, "building from spawn table");

    for slot in &table.slots {
        let want = roll_count(slot, rng);
        if want == 0 {
            continue;
        }

        let pool = slot_pool(slot, catalog, request.party_level, config);
        if pool.is_empty() {
            if slot.require_at_least > 0 {
                let global = normal_tier(catalog, request.party_level);
                if let Some(&enemy) = global.choose(rng) {
                    trace!(slot = %slot.role, enemy = %enemy.key, "empty slot; global fallback");
                    fill.try_add(enemy, config);
                }
            }
            continue;
        }

        for _ in 0..want {
            if fill.picked.len() >= max_enemies {
                break;
            }

            let half = (pool.len() / 2).max(1);
            let bucket = if rng.gen_bool(cheap_bias) {
                &pool[..half]
            } else {
                &pool[..]
            };

            let mut candidate = None;
            for _ in 0..config.slot_pick_attempts {
                let Some(entry) = bucket.choose(rng) else {
                    break;
                };
                if fill.fits(entry.threat) {
                    candidate = Some(entry.enemy);
                    break;
                }
            }

            // Nothing affordable: give up on this slot.
            let Some(enemy) = candidate else {
                trace!(slot = %slot.role, used = fill.used, "slot exhausted budget");
                break;
            };
            fill.try_add(enemy, config);
        }
    }

    fill.picked.truncate(max_enemies);

    if fill.picked.is_empty() {
        let fallback = normal_tier(catalog, request.party_level);
        let mut rng = fresh_rng();
        let Some(&enemy) = fallback.choose(&mut rng) else {
            debug!(table = %table.key, "spawn table produced nothing and no fallback exists");
            return Err(EncounterError::NoCandidates);
        };
        debug!(table = %table.key, enemy = %enemy.key, "spawn table empty; normal-tier fallback");
        fill.picked.push(enemy);
    }

    Ok(fill.picked.into_iter().cloned().collect())
}

fn roll_count<R: Rng + ?Sized>(slot: &SpawnSlot, rng: &mut R) -> u32 {
    let (min, max) = slot.count;
    if min >= max {
        min
    } else {
        rng.gen_range(min..=max)
    }
}

/// Named slots resolve their names directly; otherwise the filters apply.
fn slot_pool<'c, O>(
    slot: &SpawnSlot,
    catalog: &'c O,
    party_level: u32,
    config: &EncounterConfig,
) -> Vec<Priced<'c>>
where
    O: EnemyOracle + ?Sized,
{
    if !slot.names.is_empty() {
        let named = slot.names.iter().filter_map(|name| catalog.archetype(name));
        return price_pool(named, party_level, config);
    }

    let filter = EnemyFilter {
        biomes: slot.biomes.as_deref(),
        families: slot.families.as_deref(),
        tiers: slot.tiers.as_deref(),
    };
    price_pool(enemies_for(catalog, party_level, &filter), party_level, config)
}

fn normal_tier<'c, O>(catalog: &'c O, party_level: u32) -> Vec<&'c EnemyArchetype>
where
    O: EnemyOracle + ?Sized,
{
    const NORMAL: &[Tier] = &[Tier::Normal];
    let filter = EnemyFilter {
        tiers: Some(NORMAL),
        ..EnemyFilter::default()
    };
    enemies_for(catalog, party_level, &filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::fixtures::catalog;
    use crate::env::{EncounterPreset, Region, SlotRole};

    struct Tables(Vec<SpawnTable>);

    impl TablesOracle for Tables {
        fn spawn_table(&self, key: &str) -> Option<&SpawnTable> {
            self.0.iter().find(|t| t.key == key)
        }
        fn spawn_tables(&self) -> Vec<&SpawnTable> {
            self.0.iter().collect()
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

    fn slot(role: SlotRole, count: (u32, u32)) -> SpawnSlot {
        SpawnSlot {
            role,
            count,
            tiers: None,
            families: None,
            biomes: None,
            names: Vec::new(),
            require_at_least: 0,
        }
    }

    fn tables() -> Tables {
        Tables(vec![
            SpawnTable {
                key: "caves".into(),
                name: "Caves".into(),
                slots: vec![
                    SpawnSlot {
                        tiers: Some(vec![Tier::Normal]),
                        biomes: Some(vec!["caves".into()]),
                        ..slot(SlotRole::Minion, (2, 3))
                    },
                    SpawnSlot {
                        names: vec!["Goblin Captain".into(), "Missing One".into()],
                        ..slot(SlotRole::Captain, (0, 1))
                    },
                ],
            },
            SpawnTable {
                key: "lair".into(),
                name: "Lair".into(),
                slots: vec![SpawnSlot {
                    names: vec!["White Dragon".into(), "Black Dragon".into()],
                    ..slot(SlotRole::Boss, (1, 1))
                }],
            },
            SpawnTable {
                key: "void".into(),
                name: "Void".into(),
                slots: vec![SpawnSlot {
                    families: Some(vec!["Nothing".into()]),
                    require_at_least: 1,
                    ..slot(SlotRole::Minion, (1, 2))
                }],
            },
        ])
    }

    #[test]
    fn unknown_table_is_rejected() {
        let result = build_from_table(
            &tables(),
            &catalog(),
            "nope",
            &TableRequest::default(),
            &EncounterConfig::default(),
        );
        assert_eq!(result, Err(EncounterError::UnknownTable("nope".into())));
    }

    #[test]
    fn seeded_builds_are_reproducible() {
        let (tables, catalog) = (tables(), catalog());
        let config = EncounterConfig::default();
        let request = TableRequest::new(1, 3).with_seed("caves-1");
        let first = build_from_table(&tables, &catalog, "caves", &request, &config).unwrap();
        let second = build_from_table(&tables, &catalog, "caves", &request, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn picks_respect_slot_filters_and_cap() {
        let (tables, catalog) = (tables(), catalog());
        let config = EncounterConfig::default();
        for seed in 0..200u64 {
            let request = TableRequest::new(1, 4)
                .with_difficulty(Difficulty::Deadly)
                .with_seed(seed)
                .with_max_enemies(3);
            let encounter =
                build_from_table(&tables, &catalog, "caves", &request, &config).unwrap();
            assert!((1..=3).contains(&encounter.len()));
            assert!(
                encounter
                    .iter()
                    .all(|e| ["Goblin", "Slime", "Goblin Captain"].contains(&e.key.as_str()))
            );
        }
    }

    #[test]
    fn named_slot_overshoots_when_empty() {
        let (tables, catalog) = (tables(), catalog());
        let config = EncounterConfig::default();
        // Budget 2 at party level 1 affords no dragon, but the first pick always lands.
        let request = TableRequest::new(1, 1)
            .with_difficulty(Difficulty::Easy)
            .with_seed(9u64);
        let encounter = build_from_table(&tables, &catalog, "lair", &request, &config).unwrap();
        assert_eq!(encounter.len(), 1);
        assert!(encounter.iter().all(|e| e.family == "Dragon"));
    }

    #[test]
    fn empty_slot_falls_back_to_normal_tier() {
        let (tables, catalog) = (tables(), catalog());
        let config = EncounterConfig::default();
        let request = TableRequest::new(1, 3).with_seed("void");
        let encounter = build_from_table(&tables, &catalog, "void", &request, &config).unwrap();
        assert_eq!(encounter.len(), 1);
        assert_eq!(encounter.enemies[0].tier, Tier::Normal);
    }

    #[test]
    fn no_fallback_without_normal_tier() {
        let tables = tables();
        let catalog: Vec<EnemyArchetype> = catalog()
            .into_iter()
            .filter(|e| e.tier != Tier::Normal)
            .collect();
        let request = TableRequest::new(1, 3).with_seed(1u64);
        let result =
            build_from_table(&tables, &catalog, "void", &request, &EncounterConfig::default());
        assert_eq!(result, Err(EncounterError::NoCandidates));
    }
}
