//! Traits describing read-only game data.
//!
//! Oracles expose the enemy catalog, spawn tables/presets/regions, the
//! ability catalog and item definitions. The [`Env`] aggregate bundles them
//! so the encounter builders and the combat session can reach everything they
//! need without hard coupling to the content crate.
mod abilities;
mod enemies;
mod error;
mod items;
mod rng;
mod tables;

pub use abilities::{
    AbilityDefinition, AbilityEffect, AbilityOracle, BuffStat, DamageKind, Scaling, StatChange,
    TargetSelector,
};
pub use enemies::{
    AiBehavior, DamageRange, EnemyArchetype, EnemyFilter, EnemyMove, EnemyOracle, Tier,
    enemies_for, tiers_for_party_level,
};
pub use error::OracleError;
pub use items::{ConsumableEffect, EquipmentSlot, ItemDefinition, ItemKind, ItemOracle};
pub use rng::{EncounterSeed, PcgRng, mix_seed};
pub use tables::{
    CatalogEntry, EncounterPreset, PresetDefaults, Region, SlotRole, SpawnSlot, SpawnTable,
    TablesOracle,
};

#[cfg(test)]
pub(crate) use enemies::fixtures;

/// Aggregates read-only oracles required by the builders and combat.
pub struct Env<'a, E, T, A, I>
where
    E: EnemyOracle + ?Sized,
    T: TablesOracle + ?Sized,
    A: AbilityOracle + ?Sized,
    I: ItemOracle + ?Sized,
{
    enemies: Option<&'a E>,
    tables: Option<&'a T>,
    abilities: Option<&'a A>,
    items: Option<&'a I>,
}

impl<E, T, A, I> Clone for Env<'_, E, T, A, I>
where
    E: EnemyOracle + ?Sized,
    T: TablesOracle + ?Sized,
    A: AbilityOracle + ?Sized,
    I: ItemOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, T, A, I> Copy for Env<'_, E, T, A, I>
where
    E: EnemyOracle + ?Sized,
    T: TablesOracle + ?Sized,
    A: AbilityOracle + ?Sized,
    I: ItemOracle + ?Sized,
{
}

pub type GameEnv<'a> = Env<
    'a,
    dyn EnemyOracle + 'a,
    dyn TablesOracle + 'a,
    dyn AbilityOracle + 'a,
    dyn ItemOracle + 'a,
>;

impl<'a, E, T, A, I> Env<'a, E, T, A, I>
where
    E: EnemyOracle + ?Sized,
    T: TablesOracle + ?Sized,
    A: AbilityOracle + ?Sized,
    I: ItemOracle + ?Sized,
{
    pub fn new(
        enemies: Option<&'a E>,
        tables: Option<&'a T>,
        abilities: Option<&'a A>,
        items: Option<&'a I>,
    ) -> Self {
        Self {
            enemies,
            tables,
            abilities,
            items,
        }
    }

    pub fn with_all(enemies: &'a E, tables: &'a T, abilities: &'a A, items: &'a I) -> Self {
        Self::new(Some(enemies), Some(tables), Some(abilities), Some(items))
    }

    pub fn empty() -> Self {
        Self {
            enemies: None,
            tables: None,
            abilities: None,
            items: None,
        }
    }

    /// Returns the EnemyOracle, or an error if not available.
    pub fn enemies(&self) -> Result<&'a E, OracleError> {
        self.enemies.ok_or(OracleError::EnemiesNotAvailable)
    }

    /// Returns the TablesOracle, or an error if not available.
    pub fn tables(&self) -> Result<&'a T, OracleError> {
        self.tables.ok_or(OracleError::TablesNotAvailable)
    }

    /// Returns the AbilityOracle, or an error if not available.
    pub fn abilities(&self) -> Result<&'a A, OracleError> {
        self.abilities.ok_or(OracleError::AbilitiesNotAvailable)
    }

    /// Returns the ItemOracle, or an error if not available.
    pub fn items(&self) -> Result<&'a I, OracleError> {
        self.items.ok_or(OracleError::ItemsNotAvailable)
    }
}
