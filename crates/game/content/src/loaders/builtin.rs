//! Content compiled into the crate.

use crate::loaders::factory::check;
use crate::loaders::{
    AbilityLoader, ConfigLoader, EnemyLoader, ItemLoader, LoadResult, TablesLoader,
};
use crate::registry::ContentRegistry;

const CONFIG: &str = include_str!("../../data/config.toml");
const ENEMIES: &str = include_str!("../../data/enemies.ron");
const TABLES: &str = include_str!("../../data/tables.ron");
const ABILITIES: &str = include_str!("../../data/abilities.ron");
const ITEMS: &str = include_str!("../../data/items.ron");

/// Builds the registry from the bundled data files.
pub fn builtin() -> LoadResult<ContentRegistry> {
    let tables = TablesLoader::parse(TABLES)?;
    let registry = ContentRegistry::new(ConfigLoader::parse(CONFIG)?)
        .with_enemies(EnemyLoader::parse(ENEMIES)?)
        .with_tables(tables.spawn_tables, tables.presets, tables.regions)
        .with_abilities(AbilityLoader::parse(ABILITIES)?)
        .with_items(ItemLoader::parse(ITEMS)?);
    check(registry)
}
