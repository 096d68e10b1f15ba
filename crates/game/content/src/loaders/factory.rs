//! Content factory for building the registry from data files.

use std::path::{Path, PathBuf};

use stonefall_core::{AbilityDefinition, EnemyArchetype, GameConfig, ItemDefinition};

use crate::loaders::{
    AbilityLoader, ConfigLoader, EnemyLoader, ItemLoader, LoadResult, TablesCatalog, TablesLoader,
};
use crate::registry::ContentRegistry;

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml     (optional, defaults when absent)
/// ├── enemies.ron
/// ├── tables.ron
/// ├── abilities.ron
/// └── items.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load_or_default(&self.data_dir.join("config.toml"))
    }

    /// Load the enemy catalog from `enemies.ron`.
    pub fn load_enemies(&self) -> LoadResult<Vec<EnemyArchetype>> {
        EnemyLoader::load(&self.data_dir.join("enemies.ron"))
    }

    /// Load spawn tables, presets and regions from `tables.ron`.
    pub fn load_tables(&self) -> LoadResult<TablesCatalog> {
        TablesLoader::load(&self.data_dir.join("tables.ron"))
    }

    /// Load the ability catalog from `abilities.ron`.
    pub fn load_abilities(&self) -> LoadResult<Vec<AbilityDefinition>> {
        AbilityLoader::load(&self.data_dir.join("abilities.ron"))
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Vec<ItemDefinition>> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    /// Loads every file and checks cross references.
    pub fn load_registry(&self) -> LoadResult<ContentRegistry> {
        let tables = self.load_tables()?;
        let registry = ContentRegistry::new(self.load_config()?)
            .with_enemies(self.load_enemies()?)
            .with_tables(tables.spawn_tables, tables.presets, tables.regions)
            .with_abilities(self.load_abilities()?)
            .with_items(self.load_items()?);
        check(registry)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Logs warnings and fails if any issue is fatal.
pub(crate) fn check(registry: ContentRegistry) -> LoadResult<ContentRegistry> {
    let mut fatal = Vec::new();
    for issue in registry.issues() {
        if issue.is_fatal() {
            fatal.push(issue.to_string());
        } else {
            tracing::warn!(%issue, "content warning");
        }
    }
    if !fatal.is_empty() {
        anyhow::bail!("Invalid content: {}", fatal.join("; "));
    }
    Ok(registry)
}
