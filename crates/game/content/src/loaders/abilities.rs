//! Ability catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use stonefall_core::AbilityDefinition;
use stonefall_core::env::TargetSelector;

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Ability catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityCatalog {
    pub abilities: Vec<AbilityDefinition>,
}

/// Loader for the ability catalog from RON files.
pub struct AbilityLoader;

impl AbilityLoader {
    /// Load the ability catalog from a RON file, keeping file order.
    pub fn load(path: &Path) -> LoadResult<Vec<AbilityDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<AbilityDefinition>> {
        let catalog: AbilityCatalog = parse_ron(content, "ability catalog")?;
        for ability in &catalog.abilities {
            if ability.classes.is_empty() {
                anyhow::bail!("Ability '{}' is not available to any class", ability.key);
            }
            if ability.effects.is_empty() {
                anyhow::bail!("Ability '{}' has no effects", ability.key);
            }
            if matches!(ability.target, TargetSelector::EnemyLine(0)) {
                anyhow::bail!("Ability '{}' has a zero-length line", ability.key);
            }
        }
        Ok(catalog.abilities)
    }
}
