//! Enemy catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use stonefall_core::EnemyArchetype;

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Enemy catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyCatalog {
    pub enemies: Vec<EnemyArchetype>,
}

/// Loader for the enemy catalog from RON files.
pub struct EnemyLoader;

impl EnemyLoader {
    /// Load the enemy catalog from a RON file, sorted by key.
    pub fn load(path: &Path) -> LoadResult<Vec<EnemyArchetype>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<EnemyArchetype>> {
        let catalog: EnemyCatalog = parse_ron(content, "enemy catalog")?;
        let mut enemies = catalog.enemies;
        for enemy in &enemies {
            if enemy.damage.min > enemy.damage.max {
                anyhow::bail!(
                    "Enemy '{}' has an inverted damage range {}..{}",
                    enemy.key,
                    enemy.damage.min,
                    enemy.damage.max
                );
            }
        }
        enemies.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(enemies)
    }
}

#[cfg(test)]
mod tests {
    use stonefall_core::Tier;
    use stonefall_core::env::AiBehavior;

    use super::*;

    const CATALOG: &str = r#"
        (
            enemies: [
                (
                    key: "Wolf", family: "Beast", tier: normal, level: 1,
                    hp: 10, atk: 3, def: 11, damage: (min: 1, max: 5), ai: lowest,
                    moves: [(key: "bite", name: "Bite", kind: "piercing", damage: (min: 1, max: 5))],
                    tags: ["forest", "pack"],
                ),
                (
                    key: "Bear", family: "Beast", tier: elite, level: 4,
                    hp: 18, atk: 5, def: 14, damage: (min: 2, max: 8),
                ),
            ],
        )
    "#;

    #[test]
    fn parses_and_sorts_by_key() {
        let enemies = EnemyLoader::parse(CATALOG).unwrap();
        assert_eq!(enemies.len(), 2);
        assert_eq!(enemies[0].key, "Bear");
        assert_eq!(enemies[0].ai, AiBehavior::Random);
        assert!(enemies[0].tags.is_empty());
        assert_eq!(enemies[1].tier, Tier::Normal);
        assert_eq!(enemies[1].ai, AiBehavior::LowestHp);
        assert_eq!(enemies[1].moves[0].name, "Bite");
    }

    #[test]
    fn rejects_inverted_damage() {
        let broken = CATALOG.replace("(min: 2, max: 8)", "(min: 8, max: 2)");
        let err = EnemyLoader::parse(&broken).unwrap_err();
        assert!(err.to_string().contains("Bear"));
    }

    #[test]
    fn reports_the_failing_file() {
        let err = EnemyLoader::load(Path::new("/nonexistent/enemies.ron")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/enemies.ron"));
    }
}
