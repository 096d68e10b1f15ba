//! Spawn table, preset and region loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use stonefall_core::env::{EncounterPreset, Region, SpawnTable};

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Hand-authored encounter sources, as stored in `tables.ron`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TablesCatalog {
    #[serde(default)]
    pub spawn_tables: Vec<SpawnTable>,
    #[serde(default)]
    pub presets: Vec<EncounterPreset>,
    #[serde(default)]
    pub regions: Vec<Region>,
}

/// Loader for spawn tables, presets and regions.
pub struct TablesLoader;

impl TablesLoader {
    pub fn load(path: &Path) -> LoadResult<TablesCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<TablesCatalog> {
        let catalog: TablesCatalog = parse_ron(content, "tables")?;

        for table in &catalog.spawn_tables {
            for slot in &table.slots {
                if slot.count.0 > slot.count.1 {
                    anyhow::bail!(
                        "Spawn table '{}' has a {} slot with an inverted count {:?}",
                        table.key,
                        slot.role,
                        slot.count
                    );
                }
            }
        }
        for region in &catalog.regions {
            if region.level_range.0 > region.level_range.1 {
                anyhow::bail!(
                    "Region '{}' has an inverted level range {:?}",
                    region.key,
                    region.level_range
                );
            }
        }

        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use stonefall_core::Tier;
    use stonefall_core::encounter::Difficulty;
    use stonefall_core::env::SlotRole;

    use super::*;

    const TABLES: &str = r#"
        (
            spawn_tables: [
                (
                    key: "forest_road_t1",
                    name: "Forest Road",
                    slots: [
                        (role: minion, count: (2, 4), tiers: Some([normal]), biomes: Some(["forest"])),
                        (role: pack, count: (0, 1), names: ["Wolf Pack"]),
                    ],
                ),
            ],
            presets: [
                (
                    key: "forest_road_t1",
                    name: "Forest Road (Tier 1)",
                    defaults: (biomes: Some(["forest", "road"]), difficulty: standard, max_enemies: 5),
                    recommended_levels: (1, 4),
                ),
            ],
            regions: [
                (
                    key: "Thornbridge",
                    biomes: ["forest", "road"],
                    level_range: (1, 4),
                    presets: ["forest_road_t1"],
                    spawn_tables: ["forest_road_t1"],
                ),
            ],
        )
    "#;

    #[test]
    fn parses_every_section() {
        let catalog = TablesLoader::parse(TABLES).unwrap();

        let table = &catalog.spawn_tables[0];
        assert_eq!(table.slots.len(), 2);
        assert_eq!(table.slots[0].tiers, Some(vec![Tier::Normal]));
        assert_eq!(table.slots[0].families, None);
        assert_eq!(table.slots[1].role, SlotRole::Pack);
        assert_eq!(table.slots[1].require_at_least, 0);

        let preset = &catalog.presets[0];
        assert_eq!(preset.defaults.difficulty, Difficulty::Standard);
        assert!(!preset.defaults.allow_bosses_below_hard);

        assert_eq!(catalog.regions[0].level_range, (1, 4));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let catalog = TablesLoader::parse("(presets: [])").unwrap();
        assert!(catalog.spawn_tables.is_empty());
        assert!(catalog.regions.is_empty());
    }

    #[test]
    fn rejects_inverted_slot_counts() {
        let broken = TABLES.replace("count: (2, 4)", "count: (4, 2)");
        let err = TablesLoader::parse(&broken).unwrap_err();
        assert!(err.to_string().contains("forest_road_t1"));
        assert!(err.to_string().contains("minion"));
    }
}
