//! Game configuration loader.

use std::path::Path;

use stonefall_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys missing from the file keep their defaults.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Like [`ConfigLoader::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> LoadResult<GameConfig> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(GameConfig::default());
        }
        Self::load(path)
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_files_keep_defaults() {
        let config = ConfigLoader::parse(
            r#"
            [combat]
            pause_mode = false
            flee_chance_pct = 75

            [encounter.budget_per_member]
            easy = 1
            standard = 2
            hard = 3
            deadly = 5
            "#,
        )
        .unwrap();

        assert!(!config.combat.pause_mode);
        assert_eq!(config.combat.flee_chance_pct, 75);
        assert_eq!(config.combat.base_ap_per_turn, 3);
        assert_eq!(config.encounter.budget_per_member.deadly, 5);
        assert_eq!(config.progression, GameConfig::default().progression);
    }

    #[test]
    fn loads_from_disk_and_falls_back_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(
            ConfigLoader::load_or_default(&path).unwrap(),
            GameConfig::default()
        );
        assert!(ConfigLoader::load(&path).is_err());

        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[progression]\nlevel_cap = 20").unwrap();
        let config = ConfigLoader::load_or_default(&path).unwrap();
        assert_eq!(config.progression.level_cap, 20);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let err = ConfigLoader::parse("[combat\nbase_ap_per_turn = ").unwrap_err();
        assert!(err.to_string().contains("Failed to parse config TOML"));
    }
}
