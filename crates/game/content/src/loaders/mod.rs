//! Content loaders for reading game data from files.
//!
//! Each loader reads one RON/TOML file into `stonefall-core` types; the
//! [`ContentFactory`] combines them into a checked
//! [`ContentRegistry`](crate::ContentRegistry). [`builtin`] does the same for
//! the data files compiled into this crate.

pub mod abilities;
pub mod builtin;
pub mod config;
pub mod enemies;
pub mod factory;
pub mod item;
pub mod tables;

pub use abilities::AbilityLoader;
pub use builtin::builtin;
pub use config::ConfigLoader;
pub use enemies::EnemyLoader;
pub use factory::ContentFactory;
pub use item::ItemLoader;
pub use tables::{TablesCatalog, TablesLoader};

use std::path::Path;

use serde::de::DeserializeOwned;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Parses a RON document, naming `what` in the error.
pub(crate) fn parse_ron<T: DeserializeOwned>(content: &str, what: &str) -> LoadResult<T> {
    ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse {} RON: {}", what, e))
}
