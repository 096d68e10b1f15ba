//! Data-driven content definitions and loaders.
//!
//! This crate houses the static game content and provides loaders for RON/TOML data files:
//! - Enemy catalog (data-driven via RON)
//! - Spawn tables, encounter presets and regions (data-driven via RON)
//! - Ability catalog (data-driven via RON)
//! - Item catalog (data-driven via RON)
//! - Game configuration (data-driven via TOML)
//!
//! Everything is gathered into a [`ContentRegistry`], which implements every
//! oracle trait of `stonefall-core`. [`builtin`] returns the registry for the
//! data files compiled into this crate.

pub mod registry;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use registry::{ContentIssue, ContentRegistry};

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityLoader, ConfigLoader, ContentFactory, EnemyLoader, ItemLoader, LoadResult,
    TablesCatalog, TablesLoader, builtin,
};
