//! Encounter generation.
//!
//! Three entry points produce an [`EncounterDefinition`]:
//!
//! - [`roll_encounter`]: budgeted procedural roll over the filtered catalog.
//! - [`build_from_table`]: hand-authored slot recipe, still budget-aware.
//! - [`roll_preset`] / [`roll_for_region`]: named argument bundles on top.
//!
//! All builders are pure functions of their inputs and the seed.
mod builder;
mod definition;
mod difficulty;
mod error;
mod preset;
mod spawn;

pub use builder::{EncounterRequest, roll_encounter, roll_encounter_with};
pub use definition::{CollapsedEntry, EncounterDefinition, EncounterPreview};
pub use difficulty::{Difficulty, budget_for, threat_for};
pub use error::EncounterError;
pub use preset::{EncounterSource, PresetOverrides, RegionRequest, roll_for_region, roll_preset};
pub use spawn::{TableRequest, build_from_table};
