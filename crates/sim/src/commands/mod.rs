//! Subcommand implementations.
//!
//! Each command owns its CLI arguments and an `execute` entry point.

mod battle;
mod list;
mod preset;
mod region;
mod roll;
mod table;

pub use battle::Battle;
pub use list::List;
pub use preset::Preset;
pub use region::Region;
pub use roll::Roll;
pub use table::Table;

use anyhow::Result;

use stonefall_content::ContentRegistry;
use stonefall_core::{EncounterDefinition, EncounterSeed};

use crate::output::{self, OutputFormat, PreviewReport};

/// Shared tail of the preview commands.
fn show_encounter(
    registry: &ContentRegistry,
    source: String,
    seed: &EncounterSeed,
    encounter: &EncounterDefinition,
    party_level: u32,
    format: OutputFormat,
) -> Result<()> {
    let config = registry.config();
    let preview = encounter.preview(party_level, &config.combat, &config.encounter);
    let report = PreviewReport {
        source,
        seed,
        preview: &preview,
    };
    match format {
        OutputFormat::Summary => output::print_preview(&report),
        OutputFormat::Json => output::print_json(&report)?,
    }
    Ok(())
}
