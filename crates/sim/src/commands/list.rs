//! Catalog listings.

use anyhow::Result;
use clap::Parser;
use console::style;
use serde_json::json;

use stonefall_content::ContentRegistry;
use stonefall_core::{EnemyOracle, TablesOracle};

use crate::content::ContentArgs;
use crate::output::{self, OutputFormat};

/// List the loaded catalogs
#[derive(Parser)]
pub struct List {
    /// Which catalog to list
    #[arg(value_enum, default_value = "all")]
    catalog: Catalog,

    #[command(flatten)]
    content: ContentArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Catalog {
    Tables,
    Presets,
    Regions,
    Enemies,
    All,
}

impl Catalog {
    fn includes(self, other: Catalog) -> bool {
        self == Catalog::All || self == other
    }
}

impl List {
    pub fn execute(self) -> Result<()> {
        let registry = self.content.load()?;
        match self.format {
            OutputFormat::Summary => {
                print_summary(&registry, self.catalog);
                Ok(())
            }
            OutputFormat::Json => print_json(&registry, self.catalog),
        }
    }
}

fn print_summary(registry: &ContentRegistry, catalog: Catalog) {
    if catalog.includes(Catalog::Tables) {
        println!("{}", style("Spawn tables:").bold().yellow());
        for entry in registry.list_spawn_tables() {
            println!("  {:<20} {}", style(&entry.key).bold(), entry.name);
        }
        println!();
    }

    if catalog.includes(Catalog::Presets) {
        println!("{}", style("Presets:").bold().yellow());
        for preset in registry.presets() {
            let (low, high) = preset.recommended_levels;
            println!(
                "  {:<20} {}  {}",
                style(&preset.key).bold(),
                preset.name,
                style(format!("L{low}-{high}, {}", preset.defaults.difficulty)).dim()
            );
        }
        println!();
    }

    if catalog.includes(Catalog::Regions) {
        println!("{}", style("Regions:").bold().yellow());
        for region in registry.regions() {
            let (low, high) = region.level_range;
            println!(
                "  {:<20} L{low}-{high}  presets: [{}]  tables: [{}]",
                style(&region.key).bold(),
                region.presets.join(", "),
                region.spawn_tables.join(", ")
            );
        }
        println!();
    }

    if catalog.includes(Catalog::Enemies) {
        println!("{}", style("Enemies:").bold().yellow());
        for enemy in registry.archetypes() {
            println!(
                "  {} {:<22} {:<10} {:<9} L{:<3} HP {}",
                enemy.emoji,
                style(&enemy.key).bold(),
                enemy.family,
                enemy.tier,
                enemy.level,
                enemy.hp
            );
        }
        println!();
    }
}

fn print_json(registry: &ContentRegistry, catalog: Catalog) -> Result<()> {
    let mut value = serde_json::Map::new();
    if catalog.includes(Catalog::Tables) {
        let tables: Vec<_> = registry
            .list_spawn_tables()
            .into_iter()
            .map(|entry| json!({ "key": entry.key, "name": entry.name }))
            .collect();
        value.insert("spawn_tables".into(), tables.into());
    }
    if catalog.includes(Catalog::Presets) {
        value.insert("presets".into(), serde_json::to_value(registry.presets())?);
    }
    if catalog.includes(Catalog::Regions) {
        value.insert("regions".into(), serde_json::to_value(registry.regions())?);
    }
    if catalog.includes(Catalog::Enemies) {
        value.insert("enemies".into(), serde_json::to_value(registry.archetypes())?);
    }
    output::print_json(&value)
}
