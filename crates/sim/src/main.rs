//! Headless simulator for Stonefall.
//!
//! Previews encounters from the catalog, spawn tables, presets and regions
//! by seed, and runs auto-played battles against them.
//! Run with: `cargo run -p stonefall-sim -- <command>`

mod autoplay;
mod commands;
mod content;
mod dirs;
mod logging;
mod output;

use anyhow::Result;
use clap::Parser;
use commands::{Battle, List, Preset, Region, Roll, Table};

/// Headless encounter and battle simulator
#[derive(Parser)]
#[command(name = "stonefall-sim")]
#[command(about = "Encounter previews and auto-battles for Stonefall", long_about = None)]
#[command(version)]
struct Cli {
    /// Also write logs to the platform cache directory
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Roll a budgeted encounter from the enemy catalog
    Roll(Roll),

    /// Build an encounter from a spawn table
    Table(Table),

    /// Roll an encounter from a named preset
    Preset(Preset),

    /// Roll an encounter for a world region
    Region(Region),

    /// Auto-play a battle and print its log and summary
    Battle(Battle),

    /// List spawn tables, presets, regions and enemies
    List(List),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for STONEFALL_DATA_DIR, RUST_LOG, ...)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = logging::init(cli.log_file)?;

    match cli.command {
        Command::Roll(cmd) => cmd.execute(),
        Command::Table(cmd) => cmd.execute(),
        Command::Preset(cmd) => cmd.execute(),
        Command::Region(cmd) => cmd.execute(),
        Command::Battle(cmd) => cmd.execute(),
        Command::List(cmd) => cmd.execute(),
    }
}
