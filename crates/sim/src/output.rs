//! Rendering for previews and battle reports.

use anyhow::Result;
use console::style;
use serde::Serialize;

use stonefall_core::encounter::EncounterPreview;
use stonefall_core::{BattleSummary, EncounterSeed};

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Summary,
    /// Full JSON output
    Json,
}

/// A rolled encounter as printed by the preview commands.
#[derive(Serialize)]
pub struct PreviewReport<'a> {
    pub source: String,
    pub seed: &'a EncounterSeed,
    pub preview: &'a EncounterPreview,
}

/// A finished auto-battle.
#[derive(Serialize)]
pub struct BattleReport<'a> {
    #[serde(flatten)]
    pub encounter: PreviewReport<'a>,
    pub log: &'a [String],
    pub summary: &'a BattleSummary,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_preview(report: &PreviewReport<'_>) {
    let preview = report.preview;
    println!(
        "{} {}  {}",
        style("Encounter:").bold().cyan(),
        report.source,
        style(format!("(seed {})", report.seed)).dim()
    );
    println!();

    if preview.rows.is_empty() {
        println!("  (no enemies)");
    }
    for row in &preview.rows {
        println!(
            "  {} {} x{}  {}  L{}",
            row.emoji,
            style(&row.key).bold(),
            row.count,
            style(row.tier).yellow(),
            row.level
        );
    }
    println!();
    println!(
        "{} {}",
        style("Total enemies:").bold().cyan(),
        preview.total_enemies
    );
    println!(
        "{} {}-{}  {} {}-{}  {} {}",
        style("XP:").bold().cyan(),
        preview.xp_range.min,
        preview.xp_range.max,
        style("Gold:").bold().cyan(),
        preview.gold_range.min,
        preview.gold_range.max,
        style("Threat XP:").bold().cyan(),
        preview.threat_xp
    );
}

pub fn print_battle(report: &BattleReport<'_>) {
    print_preview(&report.encounter);
    println!();
    println!("{}", style("=== Battle Log ===").bold().green());
    for line in report.log {
        println!("  {line}");
    }
    println!();

    let summary = report.summary;
    println!("{}", style("=== Summary ===").bold().green());
    println!(
        "{} {}  {} {}",
        style("Outcome:").bold().cyan(),
        style(summary.outcome).bold(),
        style("Turns:").bold().cyan(),
        summary.turns
    );
    if summary.rewards.is_some() {
        println!(
            "{} {}  {} {}",
            style("XP:").bold().cyan(),
            summary.xp_gained(),
            style("Gold:").bold().cyan(),
            summary.gold_gained()
        );
        if !summary.loot().is_empty() {
            println!(
                "{} {}",
                style("Loot:").bold().cyan(),
                summary.loot().join(", ")
            );
        }
    }
    println!();

    println!("{}", style("Party:").bold().yellow());
    for member in &summary.members {
        let stats = &member.stats;
        print!(
            "  {:<6} dealt {:>4}  taken {:>4}  healed {:>4}",
            member.name, stats.dealt, stats.taken, stats.heal_given
        );
        match &member.level_up {
            Some(gain) if gain.levels > 0 => {
                println!("  {}", style(format!("level {}!", gain.new_level)).green())
            }
            _ => println!(),
        }
    }
}
