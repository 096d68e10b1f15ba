//! Headless battle driver.
//!
//! Allies swing at the weakest living enemy until their AP runs out; enemies
//! act through their AI tag. Time only moves while nobody is acting.

use anyhow::{Result, bail};
use rand::RngCore;
use tracing::{debug, info};

use stonefall_core::{CombatSession, CombatantId};

/// Simulated seconds per clock step.
pub const TICK: f64 = 0.05;

/// Plays `session` to the end and returns its log lines in order.
///
/// Fails if the fight is still running after `max_steps` steps.
pub fn run<R: RngCore>(
    session: &mut CombatSession<'_, R>,
    max_steps: usize,
) -> Result<Vec<String>> {
    let mut log = Vec::new();
    for _ in 0..max_steps {
        collect(session, &mut log);
        if session.is_over() {
            info!(
                outcome = ?session.outcome(),
                turns = session.turn_count(),
                "battle finished"
            );
            return Ok(log);
        }
        step(session)?;
    }
    collect(session, &mut log);
    if session.is_over() {
        return Ok(log);
    }
    bail!("Battle still running after {max_steps} steps")
}

/// Performs one decision or one clock step.
pub fn step<R: RngCore>(session: &mut CombatSession<'_, R>) -> Result<()> {
    match session.current_actor() {
        Some(actor @ CombatantId::Ally(_)) => match weakest_enemy(session) {
            Some(target) if session.ap(actor) > 0 => {
                debug!(%actor, target, "auto attack");
                session.attack(target)?;
            }
            _ => session.end_turn()?,
        },
        Some(CombatantId::Enemy(_)) => session.run_enemy_turn()?,
        None => {
            session.advance(TICK)?;
        }
    }
    Ok(())
}

/// Living enemy with the least HP; the first in formation order on ties.
pub fn weakest_enemy<R: RngCore>(session: &CombatSession<'_, R>) -> Option<usize> {
    let enemies = session.enemies();
    session
        .living_enemies()
        .into_iter()
        .min_by_key(|&index| enemies.get(index).map_or(u32::MAX, |e| e.hp_current))
}

fn collect<R: RngCore>(session: &mut CombatSession<'_, R>, log: &mut Vec<String>) {
    log.extend(
        session
            .drain_events()
            .iter()
            .filter_map(|event| event.as_log().map(str::to_string)),
    );
}
