//! Turn-based combat.
//!
//! # Architecture
//!
//! - **Scheduler** ([`AtbScheduler`]): per-combatant readiness clocks, a FIFO
//!   ready queue, AP grants and carry-over. One actor acts at a time.
//! - **Session** ([`CombatSession`]): the per-fight state machine. Validates
//!   and resolves actions, runs enemy turns, applies statuses and rewards.
//! - **Combatants** ([`Combatant`]): capability interface shared by party
//!   members and [`EnemyInstance`]s.
//! - **Events** ([`CombatEvent`]): the only outbound channel; hosts drain
//!   them after each call and render however they like.
//!
//! Damage helpers in [`damage`] are pure and take the rng explicitly.

mod ability;
mod ai;
mod atb;
pub mod damage;
mod entity;
mod error;
mod events;
mod rewards;
mod session;
mod status;

#[cfg(test)]
pub(crate) mod testing;

pub use ability::{ability_cost, select_targets};
pub use ai::{pick_target, swing_damage};
pub use atb::{AtbScheduler, SchedulerError, TracingHook, TurnGrant, TurnHook};
pub use damage::{Hit, damage_for, magical_damage, physical_damage, strike};
pub use entity::{CombatState, Combatant, CombatantId, DamageTaken, EnemyInstance};
pub use error::{ActionError, CombatError};
pub use events::{CombatEvent, CombatOutcome};
pub use rewards::{BattleSummary, MemberStats, MemberSummary, Rewards, StatsLedger};
pub use session::{CombatPhase, CombatSession};
pub use status::{StatusEffect, StatusEffects, StatusKind};
