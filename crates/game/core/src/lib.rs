//! Deterministic rules for a turn-based party RPG.
//!
//! `stonefall-core` defines the canonical rules (stats, encounter generation,
//! ATB combat, party progression) and exposes pure APIs that hosts drive
//! step by step. Static content reaches the rules only through the oracle
//! traits in [`env`]; randomness only through an explicit rng or seed.
//! Supporting crates depend on the types re-exported here.
pub mod combat;
pub mod config;
pub mod encounter;
pub mod env;
pub mod error;
pub mod party;
pub mod stats;

pub use combat::{
    ActionError, AtbScheduler, BattleSummary, CombatError, CombatEvent, CombatOutcome,
    CombatPhase, CombatSession, Combatant, CombatantId, EnemyInstance, Rewards, SchedulerError,
    TurnGrant, TurnHook,
};
pub use config::{CombatConfig, EncounterConfig, GameConfig, ProgressionConfig, RewardRange};
pub use encounter::{
    Difficulty, EncounterDefinition, EncounterError, EncounterRequest, PresetOverrides,
    RegionRequest, TableRequest, build_from_table, roll_encounter, roll_for_region, roll_preset,
};
pub use env::{
    AbilityDefinition, AbilityOracle, EncounterSeed, EnemyArchetype, EnemyOracle, Env, GameEnv,
    ItemDefinition, ItemOracle, OracleError, PcgRng, TablesOracle, Tier,
};
pub use error::{ErrorSeverity, GameError};
pub use party::{Class, Inventory, MemberId, Party, PartyError, PartyMember, Race};
pub use stats::{Attribute, AttributeBlock, DerivedStats};
