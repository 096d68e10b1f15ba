use super::atb::SchedulerError;
use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};

/// Rejected player or AI actions.
///
/// A rejected action never mutates HP, AP, inventory or turn state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("not enough AP: need {required}, have {available}")]
    InsufficientAp { required: u32, available: u32 },

    #[error("item '{0}' is not available")]
    ItemUnavailable(String),

    #[error("unknown ability '{0}'")]
    UnknownAbility(String),

    #[error("ability '{0}' is not unlocked for this character")]
    AbilityLocked(String),

    #[error("ability '{key}' is on cooldown for {turns} more turn(s)")]
    AbilityOnCooldown { key: String, turns: u8 },

    #[error("invalid target")]
    InvalidTarget,

    #[error("it is not an ally's turn")]
    NotAllyTurn,

    #[error("it is not an enemy's turn")]
    NotEnemyTurn,

    #[error("combat has ended")]
    CombatEnded,

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InsufficientAp { .. }
            | Self::ItemUnavailable(_)
            | Self::AbilityOnCooldown { .. } => ErrorSeverity::Recoverable,
            Self::Scheduler(inner) => inner.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientAp { .. } => "ACTION_INSUFFICIENT_AP",
            Self::ItemUnavailable(_) => "ACTION_ITEM_UNAVAILABLE",
            Self::UnknownAbility(_) => "ACTION_UNKNOWN_ABILITY",
            Self::AbilityLocked(_) => "ACTION_ABILITY_LOCKED",
            Self::AbilityOnCooldown { .. } => "ACTION_ABILITY_ON_COOLDOWN",
            Self::InvalidTarget => "ACTION_INVALID_TARGET",
            Self::NotAllyTurn => "ACTION_NOT_ALLY_TURN",
            Self::NotEnemyTurn => "ACTION_NOT_ENEMY_TURN",
            Self::CombatEnded => "ACTION_COMBAT_ENDED",
            Self::Scheduler(inner) => inner.error_code(),
        }
    }
}

/// Errors raised while starting a combat session.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error("the party has no living members")]
    EmptyParty,

    #[error("the encounter has no enemies")]
    EmptyEncounter,

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::EmptyParty | Self::EmptyEncounter => ErrorSeverity::Validation,
            Self::Oracle(inner) => inner.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyParty => "COMBAT_EMPTY_PARTY",
            Self::EmptyEncounter => "COMBAT_EMPTY_ENCOUNTER",
            Self::Oracle(inner) => inner.error_code(),
        }
    }
}
