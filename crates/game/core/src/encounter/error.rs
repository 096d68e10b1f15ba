//! Encounter configuration errors.

use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};

/// Invalid encounter configuration.
///
/// Hosts surface these as a "no enemies available" state; combat never
/// starts against zero enemies.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncounterError {
    #[error("unknown spawn table '{0}'")]
    UnknownTable(String),

    #[error("unknown encounter preset '{0}'")]
    UnknownPreset(String),

    #[error("unknown region '{0}'")]
    UnknownRegion(String),

    #[error("region '{0}' has no spawn tables or presets")]
    EmptyRegion(String),

    #[error("no enemies match the requested filters")]
    NoCandidates,

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for EncounterError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Oracle(err) => err.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownTable(_) => "ENCOUNTER_UNKNOWN_TABLE",
            Self::UnknownPreset(_) => "ENCOUNTER_UNKNOWN_PRESET",
            Self::UnknownRegion(_) => "ENCOUNTER_UNKNOWN_REGION",
            Self::EmptyRegion(_) => "ENCOUNTER_EMPTY_REGION",
            Self::NoCandidates => "ENCOUNTER_NO_CANDIDATES",
            Self::Oracle(err) => err.error_code(),
        }
    }
}
