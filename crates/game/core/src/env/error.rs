//! Oracle access errors.

use crate::error::{ErrorSeverity, GameError};

/// Errors that occur when accessing oracle data.
///
/// A missing oracle is fatal: the host wired the environment incorrectly.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("EnemyOracle not available")]
    EnemiesNotAvailable,

    #[error("TablesOracle not available")]
    TablesNotAvailable,

    #[error("AbilityOracle not available")]
    AbilitiesNotAvailable,

    #[error("ItemOracle not available")]
    ItemsNotAvailable,
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            EnemiesNotAvailable => "ORACLE_ENEMIES_NOT_AVAILABLE",
            TablesNotAvailable => "ORACLE_TABLES_NOT_AVAILABLE",
            AbilitiesNotAvailable => "ORACLE_ABILITIES_NOT_AVAILABLE",
            ItemsNotAvailable => "ORACLE_ITEMS_NOT_AVAILABLE",
        }
    }
}
