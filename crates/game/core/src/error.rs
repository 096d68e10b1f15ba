//! Common error infrastructure for stonefall-core.
//!
//! Domain-specific errors (e.g. [`crate::ActionError`], [`crate::EncounterError`])
//! live next to the operations that raise them. They all implement
//! [`GameError`] so hosts can route them uniformly: recoverable rejections
//! become inline notices, validation failures become "nothing to fight"
//! screens, and internal/fatal ones indicate a bug.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the player can pick another action (not enough AP, no items)
/// - **Validation**: the request itself was malformed (unknown table, bad target)
/// - **Internal**: state went out of sync and should be investigated
/// - **Fatal**: an invariant was broken; the session cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative action.
    ///
    /// Examples: insufficient AP, insufficient gold, item out of stock
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown spawn table, target already defeated
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: scheduler references an entity the session does not know
    Internal,

    /// Fatal error - turn invariants violated, cannot continue.
    ///
    /// Examples: popping a turn while another actor is still active
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

impl core::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common interface for all game errors.
///
/// Provides a stable machine-readable code next to the `Display` message so
/// hosts can map errors to UI notices without string matching.
pub trait GameError: core::error::Error {
    /// Returns the severity classification of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a stable error code for categorization (SCREAMING_SNAKE_CASE).
    fn error_code(&self) -> &'static str;

    /// Returns true if the player can simply be re-prompted.
    fn is_recoverable(&self) -> bool {
        self.severity().is_recoverable()
    }
}
