//! Outbound notifications.
//!
//! The session never renders anything. It pushes events into an ordered
//! queue that the host drains after each call.

use super::entity::CombatantId;

/// How a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatOutcome {
    Victory,
    Defeat,
    Fled,
}

/// One entry of the session's event stream.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    /// Human-readable log line.
    Log(String),
    /// State changed; redraw.
    Refresh,
    TurnStarted { actor: CombatantId, ap: u32 },
    TurnEnded { actor: CombatantId, carried: u32 },
    Defeated(CombatantId),
    Ended(CombatOutcome),
}

impl CombatEvent {
    pub fn as_log(&self) -> Option<&str> {
        match self {
            Self::Log(line) => Some(line),
            _ => None,
        }
    }
}
