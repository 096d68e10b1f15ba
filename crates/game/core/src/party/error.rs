use super::character::MemberId;
use crate::error::{ErrorSeverity, GameError};

/// Errors raised by roster, allocation, inventory and market operations.
///
/// Every variant leaves the party untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PartyError {
    #[error("not enough gold: need {needed}, have {available}")]
    InsufficientGold { needed: u32, available: u32 },

    #[error("not enough unspent points: requested {requested}, have {available}")]
    InsufficientPoints { requested: u32, available: u32 },

    #[error("party member {0} not found")]
    MemberNotFound(MemberId),

    #[error("party member {0} already exists")]
    DuplicateMember(MemberId),

    #[error("party is full ({max} members)")]
    PartyFull { max: usize },

    #[error("item '{0}' not found")]
    ItemNotFound(String),

    #[error("not enough '{id}': requested {requested}, have {held}")]
    InsufficientQuantity { id: String, requested: u32, held: u32 },

    #[error("item '{0}' cannot be equipped")]
    NotEquippable(String),
}

impl GameError for PartyError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MemberNotFound(_) => ErrorSeverity::Internal,
            Self::InsufficientGold { .. }
            | Self::InsufficientPoints { .. }
            | Self::InsufficientQuantity { .. } => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientGold { .. } => "PARTY_INSUFFICIENT_GOLD",
            Self::InsufficientPoints { .. } => "PARTY_INSUFFICIENT_POINTS",
            Self::MemberNotFound(_) => "PARTY_MEMBER_NOT_FOUND",
            Self::DuplicateMember(_) => "PARTY_DUPLICATE_MEMBER",
            Self::PartyFull { .. } => "PARTY_FULL",
            Self::ItemNotFound(_) => "PARTY_ITEM_NOT_FOUND",
            Self::InsufficientQuantity { .. } => "PARTY_INSUFFICIENT_QUANTITY",
            Self::NotEquippable(_) => "PARTY_NOT_EQUIPPABLE",
        }
    }
}
