//! Stat system.
//!
//! ```text
//! [ AttributeBlock (stored, 10–60) ] + [ GearModifiers (resolved) ] + base HP
//!      ↓
//! [ DerivedStats (pure, cached by owners) ]
//!      ↓
//! [ Status effects (combat only, see `combat::status`) ]
//! ```
//!
//! ## Principles
//!
//! 1. **SSOT**: only attributes, level and current HP are stored
//! 2. **Unidirectional Flow**: derived values never feed back into attributes
//! 3. **Deterministic**: pure functions, no I/O or randomness

pub mod attributes;
pub mod derived;
pub mod gear;

pub use attributes::{Attribute, AttributeBlock};
pub use derived::{
    CRIT_CAP_PCT, DEFAULT_BASE_HP, DerivedStats, STATUS_RESIST_CAP_PCT, atb_seconds,
};
pub use gear::GearModifiers;
