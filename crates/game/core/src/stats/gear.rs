//! Equipment contributions to derived stats.
//!
//! Gear modifiers are resolved from equipped item IDs against the item
//! catalog. They are NOT persisted; hosts rebuild them after a restore.

/// Flat bonuses contributed by equipped gear plus the class HP baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GearModifiers {
    /// Weapon attack bonus added to PAtk.
    pub weapon: i32,
    /// Focus bonus added to MAtk.
    pub focus: i32,
    /// Armor bonus added to DEF.
    pub armor: f64,
    /// Shield/offhand block bonus added to DEF.
    pub block: f64,
    /// Ward bonus added to RES.
    pub ward: f64,
    /// Extra crit chance (percentage points) from light weapons.
    pub crit: f64,
}

impl GearModifiers {
    pub const fn none() -> Self {
        Self {
            weapon: 0,
            focus: 0,
            armor: 0.0,
            block: 0.0,
            ward: 0.0,
            crit: 0.0,
        }
    }

    /// Sums two gear contributions.
    pub fn combine(self, other: Self) -> Self {
        Self {
            weapon: self.weapon + other.weapon,
            focus: self.focus + other.focus,
            armor: self.armor + other.armor,
            block: self.block + other.block,
            ward: self.ward + other.ward,
            crit: self.crit + other.crit,
        }
    }
}

impl Default for GearModifiers {
    fn default() -> Self {
        Self::none()
    }
}

impl core::iter::Sum for GearModifiers {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::none(), Self::combine)
    }
}
