use crate::stats::GearModifiers;

/// Equipment slot an item occupies.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Offhand,
    Focus,
    Ward,
}

/// What a consumable does when used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ConsumableEffect {
    /// Restore a flat amount of HP (never past max).
    Heal(u32),
    /// Light source; no combat effect.
    Light,
}

/// Item type with type-specific data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ItemKind {
    Consumable(ConsumableEffect),
    Equipment {
        slot: EquipmentSlot,
        modifiers: GearModifiers,
    },
    Material,
    Quest,
}

/// Item definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    /// Buy price in gold; selling returns half, rounded down.
    #[cfg_attr(feature = "serde", serde(default))]
    pub price: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
}

impl ItemDefinition {
    pub fn sell_price(&self) -> u32 {
        self.price / 2
    }

    pub fn consumable_effect(&self) -> Option<ConsumableEffect> {
        match self.kind {
            ItemKind::Consumable(effect) => Some(effect),
            _ => None,
        }
    }

    pub fn equipment(&self) -> Option<(EquipmentSlot, GearModifiers)> {
        match self.kind {
            ItemKind::Equipment { slot, modifiers } => Some((slot, modifiers)),
            _ => None,
        }
    }
}

pub trait ItemOracle: Send + Sync {
    fn item(&self, id: &str) -> Option<&ItemDefinition>;

    /// Returns all item definitions available in this oracle.
    fn items(&self) -> Vec<&ItemDefinition>;
}

impl ItemOracle for Vec<ItemDefinition> {
    fn item(&self, id: &str) -> Option<&ItemDefinition> {
        self.iter().find(|item| item.id == id)
    }

    fn items(&self) -> Vec<&ItemDefinition> {
        self.iter().collect()
    }
}
