//! Shared party inventory: item stacks keyed by item ID.

use std::collections::BTreeMap;

use super::error::PartyError;

/// Stacked inventory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Inventory {
    stacks: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn qty(&self, id: &str) -> u32 {
        self.stacks.get(id).copied().unwrap_or(0)
    }

    pub fn has(&self, id: &str) -> bool {
        self.qty(id) > 0
    }

    pub fn add(&mut self, id: impl Into<String>, qty: u32) {
        if qty == 0 {
            return;
        }
        let stack = self.stacks.entry(id.into()).or_insert(0);
        *stack = stack.saturating_add(qty);
    }

    /// Removes `qty` of `id`; empty stacks disappear.
    pub fn remove(&mut self, id: &str, qty: u32) -> Result<(), PartyError> {
        let held = self.qty(id);
        if held == 0 {
            return Err(PartyError::ItemNotFound(id.to_string()));
        }
        if held < qty {
            return Err(PartyError::InsufficientQuantity {
                id: id.to_string(),
                requested: qty,
                held,
            });
        }
        if held == qty {
            self.stacks.remove(id);
        } else {
            self.stacks.insert(id.to_string(), held - qty);
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.stacks.iter().map(|(id, qty)| (id.as_str(), *qty))
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}
