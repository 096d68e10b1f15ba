//! Persistent party state: roster, gold and shared inventory.
//!
//! The host owns the canonical [`Party`] and lends it to a combat session by
//! mutable reference; there is no global party.
mod character;
mod error;
mod inventory;

pub use character::{Class, Equipment, MemberId, PartyMember, Race, XpGain};
pub use error::PartyError;
pub use inventory::Inventory;

use tracing::debug;

use crate::config::ProgressionConfig;
use crate::env::ItemOracle;

/// The player's party.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Party {
    members: Vec<PartyMember>,
    pub gold: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub inventory: Inventory,
    max_members: usize,
    next_id: u32,
}

impl Party {
    pub fn new(progression: &ProgressionConfig) -> Self {
        Self {
            members: Vec::new(),
            gold: 0,
            inventory: Inventory::empty(),
            max_members: progression.max_party_size,
            next_id: 1,
        }
    }

    /// Creates and adds a fresh level-1 member.
    pub fn recruit(
        &mut self,
        name: impl Into<String>,
        race: Race,
        class: Class,
        progression: &ProgressionConfig,
    ) -> Result<MemberId, PartyError> {
        self.ensure_space()?;
        let id = MemberId(self.next_id);
        self.next_id += 1;
        self.members
            .push(PartyMember::new(id, name, race, class, progression));
        Ok(id)
    }

    /// Adds an existing member; its ID must be unique in the party.
    pub fn add_member(&mut self, member: PartyMember) -> Result<MemberId, PartyError> {
        let id = member.id;
        if self.member(id).is_some() {
            return Err(PartyError::DuplicateMember(id));
        }
        self.ensure_space()?;
        self.next_id = self.next_id.max(id.0 + 1);
        self.members.push(member);
        Ok(id)
    }

    pub fn remove_member(&mut self, id: MemberId) -> Result<PartyMember, PartyError> {
        let index = self
            .members
            .iter()
            .position(|m| m.id == id)
            .ok_or(PartyError::MemberNotFound(id))?;
        Ok(self.members.remove(index))
    }

    pub fn member(&self, id: MemberId) -> Option<&PartyMember> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn member_mut(&mut self, id: MemberId) -> Option<&mut PartyMember> {
        self.members.iter_mut().find(|m| m.id == id)
    }

    pub fn members(&self) -> &[PartyMember] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [PartyMember] {
        &mut self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn has_space(&self) -> bool {
        self.members.len() < self.max_members
    }

    /// Rounded mean level, at least 1.
    pub fn average_level(&self) -> u32 {
        if self.members.is_empty() {
            return 1;
        }
        let sum: u32 = self.members.iter().map(PartyMember::level).sum();
        let len = self.members.len() as f64;
        (f64::from(sum) / len).round().max(1.0) as u32
    }

    pub fn any_alive(&self) -> bool {
        self.members.iter().any(PartyMember::is_alive)
    }

    pub fn add_gold(&mut self, amount: u32) -> u32 {
        self.gold = self.gold.saturating_add(amount);
        self.gold
    }

    pub fn spend_gold(&mut self, amount: u32) -> Result<u32, PartyError> {
        if self.gold < amount {
            return Err(PartyError::InsufficientGold {
                needed: amount,
                available: self.gold,
            });
        }
        self.gold -= amount;
        Ok(self.gold)
    }

    /// Buys `qty` of an item at catalog price.
    pub fn buy_item<I: ItemOracle + ?Sized>(
        &mut self,
        id: &str,
        qty: u32,
        items: &I,
    ) -> Result<u32, PartyError> {
        let item = items
            .item(id)
            .ok_or_else(|| PartyError::ItemNotFound(id.to_string()))?;
        let cost = item.price.saturating_mul(qty);
        self.spend_gold(cost)?;
        self.inventory.add(id, qty);
        debug!(item = id, qty, cost, "bought");
        Ok(cost)
    }

    /// Sells `qty` of an item for half price each, rounded down.
    pub fn sell_item<I: ItemOracle + ?Sized>(
        &mut self,
        id: &str,
        qty: u32,
        items: &I,
    ) -> Result<u32, PartyError> {
        let item = items
            .item(id)
            .ok_or_else(|| PartyError::ItemNotFound(id.to_string()))?;
        self.inventory.remove(id, qty)?;
        let earned = item.sell_price().saturating_mul(qty);
        self.add_gold(earned);
        debug!(item = id, qty, earned, "sold");
        Ok(earned)
    }

    /// Splits `total` XP evenly (rounded down) and levels up each member.
    pub fn grant_xp(
        &mut self,
        total: u32,
        progression: &ProgressionConfig,
    ) -> Vec<(MemberId, XpGain)> {
        if self.members.is_empty() {
            return Vec::new();
        }
        let each = total / self.members.len() as u32;
        self.members
            .iter_mut()
            .map(|member| (member.id, member.grant_xp(each, progression)))
            .collect()
    }

    /// Rebuilds every member's gear modifiers after a restore.
    pub fn rehydrate<I: ItemOracle + ?Sized>(&mut self, items: &I) {
        for member in &mut self.members {
            member.rehydrate(items);
        }
    }

    fn ensure_space(&self) -> Result<(), PartyError> {
        if self.has_space() {
            Ok(())
        } else {
            Err(PartyError::PartyFull {
                max: self.max_members,
            })
        }
    }
}
