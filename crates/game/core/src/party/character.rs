//! Persistent party members.
//!
//! Only attributes, level, XP, equipment IDs and current HP are stored.
//! Gear modifiers and derived stats are rebuilt on demand: after a restore,
//! call [`PartyMember::rehydrate`] with the item catalog.

use std::cell::OnceCell;
use std::collections::BTreeMap;

use strum::IntoEnumIterator;
use tracing::debug;

use super::error::PartyError;
use crate::combat::{CombatState, Combatant};
use crate::config::ProgressionConfig;
use crate::env::{EquipmentSlot, ItemOracle};
use crate::stats::{Attribute, AttributeBlock, DerivedStats, GearModifiers};

/// Stable party member identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MemberId(pub u32);

impl core::fmt::Display for MemberId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Playable race.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Race {
    Human,
    Elf,
    Dwarf,
    Halfling,
    Goblinoid,
    Dragonling,
    Giantborn,
    Orc,
}

impl Race {
    /// Creation-time attribute bonuses.
    pub fn bonuses(self) -> Vec<(Attribute, i32)> {
        use Attribute::*;
        match self {
            Self::Human => Attribute::iter().map(|attr| (attr, 2)).collect(),
            Self::Elf => vec![(Dex, 2), (Int, 1)],
            Self::Dwarf => vec![(Con, 2), (Str, 1)],
            Self::Halfling => vec![(Dex, 2), (Lck, 1)],
            Self::Goblinoid => vec![(Lck, 2), (Dex, 1)],
            Self::Dragonling => vec![(Int, 2), (Con, 1)],
            Self::Giantborn => vec![(Con, 2), (Str, 1)],
            Self::Orc => vec![(Str, 2), (Con, 1)],
        }
    }
}

/// Playable class.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Class {
    Warrior,
    Ranger,
    Rogue,
    Wizard,
    Cleric,
    Bard,
}

impl Class {
    pub const fn base_hp(self) -> u32 {
        match self {
            Self::Warrior => 120,
            Self::Ranger => 105,
            Self::Rogue => 100,
            Self::Wizard => 90,
            Self::Cleric => 110,
            Self::Bard => 100,
        }
    }

    pub const fn primary(self) -> Attribute {
        match self {
            Self::Warrior => Attribute::Str,
            Self::Ranger | Self::Rogue => Attribute::Dex,
            Self::Wizard => Attribute::Int,
            Self::Cleric | Self::Bard => Attribute::Wis,
        }
    }
}

/// Equipped item IDs by slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Equipment {
    slots: BTreeMap<EquipmentSlot, String>,
}

impl Equipment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipmentSlot) -> Option<&str> {
        self.slots.get(&slot).map(String::as_str)
    }

    /// Puts `id` in `slot`, returning the previous occupant.
    pub fn equip(&mut self, slot: EquipmentSlot, id: impl Into<String>) -> Option<String> {
        self.slots.insert(slot, id.into())
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<String> {
        self.slots.remove(&slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EquipmentSlot, &str)> {
        self.slots.iter().map(|(slot, id)| (*slot, id.as_str()))
    }

    /// Sums the modifiers of every equipped item known to `items`.
    pub fn modifiers<I: ItemOracle + ?Sized>(&self, items: &I) -> GearModifiers {
        self.slots
            .values()
            .filter_map(|id| items.item(id))
            .filter_map(|item| item.equipment())
            .map(|(_, modifiers)| modifiers)
            .sum()
    }
}

/// Level-up result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XpGain {
    pub gained: u32,
    pub levels: u32,
    pub new_level: u32,
}

/// A persistent party member.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartyMember {
    pub id: MemberId,
    pub name: String,
    race: Race,
    class: Class,
    level: u32,
    xp: u32,
    attributes: AttributeBlock,
    unspent_points: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    equipment: Equipment,
    hp: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    combat: CombatState,
    #[cfg_attr(feature = "serde", serde(skip))]
    gear: GearModifiers,
    #[cfg_attr(feature = "serde", serde(skip))]
    derived: OnceCell<DerivedStats>,
}

impl PartyMember {
    /// Creates a level-1 member: 10s plus race bonus, full HP, unspent pool.
    pub fn new(
        id: MemberId,
        name: impl Into<String>,
        race: Race,
        class: Class,
        progression: &ProgressionConfig,
    ) -> Self {
        let mut attributes = AttributeBlock::starting();
        for (attribute, bonus) in race.bonuses() {
            attributes.add(attribute, bonus);
        }
        Self::with_attributes(id, name, race, class, attributes, progression.level1_points)
    }

    /// Creates a level-1 member with an explicit attribute block.
    pub fn with_attributes(
        id: MemberId,
        name: impl Into<String>,
        race: Race,
        class: Class,
        attributes: AttributeBlock,
        unspent_points: u32,
    ) -> Self {
        let mut member = Self {
            id,
            name: name.into(),
            race,
            class,
            level: 1,
            xp: 0,
            attributes,
            unspent_points,
            equipment: Equipment::empty(),
            hp: 0,
            combat: CombatState::default(),
            gear: GearModifiers::none(),
            derived: OnceCell::new(),
        };
        member.hp = member.max_hp();
        member
    }

    pub fn race(&self) -> Race {
        self.race
    }

    pub fn class(&self) -> Class {
        self.class
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn xp(&self) -> u32 {
        self.xp
    }

    pub fn attributes(&self) -> &AttributeBlock {
        &self.attributes
    }

    pub fn unspent_points(&self) -> u32 {
        self.unspent_points
    }

    pub fn equipment(&self) -> &Equipment {
        &self.equipment
    }

    pub fn gear(&self) -> &GearModifiers {
        &self.gear
    }

    /// Cached derived stats; recomputed after any invalidation.
    pub fn derived(&self) -> &DerivedStats {
        self.derived.get_or_init(|| {
            DerivedStats::derive(&self.attributes, &self.gear, self.class.base_hp())
        })
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.derived().hp
    }

    /// Sets current HP, clamped into `[0, max_hp]`.
    pub fn set_hp(&mut self, hp: u32) {
        self.hp = hp.min(self.max_hp());
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_full_hp(&self) -> bool {
        self.hp >= self.max_hp()
    }

    /// Spends unspent points on one attribute.
    ///
    /// Points beyond the attribute cap are not charged. Returns the number
    /// of points actually applied.
    pub fn allocate(&mut self, attribute: Attribute, points: u32) -> Result<u32, PartyError> {
        if points > self.unspent_points {
            return Err(PartyError::InsufficientPoints {
                requested: points,
                available: self.unspent_points,
            });
        }
        let applied = self.attributes.add(attribute, points as i32).max(0) as u32;
        self.unspent_points -= applied;
        self.refresh_hp_bounds();
        Ok(applied)
    }

    /// Cumulative XP required to reach `level`.
    pub fn xp_for_level(level: u32, progression: &ProgressionConfig) -> u32 {
        if level <= 1 {
            return 0;
        }
        progression
            .xp_curve_factor
            .saturating_mul(level)
            .saturating_mul(level - 1)
    }

    /// Adds XP and applies every level-up it pays for.
    pub fn grant_xp(&mut self, amount: u32, progression: &ProgressionConfig) -> XpGain {
        self.xp = self.xp.saturating_add(amount);
        let mut levels = 0;
        while self.level < progression.level_cap
            && self.xp >= Self::xp_for_level(self.level + 1, progression)
        {
            self.level += 1;
            self.unspent_points += progression.points_per_level;
            levels += 1;
        }
        if levels > 0 {
            debug!(member = %self.name, level = self.level, "level up");
            self.refresh_hp_bounds();
        }
        XpGain {
            gained: amount,
            levels,
            new_level: self.level,
        }
    }

    /// Equips an item from the catalog, returning the replaced item ID.
    pub fn equip<I: ItemOracle + ?Sized>(
        &mut self,
        id: &str,
        items: &I,
    ) -> Result<Option<String>, PartyError> {
        let item = items
            .item(id)
            .ok_or_else(|| PartyError::ItemNotFound(id.to_string()))?;
        let (slot, _) = item
            .equipment()
            .ok_or_else(|| PartyError::NotEquippable(id.to_string()))?;
        let previous = self.equipment.equip(slot, id);
        self.rehydrate(items);
        Ok(previous)
    }

    pub fn unequip<I: ItemOracle + ?Sized>(
        &mut self,
        slot: EquipmentSlot,
        items: &I,
    ) -> Option<String> {
        let removed = self.equipment.unequip(slot);
        self.rehydrate(items);
        removed
    }

    /// Rebuilds gear modifiers from equipment IDs and invalidates the cache.
    pub fn rehydrate<I: ItemOracle + ?Sized>(&mut self, items: &I) {
        self.gear = self.equipment.modifiers(items);
        self.refresh_hp_bounds();
    }

    /// Drops per-fight runtime fields.
    pub fn reset_combat(&mut self, carry_cap: u32) {
        self.combat = CombatState::new(carry_cap);
    }

    fn refresh_hp_bounds(&mut self) {
        self.derived = OnceCell::new();
        self.hp = self.hp.min(self.max_hp());
    }
}

impl Combatant for PartyMember {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn base_stats(&self) -> DerivedStats {
        *self.derived()
    }

    fn hp(&self) -> u32 {
        self.hp
    }

    fn max_hp(&self) -> u32 {
        PartyMember::max_hp(self)
    }

    fn set_hp(&mut self, hp: u32) {
        PartyMember::set_hp(self, hp);
    }

    fn pace_dexterity(&self) -> i32 {
        self.attributes.dex()
    }

    fn state(&self) -> &CombatState {
        &self.combat
    }

    fn state_mut(&mut self) -> &mut CombatState {
        &mut self.combat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ItemDefinition, ItemKind};

    fn member(race: Race, class: Class) -> PartyMember {
        PartyMember::new(MemberId(1), "Ava", race, class, &ProgressionConfig::default())
    }

    #[test]
    fn creation_applies_race_bonus_and_pool() {
        let elf = member(Race::Elf, Class::Wizard);
        assert_eq!(elf.attributes().dex(), 12);
        assert_eq!(elf.attributes().int(), 11);
        assert_eq!(elf.attributes().str(), 10);
        assert_eq!(elf.unspent_points(), 14);
        assert_eq!(elf.level(), 1);
        assert_eq!(elf.hp(), elf.max_hp());
        // 90 + 10×6 + 10×2
        assert_eq!(elf.max_hp(), 170);

        let human = member(Race::Human, Class::Warrior);
        assert!(Attribute::iter().all(|a| human.attributes().get(a) == 12));
    }

    #[test]
    fn allocation_spends_the_capped_pool() {
        let mut dwarf = member(Race::Dwarf, Class::Cleric);
        let before = dwarf.max_hp();
        assert_eq!(dwarf.allocate(Attribute::Con, 4), Ok(4));
        assert_eq!(dwarf.unspent_points(), 10);
        assert_eq!(dwarf.max_hp(), before + 24);
        assert_eq!(
            dwarf.allocate(Attribute::Wis, 11),
            Err(PartyError::InsufficientPoints {
                requested: 11,
                available: 10
            })
        );
        assert_eq!(dwarf.unspent_points(), 10);
    }

    #[test]
    fn allocation_stops_at_attribute_cap() {
        let mut hero = PartyMember::with_attributes(
            MemberId(2),
            "Cap",
            Race::Human,
            Class::Rogue,
            AttributeBlock::new(10, 58, 10, 10, 10, 10),
            10,
        );
        assert_eq!(hero.allocate(Attribute::Dex, 5), Ok(2));
        assert_eq!(hero.attributes().dex(), AttributeBlock::MAX);
        assert_eq!(hero.unspent_points(), 8);
    }

    #[test]
    fn xp_curve_levels_up() {
        let progression = ProgressionConfig::default();
        assert_eq!(PartyMember::xp_for_level(1, &progression), 0);
        assert_eq!(PartyMember::xp_for_level(2, &progression), 200);
        assert_eq!(PartyMember::xp_for_level(3, &progression), 600);

        let mut bard = member(Race::Halfling, Class::Bard);
        let gain = bard.grant_xp(199, &progression);
        assert_eq!(gain.levels, 0);
        let gain = bard.grant_xp(401, &progression);
        assert_eq!(gain, XpGain { gained: 401, levels: 2, new_level: 3 });
        assert_eq!(bard.unspent_points(), 14 + 8);
    }

    #[test]
    fn level_cap_holds() {
        let progression = ProgressionConfig {
            level_cap: 3,
            ..ProgressionConfig::default()
        };
        let mut orc = member(Race::Orc, Class::Warrior);
        orc.grant_xp(1_000_000, &progression);
        assert_eq!(orc.level(), 3);
    }

    #[test]
    fn equipment_feeds_derived_stats() {
        let items = vec![
            ItemDefinition {
                id: "iron_sword".into(),
                name: "Iron Sword".into(),
                kind: ItemKind::Equipment {
                    slot: EquipmentSlot::Weapon,
                    modifiers: GearModifiers {
                        weapon: 4,
                        ..GearModifiers::none()
                    },
                },
                price: 30,
                description: String::new(),
            },
            ItemDefinition {
                id: "torch".into(),
                name: "Torch".into(),
                kind: ItemKind::Material,
                price: 1,
                description: String::new(),
            },
        ];
        let mut ranger = member(Race::Orc, Class::Ranger);
        let base = ranger.derived().p_atk;
        assert_eq!(ranger.equip("iron_sword", &items), Ok(None));
        assert_eq!(ranger.derived().p_atk, base + 4);
        assert_eq!(
            ranger.equip("torch", &items),
            Err(PartyError::NotEquippable("torch".into()))
        );
        assert_eq!(
            ranger.equip("nothing", &items),
            Err(PartyError::ItemNotFound("nothing".into()))
        );
        assert_eq!(
            ranger.unequip(EquipmentSlot::Weapon, &items),
            Some("iron_sword".into())
        );
        assert_eq!(ranger.derived().p_atk, base);
    }

    #[test]
    fn hp_is_clamped() {
        let mut cleric = member(Race::Elf, Class::Cleric);
        let max = cleric.max_hp();
        cleric.set_hp(max + 50);
        assert_eq!(cleric.hp(), max);
        cleric.set_hp(0);
        assert!(!cleric.is_alive());
    }
}
