//! Base attributes - the only stats that are permanently stored.
//!
//! Every attribute lives on a compressed 10–60 band. Anything outside the
//! band is clamped on write, so derived formulas never see extreme input.

/// The six base attributes.
///
/// - **STR**: physical attack, a little HP
/// - **DEX**: turn pace, defense, crit
/// - **CON**: HP, defense, resist
/// - **INT**: magical attack, status potency
/// - **WIS**: resist, healing, status potency
/// - **LCK**: crit and status resistance
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
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Attribute {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Lck,
}

/// Six attribute values, each kept inside [`AttributeBlock::MIN`, `AttributeBlock::MAX`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE", from = "RawAttributes"))]
pub struct AttributeBlock {
    str: i32,
    dex: i32,
    con: i32,
    int: i32,
    wis: i32,
    lck: i32,
}

impl AttributeBlock {
    pub const MIN: i32 = 10;
    pub const MAX: i32 = 60;

    /// Builds a block, clamping every value into the legal band.
    pub fn new(str: i32, dex: i32, con: i32, int: i32, wis: i32, lck: i32) -> Self {
        Self {
            str: Self::clamp(str),
            dex: Self::clamp(dex),
            con: Self::clamp(con),
            int: Self::clamp(int),
            wis: Self::clamp(wis),
            lck: Self::clamp(lck),
        }
    }

    /// Every attribute at the same value.
    pub fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value, value, value)
    }

    /// Starting block for new characters: the floor in every attribute.
    pub fn starting() -> Self {
        Self::uniform(Self::MIN)
    }

    #[inline]
    pub fn clamp(value: i32) -> i32 {
        value.clamp(Self::MIN, Self::MAX)
    }

    pub fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Str => self.str,
            Attribute::Dex => self.dex,
            Attribute::Con => self.con,
            Attribute::Int => self.int,
            Attribute::Wis => self.wis,
            Attribute::Lck => self.lck,
        }
    }

    /// Sets an attribute, clamping into the band.
    pub fn set(&mut self, attribute: Attribute, value: i32) {
        let value = Self::clamp(value);
        match attribute {
            Attribute::Str => self.str = value,
            Attribute::Dex => self.dex = value,
            Attribute::Con => self.con = value,
            Attribute::Int => self.int = value,
            Attribute::Wis => self.wis = value,
            Attribute::Lck => self.lck = value,
        }
    }

    /// Adds `delta` to an attribute and returns the change actually applied
    /// after clamping.
    pub fn add(&mut self, attribute: Attribute, delta: i32) -> i32 {
        let before = self.get(attribute);
        self.set(attribute, before.saturating_add(delta));
        self.get(attribute) - before
    }

    pub fn str(&self) -> i32 {
        self.str
    }

    pub fn dex(&self) -> i32 {
        self.dex
    }

    pub fn con(&self) -> i32 {
        self.con
    }

    pub fn int(&self) -> i32 {
        self.int
    }

    pub fn wis(&self) -> i32 {
        self.wis
    }

    pub fn lck(&self) -> i32 {
        self.lck
    }
}

impl Default for AttributeBlock {
    fn default() -> Self {
        Self::starting()
    }
}

/// Wire shape of [`AttributeBlock`]; restored values go back through the clamp.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
struct RawAttributes {
    str: i32,
    dex: i32,
    con: i32,
    int: i32,
    wis: i32,
    lck: i32,
}

#[cfg(feature = "serde")]
impl From<RawAttributes> for AttributeBlock {
    fn from(raw: RawAttributes) -> Self {
        Self::new(raw.str, raw.dex, raw.con, raw.int, raw.wis, raw.lck)
    }
}
