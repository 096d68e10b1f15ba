//! Enemy archetype catalog.
//!
//! Archetypes are immutable reference data. The encounter builders only ever
//! read them through [`EnemyOracle`]; instances with mutable HP are created
//! later by [`crate::encounter::EncounterDefinition::instantiate`].

/// Ordinal enemy strength classification.
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
#[repr(u8)]
pub enum Tier {
    Normal = 1,
    Elite = 2,
    Champion = 3,
    Boss = 4,
    Mythic = 5,
}

impl Tier {
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Boss and mythic enemies are capped to one per encounter below deadly.
    pub const fn is_boss_or_above(self) -> bool {
        matches!(self, Self::Boss | Self::Mythic)
    }
}

/// How an enemy chooses whom to hit.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AiBehavior {
    /// Focus the living ally with the least current HP.
    #[strum(serialize = "lowest")]
    #[cfg_attr(feature = "serde", serde(rename = "lowest"))]
    LowestHp,
    /// Uniformly random living ally.
    #[default]
    Random,
}

/// Inclusive damage die, e.g. `[1, 4]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRange {
    pub min: u32,
    pub max: u32,
}

impl DamageRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn roll<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if self.min >= self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

impl Default for DamageRange {
    fn default() -> Self {
        Self::new(1, 4)
    }
}

/// A named special action listed on an archetype.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyMove {
    pub key: String,
    pub name: String,
    /// Damage flavor ("slashing", "cold", ...), display only.
    pub kind: String,
    pub damage: DamageRange,
}

/// Immutable enemy definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyArchetype {
    pub key: String,
    pub family: String,
    pub tier: Tier,
    /// Recommended party-level baseline.
    pub level: u32,
    pub hp: u32,
    pub atk: i32,
    pub def: i32,
    pub damage: DamageRange,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ai: AiBehavior,
    #[cfg_attr(feature = "serde", serde(default))]
    pub emoji: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub moves: Vec<EnemyMove>,
    /// Biome / habitat tags.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Vec<String>,
}

impl EnemyArchetype {
    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        tags.iter().any(|tag| self.tags.contains(tag))
    }
}

/// Read-only access to the enemy catalog.
pub trait EnemyOracle: Send + Sync {
    /// Looks up an archetype by key.
    fn archetype(&self, key: &str) -> Option<&EnemyArchetype>;

    /// All archetypes, sorted by key.
    fn archetypes(&self) -> &[EnemyArchetype];
}

/// A plain slice is a valid catalog as long as it is sorted by key.
impl EnemyOracle for [EnemyArchetype] {
    fn archetype(&self, key: &str) -> Option<&EnemyArchetype> {
        self.iter().find(|enemy| enemy.key == key)
    }

    fn archetypes(&self) -> &[EnemyArchetype] {
        self
    }
}

impl EnemyOracle for Vec<EnemyArchetype> {
    fn archetype(&self, key: &str) -> Option<&EnemyArchetype> {
        self.as_slice().archetype(key)
    }

    fn archetypes(&self) -> &[EnemyArchetype] {
        self
    }
}

/// Level → allowed tiers. Keeps low-level parties away from bosses.
pub fn tiers_for_party_level(level: u32) -> Vec<Tier> {
    match level {
        0..=2 => vec![Tier::Normal],
        3..=4 => vec![Tier::Normal, Tier::Elite],
        5..=6 => vec![Tier::Elite, Tier::Champion],
        7..=8 => vec![Tier::Champion, Tier::Boss],
        _ => vec![Tier::Boss, Tier::Mythic],
    }
}

/// Catalog filter used by both encounter builders.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnemyFilter<'a> {
    /// Keep enemies carrying any of these tags.
    pub biomes: Option<&'a [String]>,
    /// Keep enemies whose family is listed.
    pub families: Option<&'a [String]>,
    /// Allowed tiers; `None` derives them from the party level.
    pub tiers: Option<&'a [Tier]>,
}

/// Filters the catalog, preserving its key order.
pub fn enemies_for<'c, O>(
    catalog: &'c O,
    party_level: u32,
    filter: &EnemyFilter<'_>,
) -> Vec<&'c EnemyArchetype>
where
    O: EnemyOracle + ?Sized,
{
    let level_tiers;
    let allowed = match filter.tiers {
        Some(tiers) => tiers,
        None => {
            level_tiers = tiers_for_party_level(party_level);
            level_tiers.as_slice()
        }
    };

    catalog
        .archetypes()
        .iter()
        .filter(|enemy| allowed.contains(&enemy.tier))
        .filter(|enemy| filter.biomes.is_none_or(|biomes| enemy.has_any_tag(biomes)))
        .filter(|enemy| filter.families.is_none_or(|families| families.contains(&enemy.family)))
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn archetype(
        key: &str,
        family: &str,
        tier: Tier,
        level: u32,
        tags: &[&str],
    ) -> EnemyArchetype {
        EnemyArchetype {
            key: key.to_string(),
            family: family.to_string(),
            tier,
            level,
            hp: 10 + level * 2,
            atk: 3,
            def: 10,
            damage: DamageRange::new(1, 4),
            ai: AiBehavior::Random,
            emoji: String::new(),
            moves: Vec::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Small catalog spanning every tier, sorted by key.
    pub fn catalog() -> Vec<EnemyArchetype> {
        let mut enemies = vec![
            archetype("Bandit", "Humanoid", Tier::Normal, 2, &["road", "camp"]),
            archetype("Bear", "Beast", Tier::Elite, 4, &["forest"]),
            archetype("Black Dragon", "Dragon", Tier::Boss, 11, &["swamp", "boss"]),
            archetype("Goblin", "Goblinoid", Tier::Normal, 1, &["plains", "caves"]),
            archetype("Goblin Captain", "Goblinoid", Tier::Elite, 4, &["plains", "caves"]),
            archetype("Ice Drake", "Dragon", Tier::Champion, 9, &["tundra", "sky"]),
            archetype("Lich", "Undead", Tier::Boss, 9, &["ruin", "boss"]),
            archetype("Skeleton", "Undead", Tier::Normal, 2, &["crypt"]),
            archetype("Slime", "Ooze", Tier::Normal, 1, &["caves"]),
            archetype("Tarrasque", "Monstrosity", Tier::Mythic, 14, &["boss"]),
            archetype("White Dragon", "Dragon", Tier::Boss, 12, &["tundra", "boss"]),
            archetype("Wolf", "Beast", Tier::Normal, 1, &["forest", "pack"]),
            archetype("Wraith", "Undead", Tier::Champion, 7, &["ruin", "night"]),
        ];
        enemies.sort_by(|a, b| a.key.cmp(&b.key));
        enemies
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::catalog;
    use super::*;

    #[test]
    fn tier_gates_are_monotonic() {
        assert_eq!(tiers_for_party_level(1), vec![Tier::Normal]);
        assert_eq!(tiers_for_party_level(4), vec![Tier::Normal, Tier::Elite]);
        assert_eq!(tiers_for_party_level(6), vec![Tier::Elite, Tier::Champion]);
        assert_eq!(tiers_for_party_level(8), vec![Tier::Champion, Tier::Boss]);
        assert_eq!(tiers_for_party_level(12), vec![Tier::Boss, Tier::Mythic]);

        let mut previous = Tier::Normal;
        for level in 1..=15 {
            let highest = *tiers_for_party_level(level).iter().max().unwrap();
            assert!(highest >= previous);
            previous = highest;
        }
    }

    #[test]
    fn filter_by_biome_matches_any_tag() {
        let catalog = catalog();
        let biomes = vec!["forest".to_string(), "road".to_string()];
        let filter = EnemyFilter {
            biomes: Some(biomes.as_slice()),
            ..Default::default()
        };
        let keys: Vec<&str> = enemies_for(&catalog, 1, &filter)
            .into_iter()
            .map(|e| e.key.as_str())
            .collect();
        assert_eq!(keys, vec!["Bandit", "Wolf"]);
    }

    #[test]
    fn explicit_tiers_override_level_gate() {
        let catalog = catalog();
        let families = vec!["Dragon".to_string()];
        let tiers = [Tier::Boss];
        let filter = EnemyFilter {
            families: Some(families.as_slice()),
            tiers: Some(tiers.as_slice()),
            ..Default::default()
        };
        let keys: Vec<&str> = enemies_for(&catalog, 1, &filter)
            .into_iter()
            .map(|e| e.key.as_str())
            .collect();
        assert_eq!(keys, vec!["Black Dragon", "White Dragon"]);
    }

    #[test]
    fn ai_tags_parse_from_catalog_strings() {
        assert_eq!("lowest".parse::<AiBehavior>().unwrap(), AiBehavior::LowestHp);
        assert_eq!("random".parse::<AiBehavior>().unwrap(), AiBehavior::Random);
        assert_eq!("boss".parse::<Tier>().unwrap(), Tier::Boss);
    }
}
