//! Budgeted procedural encounter roll.
//!
//! ```text
//! budget ─┐
//! tiers ──┼─► filtered pool ─► threat-sorted ─► weighted fill ─► boss cap
//! filters ┘
//! ```

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use tracing::{debug, trace};

use super::definition::EncounterDefinition;
use super::difficulty::{Difficulty, budget_for, threat_for};
use super::error::EncounterError;
use crate::config::EncounterConfig;
use crate::env::{
    EncounterSeed, EnemyArchetype, EnemyFilter, EnemyOracle, PcgRng, Tier, enemies_for,
    tiers_for_party_level,
};

/// Arguments for [`roll_encounter`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncounterRequest {
    pub party_level: u32,
    pub party_size: u32,
    pub difficulty: Difficulty,
    pub biomes: Option<Vec<String>>,
    pub families: Option<Vec<String>>,
    /// Explicit tier list; replaces the level-derived gate.
    pub tiers: Option<Vec<Tier>>,
    /// `None` draws a fresh seed from the thread RNG.
    pub seed: Option<EncounterSeed>,
    /// `None` uses [`EncounterConfig::default_max_enemies`].
    pub max_enemies: Option<usize>,
    pub allow_bosses_below_hard: bool,
}

impl EncounterRequest {
    pub fn new(party_level: u32, party_size: u32) -> Self {
        Self {
            party_level,
            party_size,
            ..Self::default()
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_seed(mut self, seed: impl Into<EncounterSeed>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    pub fn with_biomes<S: Into<String>>(mut self, biomes: impl IntoIterator<Item = S>) -> Self {
        self.biomes = Some(biomes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_families<S: Into<String>>(mut self, families: impl IntoIterator<Item = S>) -> Self {
        self.families = Some(families.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_tiers(mut self, tiers: impl IntoIterator<Item = Tier>) -> Self {
        self.tiers = Some(tiers.into_iter().collect());
        self
    }

    pub fn with_max_enemies(mut self, max_enemies: usize) -> Self {
        self.max_enemies = Some(max_enemies);
        self
    }

    pub fn allow_bosses_below_hard(mut self, allow: bool) -> Self {
        self.allow_bosses_below_hard = allow;
        self
    }

    /// Tiers the roll may draw from after the boss gate.
    pub fn allowed_tiers(&self) -> Vec<Tier> {
        let mut allowed = self
            .tiers
            .clone()
            .unwrap_or_else(|| tiers_for_party_level(self.party_level));
        if self.difficulty.is_easy_or_standard() && !self.allow_bosses_below_hard {
            allowed.retain(|tier| !tier.is_boss_or_above());
        }
        allowed
    }
}

impl Default for EncounterRequest {
    fn default() -> Self {
        Self {
            party_level: 1,
            party_size: 3,
            difficulty: Difficulty::Standard,
            biomes: None,
            families: None,
            tiers: None,
            seed: None,
            max_enemies: None,
            allow_bosses_below_hard: false,
        }
    }
}

/// An archetype paired with its threat for the current party.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Priced<'c> {
    pub enemy: &'c EnemyArchetype,
    pub threat: f64,
}

/// Prices and sorts a pool by ascending threat (stable on ties).
pub(crate) fn price_pool<'c>(
    pool: impl IntoIterator<Item = &'c EnemyArchetype>,
    party_level: u32,
    config: &EncounterConfig,
) -> Vec<Priced<'c>> {
    let mut priced: Vec<Priced<'c>> = pool
        .into_iter()
        .map(|enemy| Priced {
            enemy,
            threat: threat_for(enemy, party_level, config),
        })
        .collect();
    priced.sort_by(|a, b| a.threat.total_cmp(&b.threat));
    priced
}

/// Builds a generator for an optional seed.
pub(crate) fn rng_for(seed: Option<&EncounterSeed>) -> PcgRng {
    match seed {
        Some(seed) => PcgRng::from_encounter_seed(seed),
        None => {
            let fresh: u64 = rand::random();
            debug!(seed = fresh, "no encounter seed supplied; drew a fresh one");
            PcgRng::from_encounter_seed(&EncounterSeed::Number(fresh))
        }
    }
}

/// Rolls a budgeted encounter from the catalog.
///
/// The same request (including seed) always yields the same definition.
///
/// # Errors
///
/// [`EncounterError::NoCandidates`] when the tier/biome/family filters leave
/// nothing to pick from.
pub fn roll_encounter<O>(
    catalog: &O,
    request: &EncounterRequest,
    config: &EncounterConfig,
) -> Result<EncounterDefinition, EncounterError>
where
    O: EnemyOracle + ?Sized,
{
    let mut rng = rng_for(request.seed.as_ref());
    roll_encounter_with(catalog, request, config, &mut rng)
}

/// [`roll_encounter`] with a caller-supplied generator.
pub fn roll_encounter_with<O, R>(
    catalog: &O,
    request: &EncounterRequest,
    config: &EncounterConfig,
    rng: &mut R,
) -> Result<EncounterDefinition, EncounterError>
where
    O: EnemyOracle + ?Sized,
    R: Rng + ?Sized,
{
    let budget = f64::from(budget_for(request.party_size, request.difficulty, config));
    let allowed = request.allowed_tiers();
    let filter = EnemyFilter {
        biomes: request.biomes.as_deref(),
        families: request.families.as_deref(),
        tiers: Some(allowed.as_slice()),
    };

    let pool = enemies_for(catalog, request.party_level, &filter);
    if pool.is_empty() {
        debug!(?allowed, "encounter pool empty after filtering");
        return Err(EncounterError::NoCandidates);
    }

    let priced = price_pool(pool, request.party_level, config);
    let max_enemies = request
        .max_enemies
        .unwrap_or(config.default_max_enemies)
        .max(1);
    let early_stop = config.early_stop_chance.clamp(0.0, 1.0);

    debug!(
        budget,
        ?allowed,
        pool = priced.len(),
        difficulty = %request.difficulty,
        "rolling encounter"
    );

    let mut remaining = budget;
    let mut picked: Vec<Priced<'_>> = Vec::new();

    while picked.len() < max_enemies {
        let tolerance = if picked.is_empty() {
            config.first_pick_tolerance
        } else {
            config.tolerance
        };
        let candidates: Vec<&Priced<'_>> = priced
            .iter()
            .filter(|entry| entry.threat <= remaining * tolerance)
            .collect();
        if candidates.is_empty() {
            break;
        }

        // Cheaper enemies are proportionally more likely.
        let Ok(weights) = WeightedIndex::new(candidates.iter().map(|c| 1.0 / c.threat)) else {
            break;
        };
        let chosen = *candidates[weights.sample(rng)];
        trace!(enemy = %chosen.enemy.key, threat = chosen.threat, remaining, "picked");

        picked.push(chosen);
        remaining = (remaining - chosen.threat).max(0.0);
        if remaining < 1.0 || rng.gen_bool(early_stop) {
            break;
        }
    }

    if picked.is_empty() {
        // Degenerate budget: the cheapest candidate always fits.
        debug!(enemy = %priced[0].enemy.key, "budget too small; forcing cheapest pick");
        picked.push(priced[0]);
    }

    if request.difficulty != Difficulty::Deadly {
        cap_bosses(&mut picked, &priced);
    }

    Ok(picked.into_iter().map(|entry| entry.enemy.clone()).collect())
}

/// Keeps only the highest-level boss and backfills with the cheapest elite.
fn cap_bosses<'c>(picked: &mut Vec<Priced<'c>>, priced: &[Priced<'c>]) {
    let bosses: Vec<usize> = picked
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.enemy.tier.is_boss_or_above())
        .map(|(index, _)| index)
        .collect();
    if bosses.len() <= 1 {
        return;
    }

    // Earliest pick wins level ties.
    let strongest = bosses
        .iter()
        .copied()
        .reduce(|best, index| {
            if picked[index].enemy.level > picked[best].enemy.level {
                index
            } else {
                best
            }
        })
        .unwrap_or(bosses[0]);

    debug!(
        kept = %picked[strongest].enemy.key,
        dropped = bosses.len() - 1,
        "capping bosses below deadly"
    );

    let mut index = 0;
    picked.retain(|entry| {
        let keep = index == strongest || !entry.enemy.tier.is_boss_or_above();
        index += 1;
        keep
    });

    if let Some(elite) = priced.iter().find(|entry| entry.enemy.tier == Tier::Elite) {
        picked.push(*elite);
    }
}
