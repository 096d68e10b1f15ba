//! Seeded random number generation for encounter building.
//!
//! The encounter builder must reproduce the same picks for the same seed on
//! every platform, so it never touches ambient randomness when a seed is
//! supplied. In-combat rolls accept any [`rand::RngCore`]; tests inject a
//! seeded [`PcgRng`] there too.
//!
//! # Determinism
//!
//! `PcgRng` is a plain 64-bit LCG with a fixed output permutation, so a seed
//! maps to exactly one stream regardless of target or build profile.

use rand::{RngCore, SeedableRng};

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR variant: 64-bit state, 32-bit output.
///
/// # Properties
///
/// - **Deterministic**: Same seed always produces same output
/// - **Fast**: Single multiply + xorshift + rotate
/// - **Small state**: Only 64 bits
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Creates a generator whose stream is fully determined by `seed`.
    pub fn new(seed: u64) -> Self {
        // Step once so seed 0 doesn't emit a zero first word.
        Self {
            state: Self::pcg_step(avalanche(seed)),
        }
    }

    /// Creates a generator from an encounter seed (string or number).
    pub fn from_encounter_seed(seed: &EncounterSeed) -> Self {
        Self::new(seed.to_state())
    }

    /// Advance the PCG state by one step.
    ///
    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// PCG output function using XSH-RR (xorshift high, random rotate).
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        // XOR upper bits with lower bits, shift right
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;

        // Use upper bits to determine rotation amount
        let rot = (state >> 59) as u32;

        xorshifted.rotate_right(rot)
    }
}

impl RngCore for PcgRng {
    fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = Self::pcg_step(old);
        Self::pcg_output(old)
    }

    fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.next_u32());
        let low = u64::from(self.next_u32());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let word = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for PcgRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}

/// Seed accepted by the encounter builders.
///
/// Debug tooling passes short strings ("t1", "forest-42"); saves and tests may
/// pass raw numbers. Both hash to a 64-bit PCG state deterministically.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum EncounterSeed {
    Number(u64),
    Text(String),
}

impl EncounterSeed {
    /// Hashes the seed into a generator state.
    pub fn to_state(&self) -> u64 {
        match self {
            Self::Number(n) => mix_seed(*n, 0, 0),
            Self::Text(text) => {
                let folded = text.bytes().fold(0xcbf29ce484222325_u64, |hash, byte| {
                    (hash ^ u64::from(byte)).wrapping_mul(0x100000001b3)
                });
                mix_seed(folded, text.len() as u64, 1)
            }
        }
    }
}

impl From<u64> for EncounterSeed {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for EncounterSeed {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for EncounterSeed {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl core::str::FromStr for EncounterSeed {
    type Err = core::convert::Infallible;

    /// Numeric strings become numeric seeds; anything else is hashed as text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<u64>()
            .map(Self::Number)
            .unwrap_or_else(|_| Self::Text(s.to_string())))
    }
}

impl core::fmt::Display for EncounterSeed {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Combines seed components into one well-distributed 64-bit state.
///
/// The constants are the SplitMix64 / FxHash multipliers; the final
/// avalanche makes nearby inputs diverge immediately.
pub fn mix_seed(base: u64, salt: u64, context: u32) -> u64 {
    let mut hash = base;
    hash ^= salt.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= u64::from(context).wrapping_mul(0x517cc1b727220a95);
    avalanche(hash)
}

fn avalanche(mut hash: u64) -> u64 {
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn same_seed_same_stream() {
        let mut a = PcgRng::from_encounter_seed(&"t1".into());
        let mut b = PcgRng::from_encounter_seed(&"t1".into());
        for _ in 0..64 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = PcgRng::from_encounter_seed(&"t1".into());
        let mut b = PcgRng::from_encounter_seed(&"t2".into());
        let left: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
        let right: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
        assert_ne!(left, right);
    }

    #[test]
    fn numeric_strings_parse_as_numbers() {
        assert_eq!("42".parse::<EncounterSeed>().unwrap(), EncounterSeed::Number(42));
        assert_eq!(
            "forest".parse::<EncounterSeed>().unwrap(),
            EncounterSeed::Text("forest".into())
        );
    }

    #[test]
    fn unit_floats_stay_in_range() {
        let mut rng = PcgRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let value: f64 = rng.r#gen();
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn fill_bytes_handles_partial_chunks() {
        let mut rng = PcgRng::new(3);
        let mut buf = [0u8; 7];
        rng.fill_bytes(&mut buf);
        assert!(buf.iter().any(|b| *b != 0));
    }
}
