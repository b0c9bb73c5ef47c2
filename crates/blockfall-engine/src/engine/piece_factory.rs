use std::{collections::VecDeque, fmt::Write as _};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{PieceKind, Shape};

/// Piece generation policy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Randomizer {
    /// Shuffled permutations of all seven kinds.
    ///
    /// Every kind appears once per cycle, so every 13-piece window contains every kind
    /// and at most 12 pieces separate two of the same kind.
    #[default]
    SevenBag,
    /// Each piece drawn independently and uniformly.
    ///
    /// Kept for the earliest variant only. It allows arbitrarily long droughts of a
    /// given kind.
    Uniform,
}

/// Tetromino Factory.
///
/// Produces base-orientation shapes according to a [`Randomizer`].
///
/// # 7-Bag System
///
/// 1. Put one of each of the 7 kinds in a bag
/// 2. Shuffle the bag (Fisher-Yates)
/// 3. Hand pieces out in order
/// 4. Refill with a freshly shuffled bag when empty
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceFactory, PieceKind, PieceSeed, Randomizer};
///
/// let mut factory = PieceFactory::with_seed(Randomizer::SevenBag, PieceSeed::from_u128(7));
/// let mut kinds: Vec<_> = (0..7).map(|_| factory.next_kind()).collect();
/// kinds.sort_by_key(|k| *k as u8);
/// assert_eq!(kinds, PieceKind::ALL);
/// ```
#[derive(Debug, Clone)]
pub struct PieceFactory {
    randomizer: Randomizer,
    rng: Pcg32,
    bag: VecDeque<PieceKind>,
}

/// Seed for deterministic piece generation.
///
/// A 128-bit value serialized as a 32 character hex string. The same seed always
/// produces the same piece sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    #[must_use]
    pub const fn to_u128(self) -> u128 {
        u128::from_be_bytes(self.0)
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{:032x}", self.to_u128()).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed: {input:?} (expected 32 hex characters)")]
pub struct ParseSeedError {
    input: String,
}

impl std::str::FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 {
            return Err(err());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| err())?;
        Ok(Self::from_u128(num))
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

impl PieceFactory {
    /// Creates a factory with a random seed.
    #[must_use]
    pub fn new(randomizer: Randomizer) -> Self {
        Self::with_seed(randomizer, rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic piece generation.
    #[must_use]
    pub fn with_seed(randomizer: Randomizer, seed: PieceSeed) -> Self {
        Self {
            randomizer,
            rng: Pcg32::from_seed(seed.0),
            bag: VecDeque::with_capacity(PieceKind::LEN),
        }
    }

    /// Draws a seed from this factory's generator, e.g. to restart onto a new sequence.
    pub fn fork_seed(&mut self) -> PieceSeed {
        self.rng.random()
    }

    /// Draws the next piece kind.
    ///
    /// # Panics
    ///
    /// Panics if the bag is empty right after a refill, which cannot happen.
    pub fn next_kind(&mut self) -> PieceKind {
        match self.randomizer {
            Randomizer::Uniform => self.rng.random(),
            Randomizer::SevenBag => {
                if self.bag.is_empty() {
                    let mut new_bag = PieceKind::ALL;
                    new_bag.shuffle(&mut self.rng);
                    self.bag.extend(new_bag);
                }
                self.bag
                    .pop_front()
                    .expect("piece bag should never be empty after refill")
            }
        }
    }

    /// Draws the next piece in its base orientation.
    pub fn next_shape(&mut self) -> Shape {
        Shape::base(self.next_kind())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const SEED: PieceSeed = PieceSeed::from_u128(0x1234_5678_9abc_def0_1122_3344_5566_7788);

    mod seven_bag {
        use super::*;

        #[test]
        fn test_each_cycle_is_a_permutation() {
            let mut factory = PieceFactory::with_seed(Randomizer::SevenBag, SEED);
            for cycle in 0..20 {
                let kinds: HashSet<_> = (0..PieceKind::LEN).map(|_| factory.next_kind()).collect();
                assert_eq!(kinds.len(), PieceKind::LEN, "cycle {cycle}");
            }
        }

        #[test]
        fn test_no_drought_longer_than_12() {
            let mut factory = PieceFactory::new(Randomizer::SevenBag);
            let seq: Vec<_> = (0..140).map(|_| factory.next_kind()).collect();
            for window in seq.windows(13) {
                for kind in PieceKind::ALL {
                    assert!(window.contains(&kind), "{kind:?} missing from {window:?}");
                }
            }
            for window in seq.windows(7) {
                for kind in PieceKind::ALL {
                    let n = window.iter().filter(|k| **k == kind).count();
                    assert!(n <= 2, "{kind:?} appears {n} times in {window:?}");
                }
            }
        }

        #[test]
        fn test_next_shape_is_base_orientation() {
            let mut factory = PieceFactory::new(Randomizer::SevenBag);
            for _ in 0..14 {
                let shape = factory.next_shape();
                assert_eq!(shape, Shape::base(shape.kind()));
            }
        }
    }

    #[test]
    fn test_uniform_produces_every_kind() {
        let mut factory = PieceFactory::with_seed(Randomizer::Uniform, SEED);
        let kinds: HashSet<_> = (0..500).map(|_| factory.next_kind()).collect();
        assert_eq!(kinds.len(), PieceKind::LEN);
    }

    #[test]
    fn test_deterministic_piece_generation() {
        for randomizer in [Randomizer::SevenBag, Randomizer::Uniform] {
            let mut a = PieceFactory::with_seed(randomizer, SEED);
            let mut b = PieceFactory::with_seed(randomizer, SEED);
            for _ in 0..30 {
                assert_eq!(a.next_kind(), b.next_kind());
            }
        }
    }

    mod piece_seed_serialization {
        use super::*;

        #[test]
        fn test_known_value() {
            let seed = PieceSeed::from_u128(0x0123_4567_89ab_cdef_fedc_ba98_7654_3210);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");
            let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(deserialized, seed);
        }

        #[test]
        fn test_uppercase_is_accepted() {
            let seed: PieceSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
            assert_eq!(seed.to_u128(), 0x0123_4567_89ab_cdef_fedc_ba98_7654_3210);
        }

        #[test]
        fn test_errors() {
            for input in [
                "\"\"",
                "\"0123456789abcdef0123456789abcde\"",
                "\"0123456789abcdef0123456789abcdef0\"",
                "\"ghijklmnopqrstuvwxyzghijklmnopqr\"",
            ] {
                let err = serde_json::from_str::<PieceSeed>(input).unwrap_err();
                assert!(err.to_string().contains("invalid hex seed"), "{input}: {err}");
            }
        }

        #[test]
        fn test_random_roundtrip_preserves_sequence() {
            let seed: PieceSeed = rand::rng().random();
            let back: PieceSeed = serde_json::from_str(&serde_json::to_string(&seed).unwrap()).unwrap();
            let mut a = PieceFactory::with_seed(Randomizer::SevenBag, seed);
            let mut b = PieceFactory::with_seed(Randomizer::SevenBag, back);
            for _ in 0..20 {
                assert_eq!(a.next_kind(), b.next_kind());
            }
        }
    }
}
