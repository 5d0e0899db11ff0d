use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Random number generator used for reproducible sampling runs.
pub type SampleRng = Pcg32;

/// Seed for reproducible sampling.
///
/// A 128-bit (16-byte) seed that initializes a [`SampleRng`]. Running a
/// randomized strategy twice with the same seed and population selects the
/// same rows, which lets an auditor document and re-perform a sample.
///
/// Seeds are serialized and parsed as 32-character lowercase hex strings.
///
/// # Example
///
/// ```
/// use auditkit_sampling::SampleSeed;
/// use rand::Rng as _;
///
/// let seed: SampleSeed = rand::rng().random();
/// let parsed: SampleSeed = seed.to_string().parse().unwrap();
/// assert_eq!(seed, parsed);
///
/// let mut rng1 = seed.rng();
/// let mut rng2 = parsed.rng();
/// assert_eq!(rng1.random::<u64>(), rng2.random::<u64>());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSeed([u8; 16]);

impl SampleSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Creates a generator seeded with this seed.
    #[must_use]
    pub fn rng(self) -> SampleRng {
        Pcg32::from_seed(self.0)
    }
}

impl fmt::Display for SampleSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let num = u128::from_be_bytes(self.0);
        write!(f, "{num:032x}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseSeedError {
    #[display("invalid seed: expected 32 hex characters, got {_0}")]
    InvalidLength(#[error(not(source))] usize),
    #[display("invalid seed: {_0} is not a hex string")]
    InvalidHex(#[error(not(source))] String),
}

impl FromStr for SampleSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError::InvalidLength(s.len()));
        }
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseSeedError::InvalidHex(s.to_owned()));
        }
        let num =
            u128::from_str_radix(s, 16).map_err(|_| ParseSeedError::InvalidHex(s.to_owned()))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for SampleSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SampleSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `SampleSeed` values with `rng.random()`.
impl Distribution<SampleSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SampleSeed {
        let mut seed = [0u8; 16];
        rng.fill(&mut seed);
        SampleSeed(seed)
    }
}
