use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Population, SampleResult, SelectionRange, ShortfallReason, ValidationError};

use super::SamplingMethod;

/// Populations up to this many rows use non-overlapping placement under
/// [`BlockRegime::Auto`].
pub const SMALL_POPULATION_MAX_ROWS: usize = 10;

/// How blocks are placed in the population.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum BlockRegime {
    /// Non-overlapping placement for small populations, even segments otherwise.
    #[default]
    #[display("auto")]
    Auto,
    /// One block at a random position inside each of `num_blocks` equal segments.
    #[display("even_segments")]
    EvenSegments,
    /// Blocks at random positions anywhere, never overlapping.
    #[display("non_overlapping")]
    NonOverlapping,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown block regime '{_0}' (expected auto, even_segments or non_overlapping)")]
pub struct ParseBlockRegimeError(#[error(not(source))] String);

/// Parses the same names the regime serializes to; `-` may stand in for `_`.
///
/// # Examples
///
/// ```
/// use auditkit_sampling::strategy::BlockRegime;
///
/// assert_eq!("even_segments".parse::<BlockRegime>(), Ok(BlockRegime::EvenSegments));
/// assert_eq!("non-overlapping".parse::<BlockRegime>(), Ok(BlockRegime::NonOverlapping));
/// assert_eq!(BlockRegime::EvenSegments.to_string(), "even_segments");
/// ```
impl FromStr for BlockRegime {
    type Err = ParseBlockRegimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "auto" => Ok(Self::Auto),
            "even_segments" => Ok(Self::EvenSegments),
            "non_overlapping" => Ok(Self::NonOverlapping),
            _ => Err(ParseBlockRegimeError(s.to_owned())),
        }
    }
}

impl BlockRegime {
    /// The concrete regime used for a population of `len` rows.
    #[must_use]
    pub fn resolve(self, len: usize) -> Self {
        match self {
            Self::Auto if len <= SMALL_POPULATION_MAX_ROWS => Self::NonOverlapping,
            Self::Auto => Self::EvenSegments,
            regime => regime,
        }
    }
}

/// Selects `num_blocks` contiguous runs of `block_size` rows.
///
/// The result lists block rows in ascending start order, and `ranges` holds
/// one entry per block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockParams {
    pub block_size: usize,
    pub num_blocks: usize,
    /// Declared total; must equal `block_size * num_blocks` when present.
    #[serde(default)]
    pub sample_size: Option<usize>,
    #[serde(default)]
    pub regime: BlockRegime,
}

impl BlockParams {
    #[must_use]
    pub fn new(block_size: usize, num_blocks: usize) -> Self {
        Self {
            block_size,
            num_blocks,
            sample_size: None,
            regime: BlockRegime::Auto,
        }
    }

    #[must_use]
    pub fn with_regime(self, regime: BlockRegime) -> Self {
        Self { regime, ..self }
    }

    /// Total number of rows the blocks cover.
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.block_size * self.num_blocks
    }

    /// Largest block count that fits a population of `len` rows.
    #[must_use]
    pub fn max_blocks(&self, len: usize) -> usize {
        len.checked_div(self.block_size).unwrap_or(0)
    }

    /// Default parameters for a population of `len` rows.
    ///
    /// # Examples
    ///
    /// ```
    /// use auditkit_sampling::strategy::BlockParams;
    ///
    /// let params = BlockParams::suggested(9);
    /// assert_eq!((params.block_size, params.num_blocks), (3, 2));
    ///
    /// let params = BlockParams::suggested(500);
    /// assert_eq!((params.block_size, params.num_blocks), (3, 6));
    /// ```
    #[must_use]
    pub fn suggested(len: usize) -> Self {
        if len < SMALL_POPULATION_MAX_ROWS {
            let block_size = usize::max(1, len / 3);
            let num_blocks = usize::min(2, len / block_size);
            return Self {
                sample_size: Some(block_size * num_blocks),
                ..Self::new(block_size, num_blocks)
            };
        }

        let params = Self::new(3, 6);
        if len < 20 {
            params.derive_from_sample_size(len, usize::max(2, len * 4 / 5))
        } else {
            Self {
                sample_size: Some(params.total_rows()),
                ..params
            }
        }
    }

    /// Reconciles the block parameters with a new total sample size.
    ///
    /// The sample size is clamped to `len`. If it is a multiple of the current
    /// block size, the block count follows from it; otherwise the block size is
    /// recomputed from the current block count, falling back to one-row
    /// blocks. The block count is finally clamped to what fits in `len` rows.
    ///
    /// # Examples
    ///
    /// ```
    /// use auditkit_sampling::strategy::BlockParams;
    ///
    /// let params = BlockParams::new(3, 6).derive_from_sample_size(100, 21);
    /// assert_eq!((params.block_size, params.num_blocks), (3, 7));
    ///
    /// let params = BlockParams::new(3, 6).derive_from_sample_size(100, 20);
    /// assert_eq!((params.block_size, params.num_blocks), (3, 6));
    /// assert_eq!(params.sample_size, Some(18));
    /// ```
    #[must_use]
    pub fn derive_from_sample_size(self, len: usize, sample_size: usize) -> Self {
        let sample_size = sample_size.min(len);
        let (mut block_size, mut num_blocks) = (self.block_size, self.num_blocks);

        if block_size > 0 && sample_size % block_size == 0 {
            num_blocks = sample_size / block_size;
        } else if num_blocks > 0 {
            let derived = sample_size / num_blocks;
            if derived > 0 {
                block_size = derived;
            } else {
                block_size = 1;
                num_blocks = sample_size;
            }
        } else {
            block_size = 1;
            num_blocks = sample_size;
        }

        let mut params = Self {
            block_size,
            num_blocks,
            ..self
        };
        params.num_blocks = params.num_blocks.min(params.max_blocks(len));
        params.sample_size = Some(params.total_rows());
        params
    }

    /// Checks the parameters against a population of `len` rows.
    pub fn validate(&self, len: usize) -> Result<(), ValidationError> {
        if len == 0 {
            return Err(ValidationError::EmptyPopulation);
        }
        if !(1..=len).contains(&self.block_size) {
            return Err(ValidationError::BlockSizeOutOfRange {
                block_size: self.block_size,
                max: len,
            });
        }
        let max_blocks = self.max_blocks(len);
        if !(1..=max_blocks).contains(&self.num_blocks) {
            return Err(ValidationError::BlockCountOutOfRange {
                num_blocks: self.num_blocks,
                max: max_blocks,
            });
        }
        if let Some(sample_size) = self.sample_size
            && sample_size != self.total_rows()
        {
            return Err(ValidationError::BlockSampleSizeMismatch {
                sample_size,
                block_size: self.block_size,
                num_blocks: self.num_blocks,
            });
        }
        Ok(())
    }

    fn even_segment_blocks<R>(&self, len: usize, rng: &mut R) -> Vec<SelectionRange>
    where
        R: Rng + ?Sized,
    {
        let segment_len = len / self.num_blocks;
        let remainder = len % self.num_blocks;

        (0..self.num_blocks)
            .map(|i| {
                let start = i * segment_len + i.min(remainder);
                let end = (i + 1) * segment_len + (i + 1).min(remainder) - 1;
                let segment = SelectionRange::new(start, end);
                if segment.row_count() < self.block_size {
                    return segment;
                }
                let offset = rng.random_range(0..=segment.row_count() - self.block_size);
                SelectionRange::with_len(start + offset, self.block_size)
            })
            .collect()
    }

    fn non_overlapping_blocks<R>(&self, len: usize, rng: &mut R) -> Vec<SelectionRange>
    where
        R: Rng + ?Sized,
    {
        let mut offsets = (0..=len - self.block_size).collect::<Vec<_>>();
        let mut blocks = Vec::with_capacity(self.num_blocks);
        while blocks.len() < self.num_blocks && !offsets.is_empty() {
            let start = offsets[rng.random_range(0..offsets.len())];
            blocks.push(SelectionRange::with_len(start, self.block_size));
            offsets.retain(|&offset| offset.abs_diff(start) >= self.block_size);
        }
        blocks.sort_unstable_by_key(|block| block.start);
        blocks
    }
}

impl SamplingMethod for BlockParams {
    fn sample<R>(
        &self,
        population: &Population,
        rng: &mut R,
    ) -> Result<SampleResult, ValidationError>
    where
        R: Rng + ?Sized,
    {
        let len = population.len();
        self.validate(len)?;

        let regime = self.regime.resolve(len);
        tracing::debug!(%regime, block_size = self.block_size, num_blocks = self.num_blocks, "placing blocks");
        let blocks = match regime {
            BlockRegime::NonOverlapping => self.non_overlapping_blocks(len, rng),
            BlockRegime::EvenSegments | BlockRegime::Auto => self.even_segment_blocks(len, rng),
        };

        let produced = blocks.len();
        Ok(
            SampleResult::from_ranges(population, blocks, self.total_rows()).with_shortfall(
                ShortfallReason::InsufficientBlocks,
                self.num_blocks,
                produced,
            ),
        )
    }
}
