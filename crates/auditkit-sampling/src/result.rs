use serde::{Deserialize, Serialize};

use crate::population::{Population, Row};

/// A contiguous, inclusive range of population indices (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    /// Creates a range covering `start..=end`.
    ///
    /// # Panics
    ///
    /// Panics if `end < start`.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "range end must not precede its start");
        Self { start, end }
    }

    /// Creates a range of `len` rows starting at `start`.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    #[must_use]
    pub fn with_len(start: usize, len: usize) -> Self {
        assert!(len > 0, "range must not be empty");
        Self::new(start, start + len - 1)
    }

    /// Number of rows covered by the range.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.end - self.start + 1
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + use<> {
        self.start..=self.end
    }

    /// Merges indices into maximal contiguous ascending ranges.
    ///
    /// # Examples
    ///
    /// ```
    /// use auditkit_sampling::SelectionRange;
    ///
    /// let ranges = SelectionRange::coalesce([7, 1, 2, 3, 9, 8]);
    /// assert_eq!(
    ///     ranges,
    ///     vec![SelectionRange::new(1, 3), SelectionRange::new(7, 9)]
    /// );
    /// ```
    #[must_use]
    pub fn coalesce<I>(indices: I) -> Vec<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut sorted = indices.into_iter().collect::<Vec<_>>();
        sorted.sort_unstable();
        sorted.dedup();

        let mut ranges: Vec<Self> = vec![];
        for index in sorted {
            match ranges.last_mut() {
                Some(last) if last.end + 1 == index => last.end = index,
                _ => ranges.push(Self::new(index, index)),
            }
        }
        ranges
    }
}

/// Why a result holds fewer rows than requested.
#[derive(
    Debug,
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
pub enum ShortfallReason {
    /// The walk reached the end of the population first.
    #[display("population exhausted")]
    PopulationExhausted,
    /// Not enough non-overlapping block positions were available.
    #[display("insufficient blocks")]
    InsufficientBlocks,
}

/// The algorithm could not fully satisfy the request.
///
/// `requested` and `produced` count rows, except for
/// [`ShortfallReason::InsufficientBlocks`] where they count blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub reason: ShortfallReason,
    pub requested: usize,
    pub produced: usize,
}

/// Rows selected by a sampling strategy, plus where they came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleResult {
    /// Selected rows.
    pub rows: Vec<Row>,
    /// `indices[i]` is the population index of `rows[i]`.
    pub indices: Vec<usize>,
    /// Selected ranges for highlighting, ascending.
    pub ranges: Vec<SelectionRange>,
    /// Number of rows the caller asked for.
    pub requested: usize,
    /// Present when fewer rows than requested could be selected.
    pub shortfall: Option<Shortfall>,
}

impl SampleResult {
    /// Builds a result from population indices in output order.
    pub(crate) fn from_indices(
        population: &Population,
        indices: Vec<usize>,
        requested: usize,
    ) -> Self {
        Self {
            rows: population.select(&indices),
            ranges: SelectionRange::coalesce(indices.iter().copied()),
            indices,
            requested,
            shortfall: None,
        }
    }

    /// Builds a result from block ranges sorted by start.
    pub(crate) fn from_ranges(
        population: &Population,
        ranges: Vec<SelectionRange>,
        requested: usize,
    ) -> Self {
        debug_assert!(ranges.is_sorted_by_key(|r| r.start));
        let indices = ranges
            .iter()
            .flat_map(SelectionRange::indices)
            .collect::<Vec<_>>();
        Self {
            rows: population.select(&indices),
            indices,
            ranges,
            requested,
            shortfall: None,
        }
    }

    pub(crate) fn with_shortfall(
        mut self,
        reason: ShortfallReason,
        requested: usize,
        produced: usize,
    ) -> Self {
        if produced < requested {
            tracing::warn!(%reason, requested, produced, "sample is smaller than requested");
            self.shortfall = Some(Shortfall {
                reason,
                requested,
                produced,
            });
        }
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns `true` if fewer rows than requested were selected.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.shortfall.is_some()
    }

    /// Rows projected onto the canonical ledger columns, ready to be written as a new sheet.
    #[must_use]
    pub fn canonical_rows(&self) -> Vec<Row> {
        self.rows.iter().map(Row::to_canonical).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::columns;

    #[test]
    fn test_coalesce_empty_and_single() {
        assert!(SelectionRange::coalesce(std::iter::empty()).is_empty());
        assert_eq!(
            SelectionRange::coalesce([4]),
            vec![SelectionRange::new(4, 4)]
        );
    }

    #[test]
    fn test_coalesce_ignores_duplicates() {
        assert_eq!(
            SelectionRange::coalesce([2, 2, 3]),
            vec![SelectionRange::new(2, 3)]
        );
    }

    #[test]
    fn test_range_len_and_contains() {
        let range = SelectionRange::with_len(5, 3);
        assert_eq!(range, SelectionRange::new(5, 7));
        assert_eq!(range.row_count(), 3);
        assert!(range.contains(7));
        assert!(!range.contains(8));
    }

    #[test]
    fn test_from_ranges_concatenates_blocks() {
        let population: Population = (0_u32..10)
            .map(|i| Row::new().with(columns::AMOUNT, f64::from(i)))
            .collect();
        let result = SampleResult::from_ranges(
            &population,
            vec![SelectionRange::new(1, 2), SelectionRange::new(6, 7)],
            4,
        );
        assert_eq!(result.indices, vec![1, 2, 6, 7]);
        assert_eq!(result.rows[2].amount(), Some(6.0));
        assert!(!result.is_partial());
    }

    #[test]
    fn test_with_shortfall_only_when_short() {
        let population: Population = (0_u32..3)
            .map(|i| Row::new().with(columns::AMOUNT, f64::from(i)))
            .collect();
        let full = SampleResult::from_indices(&population, vec![0, 1], 2).with_shortfall(
            ShortfallReason::PopulationExhausted,
            2,
            2,
        );
        assert!(!full.is_partial());

        let short = SampleResult::from_indices(&population, vec![0], 2).with_shortfall(
            ShortfallReason::PopulationExhausted,
            2,
            1,
        );
        assert_eq!(
            short.shortfall,
            Some(Shortfall {
                reason: ShortfallReason::PopulationExhausted,
                requested: 2,
                produced: 1,
            })
        );
    }
}
