use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Population, SampleResult, ValidationError, population::columns};

use super::{SamplingMethod, check_sample_size};

/// Uniform random sampling without replacement.
///
/// Every row must carry an `AMOUNT` column. The selected rows are returned in
/// ascending population order.
///
/// # Example
///
/// ```
/// use auditkit_sampling::{
///     Population, Row, SampleSeed, population::columns,
///     strategy::{RandomSampleParams, SamplingMethod as _},
/// };
///
/// let population: Population = (1_u32..=50)
///     .map(|i| Row::new().with(columns::AMOUNT, f64::from(i)))
///     .collect();
/// let mut rng = SampleSeed::from_bytes([1; 16]).rng();
/// let result = RandomSampleParams { sample_size: 5 }
///     .sample(&population, &mut rng)
///     .unwrap();
/// assert_eq!(result.len(), 5);
/// assert!(result.indices.is_sorted());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomSampleParams {
    pub sample_size: usize,
}

impl SamplingMethod for RandomSampleParams {
    fn sample<R>(
        &self,
        population: &Population,
        rng: &mut R,
    ) -> Result<SampleResult, ValidationError>
    where
        R: Rng + ?Sized,
    {
        population.require_column(columns::AMOUNT)?;
        check_sample_size(self.sample_size, population.len())?;

        let mut remaining = (0..population.len()).collect::<Vec<_>>();
        let mut drawn = Vec::with_capacity(self.sample_size);
        while drawn.len() < self.sample_size {
            let pos = rng.random_range(0..remaining.len());
            drawn.push(remaining.swap_remove(pos));
        }
        drawn.sort_unstable();

        Ok(SampleResult::from_indices(
            population,
            drawn,
            self.sample_size,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Row,
        testing::{assert_no_duplicates, ledger, rng, sequential},
    };

    #[test]
    fn test_sample_size_bounds() {
        let population = sequential(10);
        for sample_size in [0, 11] {
            let err = RandomSampleParams { sample_size }
                .sample(&population, &mut rng(0))
                .unwrap_err();
            assert_eq!(
                err,
                ValidationError::SampleSizeOutOfRange {
                    sample_size,
                    min: 1,
                    max: 10,
                }
            );
        }
    }

    #[test]
    fn test_requires_amount_column() {
        let population: Population = vec![Row::new().with(columns::USER, "a")].into();
        assert_eq!(
            RandomSampleParams { sample_size: 1 }.sample(&population, &mut rng(0)),
            Err(ValidationError::MissingColumn {
                column: columns::AMOUNT.to_owned()
            })
        );
    }

    #[test]
    fn test_full_sample_returns_every_row_once() {
        let population = sequential(25);
        let result = RandomSampleParams { sample_size: 25 }
            .sample(&population, &mut rng(3))
            .unwrap();
        assert_eq!(result.indices, (0..25).collect::<Vec<_>>());
        assert_eq!(result.rows, population.rows());
        assert!(!result.is_partial());
    }

    #[test]
    fn test_no_duplicates_and_rows_match_indices() {
        let population = sequential(100);
        for seed in 0..20 {
            let result = RandomSampleParams { sample_size: 30 }
                .sample(&population, &mut rng(seed))
                .unwrap();
            assert_eq!(result.len(), 30);
            assert_no_duplicates(&result.indices);
            assert!(result.indices.is_sorted());
            for (row, &index) in result.rows.iter().zip(&result.indices) {
                assert_eq!(row, population.get(index).unwrap());
            }
        }
    }

    #[test]
    fn test_identical_rows_map_to_distinct_indices() {
        let population = ledger(&[5.0; 4]);
        let mut population_rows = population.rows().to_vec();
        for row in &mut population_rows {
            row.insert(columns::ENTRY_NUMBER, "same");
        }
        let population = Population::new(population_rows);
        let result = RandomSampleParams { sample_size: 4 }
            .sample(&population, &mut rng(9))
            .unwrap();
        assert_eq!(result.indices, vec![0, 1, 2, 3]);
    }
}
