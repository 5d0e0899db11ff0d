use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Population, SampleResult, ShortfallReason, ValidationError, population::columns};

/// Largest random step taken by variable-step sampling.
pub const VARIABLE_STEP_MAX: usize = 10;

/// Parameters shared by fixed-step and variable-step (systematic) sampling.
///
/// - `sample_size` must satisfy `1 <= sample_size < len`
/// - `starting_row` is 1-based and must satisfy `1 <= starting_row <= len`
///
/// Both walks stop at the end of the population; a result with fewer rows
/// than requested carries a [`ShortfallReason::PopulationExhausted`] shortfall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepParams {
    pub sample_size: usize,
    pub starting_row: usize,
}

impl StepParams {
    fn validate(&self, population: &Population) -> Result<(), ValidationError> {
        population.require_column(columns::AMOUNT)?;
        let len = population.len();
        let max_sample_size = len - 1;
        if !(1..=max_sample_size).contains(&self.sample_size) {
            return Err(ValidationError::SampleSizeOutOfRange {
                sample_size: self.sample_size,
                min: 1,
                max: max_sample_size,
            });
        }
        if !(1..=len).contains(&self.starting_row) {
            return Err(ValidationError::StartingRowOutOfRange {
                starting_row: self.starting_row,
                max: len,
            });
        }
        Ok(())
    }

    /// Step between selected rows for fixed-step sampling.
    #[must_use]
    pub fn fixed_step_size(&self, population_len: usize) -> usize {
        population_len.checked_div(self.sample_size).unwrap_or(0)
    }

    /// Takes every `floor(len / sample_size)`-th row from `starting_row`.
    ///
    /// Deterministic: the same population and parameters always select the same rows.
    pub fn sample_fixed(&self, population: &Population) -> Result<SampleResult, ValidationError> {
        self.validate(population)?;
        let len = population.len();
        let step = self.fixed_step_size(len);
        debug_assert!(step > 0);

        let indices = (self.starting_row - 1..len)
            .step_by(step)
            .take(self.sample_size)
            .collect::<Vec<_>>();
        tracing::debug!(step, selected = indices.len(), "fixed step walk");

        let produced = indices.len();
        Ok(
            SampleResult::from_indices(population, indices, self.sample_size).with_shortfall(
                ShortfallReason::PopulationExhausted,
                self.sample_size,
                produced,
            ),
        )
    }

    /// Walks from `starting_row` with random steps of `1..=VARIABLE_STEP_MAX` rows.
    pub fn sample_variable<R>(
        &self,
        population: &Population,
        rng: &mut R,
    ) -> Result<SampleResult, ValidationError>
    where
        R: Rng + ?Sized,
    {
        self.validate(population)?;
        let len = population.len();

        let mut indices = Vec::with_capacity(self.sample_size);
        let mut current = self.starting_row - 1;
        while current < len {
            indices.push(current);
            if indices.len() == self.sample_size {
                break;
            }
            current += rng.random_range(1..=VARIABLE_STEP_MAX);
        }

        let produced = indices.len();
        Ok(
            SampleResult::from_indices(population, indices, self.sample_size).with_shortfall(
                ShortfallReason::PopulationExhausted,
                self.sample_size,
                produced,
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{rng, sequential};

    mod fixed {
        use super::*;

        #[test]
        fn test_ten_rows_four_samples_from_row_two() {
            let population = sequential(10);
            let params = StepParams {
                sample_size: 4,
                starting_row: 2,
            };
            assert_eq!(params.fixed_step_size(10), 2);

            let result = params.sample_fixed(&population).unwrap();
            assert_eq!(result.indices, vec![1, 3, 5, 7]);
            let amounts: Vec<_> = result.rows.iter().map(|r| r.amount().unwrap()).collect();
            assert_eq!(amounts, vec![2.0, 4.0, 6.0, 8.0]);
            assert!(!result.is_partial());
        }

        #[test]
        fn test_deterministic() {
            let population = sequential(97);
            let params = StepParams {
                sample_size: 9,
                starting_row: 5,
            };
            let a = params.sample_fixed(&population).unwrap();
            let b = params.sample_fixed(&population).unwrap();
            assert_eq!(a, b);
        }

        #[test]
        fn test_late_start_runs_out_of_population() {
            let population = sequential(10);
            let params = StepParams {
                sample_size: 4,
                starting_row: 8,
            };
            let result = params.sample_fixed(&population).unwrap();
            assert_eq!(result.indices, vec![7, 9]);
            let shortfall = result.shortfall.unwrap();
            assert!(shortfall.reason.is_population_exhausted());
            assert_eq!((shortfall.requested, shortfall.produced), (4, 2));
        }

        #[test]
        fn test_validation() {
            let population = sequential(10);
            let err = StepParams {
                sample_size: 10,
                starting_row: 1,
            }
            .sample_fixed(&population)
            .unwrap_err();
            assert_eq!(
                err,
                ValidationError::SampleSizeOutOfRange {
                    sample_size: 10,
                    min: 1,
                    max: 9,
                }
            );

            for starting_row in [0, 11] {
                let err = StepParams {
                    sample_size: 3,
                    starting_row,
                }
                .sample_fixed(&population)
                .unwrap_err();
                assert_eq!(
                    err,
                    ValidationError::StartingRowOutOfRange {
                        starting_row,
                        max: 10,
                    }
                );
            }
        }

        #[test]
        fn test_single_row_population_is_invalid() {
            let population = sequential(1);
            let err = StepParams {
                sample_size: 1,
                starting_row: 1,
            }
            .sample_fixed(&population)
            .unwrap_err();
            assert!(matches!(
                err,
                ValidationError::SampleSizeOutOfRange { max: 0, .. }
            ));
        }
    }

    mod variable {
        use super::*;

        #[test]
        fn test_steps_are_between_one_and_ten() {
            let population = sequential(1000);
            let params = StepParams {
                sample_size: 50,
                starting_row: 1,
            };
            for seed in 0..10 {
                let result = params.sample_variable(&population, &mut rng(seed)).unwrap();
                assert_eq!(result.indices[0], 0);
                assert_eq!(result.len(), 50);
                for pair in result.indices.windows(2) {
                    let step = pair[1] - pair[0];
                    assert!((1..=VARIABLE_STEP_MAX).contains(&step), "step {step}");
                }
            }
        }

        #[test]
        fn test_exhaustion_is_flagged() {
            let population = sequential(20);
            let params = StepParams {
                sample_size: 19,
                starting_row: 1,
            };
            let result = params.sample_variable(&population, &mut rng(5)).unwrap();
            assert!(result.indices.iter().all(|&i| i < 20));
            if result.len() < 19 {
                assert_eq!(
                    result.shortfall.unwrap().reason,
                    ShortfallReason::PopulationExhausted
                );
            } else {
                assert!(!result.is_partial());
            }
        }

        #[test]
        fn test_start_at_last_row() {
            let population = sequential(10);
            let params = StepParams {
                sample_size: 3,
                starting_row: 10,
            };
            let result = params.sample_variable(&population, &mut rng(0)).unwrap();
            assert_eq!(result.indices, vec![9]);
            assert!(result.is_partial());
        }
    }
}
