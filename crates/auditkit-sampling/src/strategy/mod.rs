//! Sampling strategies.
//!
//! Each strategy is a parameter struct implementing [`SamplingMethod`]:
//!
//! - [`RandomSampleParams`] - Uniform sampling without replacement
//! - [`StepParams`] with [`SamplingStrategy::FixedStep`] - Systematic selection
//!   every `floor(len / sample_size)` rows
//! - [`StepParams`] with [`SamplingStrategy::VariableStep`] - Systematic selection
//!   with random steps of 1 to 10 rows
//! - [`WeightedParams`] - Monetary unit sampling (probability proportional to `|AMOUNT|`)
//! - [`BlockParams`] - Contiguous blocks of rows
//! - [`HaphazardParams`] - Replay of a manual selection
//!
//! [`SamplingStrategy`] names a strategy together with its parameters and can be
//! deserialized from JSON (`{"kind": "fixed_step", "sample_size": 4, "starting_row": 2}`).
//!
//! # Randomness
//!
//! Every strategy receives the random source explicitly, so a seeded generator
//! (see [`SampleSeed`](crate::SampleSeed)) makes a run reproducible.
//! Deterministic strategies ignore it.
//!
//! # Example
//!
//! ```
//! use auditkit_sampling::{
//!     Population, Row, SampleSeed, SamplingStrategy, population::columns,
//!     run_sampling_strategy, strategy::StepParams,
//! };
//!
//! let population: Population = (1_u32..=10)
//!     .map(|i| Row::new().with(columns::AMOUNT, f64::from(i)))
//!     .collect();
//! let strategy = SamplingStrategy::FixedStep(StepParams {
//!     sample_size: 4,
//!     starting_row: 2,
//! });
//!
//! let mut rng = SampleSeed::from_bytes([0; 16]).rng();
//! let result = run_sampling_strategy(&strategy, &population, &mut rng).unwrap();
//! assert_eq!(result.indices, vec![1, 3, 5, 7]);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

pub use self::{
    block::{BlockParams, BlockRegime, ParseBlockRegimeError, SMALL_POPULATION_MAX_ROWS},
    haphazard::{HaphazardParams, HaphazardSelection},
    random::RandomSampleParams,
    step::{StepParams, VARIABLE_STEP_MAX},
    weighted::{WeightedParams, selection_weight},
};

use crate::{Population, SampleResult, ValidationError, population::columns};

mod block;
mod haphazard;
mod random;
mod step;
mod weighted;

/// A sampling procedure that selects rows from a population.
pub trait SamplingMethod {
    /// Selects rows from `population`.
    ///
    /// The population is never modified; the result refers back to it by index.
    fn sample<R>(
        &self,
        population: &Population,
        rng: &mut R,
    ) -> Result<SampleResult, ValidationError>
    where
        R: Rng + ?Sized;
}

/// A named sampling strategy with its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SamplingStrategy {
    Random(RandomSampleParams),
    FixedStep(StepParams),
    VariableStep(StepParams),
    Weighted(WeightedParams),
    Block(BlockParams),
    Haphazard(HaphazardParams),
}

impl SamplingStrategy {
    /// Human-readable strategy name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            SamplingStrategy::Random(_) => "random sample",
            SamplingStrategy::FixedStep(_) => "fixed step",
            SamplingStrategy::VariableStep(_) => "variable step",
            SamplingStrategy::Weighted(_) => "weighted random",
            SamplingStrategy::Block(_) => "block selection",
            SamplingStrategy::Haphazard(_) => "haphazard selection",
        }
    }

    /// Column every row must carry for this strategy, if any.
    #[must_use]
    pub fn required_column(&self) -> Option<&'static str> {
        match self {
            SamplingStrategy::Random(_)
            | SamplingStrategy::FixedStep(_)
            | SamplingStrategy::VariableStep(_)
            | SamplingStrategy::Weighted(_) => Some(columns::AMOUNT),
            SamplingStrategy::Block(_) | SamplingStrategy::Haphazard(_) => None,
        }
    }

    /// Returns `true` if the strategy draws from the random source.
    #[must_use]
    pub fn uses_randomness(&self) -> bool {
        !matches!(
            self,
            SamplingStrategy::FixedStep(_) | SamplingStrategy::Haphazard(_)
        )
    }
}

/// Runs `strategy` against `population`.
pub fn run_sampling_strategy<R>(
    strategy: &SamplingStrategy,
    population: &Population,
    rng: &mut R,
) -> Result<SampleResult, ValidationError>
where
    R: Rng + ?Sized,
{
    tracing::debug!(strategy = strategy.name(), rows = population.len(), "sampling");
    let result = match strategy {
        SamplingStrategy::Random(params) => params.sample(population, rng),
        SamplingStrategy::FixedStep(params) => params.sample_fixed(population),
        SamplingStrategy::VariableStep(params) => params.sample_variable(population, rng),
        SamplingStrategy::Weighted(params) => params.sample(population, rng),
        SamplingStrategy::Block(params) => params.sample(population, rng),
        SamplingStrategy::Haphazard(params) => params.sample(population, rng),
    }?;
    tracing::debug!(
        strategy = strategy.name(),
        selected = result.len(),
        partial = result.is_partial(),
        "sampling done"
    );
    Ok(result)
}

fn check_sample_size(sample_size: usize, max: usize) -> Result<(), ValidationError> {
    if (1..=max).contains(&sample_size) {
        Ok(())
    } else {
        Err(ValidationError::SampleSizeOutOfRange {
            sample_size,
            min: 1,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{rng, sequential};

    #[test]
    fn test_strategy_from_json() {
        let strategy: SamplingStrategy =
            serde_json::from_str(r#"{"kind": "fixed_step", "sample_size": 4, "starting_row": 2}"#)
                .unwrap();
        assert_eq!(
            strategy,
            SamplingStrategy::FixedStep(StepParams {
                sample_size: 4,
                starting_row: 2,
            })
        );

        let strategy: SamplingStrategy =
            serde_json::from_str(r#"{"kind": "block", "block_size": 3, "num_blocks": 2}"#)
                .unwrap();
        assert_eq!(strategy, SamplingStrategy::Block(BlockParams::new(3, 2)));
    }

    #[test]
    fn test_dispatch_validation_errors_are_returned() {
        let population = sequential(5);
        let strategy = SamplingStrategy::Random(RandomSampleParams { sample_size: 0 });
        assert_eq!(
            run_sampling_strategy(&strategy, &population, &mut rng(1)),
            Err(ValidationError::SampleSizeOutOfRange {
                sample_size: 0,
                min: 1,
                max: 5,
            })
        );
    }

    #[test]
    fn test_same_seed_same_result() {
        let population = sequential(200);
        let strategies = [
            SamplingStrategy::Random(RandomSampleParams { sample_size: 20 }),
            SamplingStrategy::VariableStep(StepParams {
                sample_size: 20,
                starting_row: 3,
            }),
            SamplingStrategy::Weighted(WeightedParams { sample_size: 20 }),
            SamplingStrategy::Block(BlockParams::new(5, 4)),
        ];
        for strategy in &strategies {
            let a = run_sampling_strategy(strategy, &population, &mut rng(42)).unwrap();
            let b = run_sampling_strategy(strategy, &population, &mut rng(42)).unwrap();
            assert_eq!(a, b, "{}", strategy.name());
        }
    }
}
