//! Sampling and homogeneity grouping for audit ledgers.
//!
//! This crate selects subsets of ledger rows the way an auditor does and
//! groups rows into subpopulations of similar magnitude:
//!
//! - **Sampling**: Random, fixed-step, variable-step, weighted (monetary unit),
//!   block and haphazard (manual) selection
//! - **Homogeneity**: Greedy partitioning by coefficient of variation
//! - **Extraction**: Per-column descriptive statistics
//!
//! # Modules
//!
//! - [`population`]: Rows, sheets and the population snapshot every operation reads
//! - [`strategy`]: Sampling strategies and their parameters
//! - [`result`]: Selected rows with their provenance
//! - [`homogeneity`]: CV-bounded partitioning
//! - [`extract`]: Descriptive statistics per column
//! - [`seed`]: Reproducible random sources
//!
//! Every operation validates its inputs up front and reports problems as a
//! [`ValidationError`]. A request that is valid but cannot be fully satisfied
//! returns a smaller result with a [`Shortfall`] attached instead.
//!
//! # Examples
//!
//! ## Drawing a sample
//!
//! ```
//! use auditkit_sampling::{
//!     Population, Row, SampleSeed, SamplingStrategy, population::columns,
//!     run_sampling_strategy, strategy::WeightedParams,
//! };
//!
//! let population: Population = [120.0, 15.5, 9800.0, 42.0, 310.0]
//!     .into_iter()
//!     .map(|amount| Row::new().with(columns::AMOUNT, amount))
//!     .collect();
//!
//! let seed: SampleSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
//! let strategy = SamplingStrategy::Weighted(WeightedParams { sample_size: 2 });
//! let result = run_sampling_strategy(&strategy, &population, &mut seed.rng()).unwrap();
//! assert_eq!(result.len(), 2);
//! ```
//!
//! ## Partitioning by homogeneity
//!
//! ```
//! use auditkit_sampling::{Population, Row, partition_by_homogeneity, population::columns};
//!
//! let population: Population = [100.0, 105.0, 98.0, 5000.0]
//!     .into_iter()
//!     .map(|amount| Row::new().with(columns::AMOUNT, amount))
//!     .collect();
//!
//! let partition = partition_by_homogeneity(&population, 40.0).unwrap();
//! assert_eq!(partition.groups.len(), 2);
//! ```

pub use self::{
    error::ValidationError,
    extract::compute_descriptive_stats,
    homogeneity::partition_by_homogeneity,
    population::{Population, Row, Sheet, Value, Workbook},
    result::{SampleResult, SelectionRange, Shortfall, ShortfallReason},
    seed::{SampleRng, SampleSeed},
    strategy::{SamplingMethod, SamplingStrategy, run_sampling_strategy},
};

mod error;
pub mod extract;
pub mod homogeneity;
pub mod population;
pub mod result;
pub mod seed;
pub mod strategy;

#[cfg(test)]
mod testing;
