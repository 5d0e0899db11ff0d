use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Population, Row, SampleResult, ValidationError, population::columns};

use super::{SamplingMethod, check_sample_size};

/// Monetary unit sampling: draws without replacement, with each draw picking a
/// remaining row with probability proportional to its [`selection_weight`].
///
/// Output is in ascending population order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedParams {
    pub sample_size: usize,
}

/// Selection weight of a row: `|AMOUNT|`, or `1.0` when the amount is zero or
/// not numeric.
///
/// # Examples
///
/// ```
/// use auditkit_sampling::{Row, population::columns, strategy::selection_weight};
///
/// assert_eq!(selection_weight(&Row::new().with(columns::AMOUNT, -250.0)), 250.0);
/// assert_eq!(selection_weight(&Row::new().with(columns::AMOUNT, 0.0)), 1.0);
/// assert_eq!(selection_weight(&Row::new().with(columns::AMOUNT, "n/a")), 1.0);
/// ```
#[must_use]
pub fn selection_weight(row: &Row) -> f64 {
    match row.abs_amount() {
        Some(weight) if weight > 0.0 => weight,
        _ => 1.0,
    }
}

impl SamplingMethod for WeightedParams {
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

        // Scaled so the running total stays finite for amounts near f64::MAX.
        let max_weight = population
            .rows()
            .iter()
            .map(selection_weight)
            .fold(0.0, f64::max);
        let mut remaining = population
            .iter()
            .map(|(index, row)| (index, selection_weight(row) / max_weight))
            .collect::<Vec<_>>();
        let mut drawn = Vec::with_capacity(self.sample_size);

        while drawn.len() < self.sample_size {
            let total = remaining.iter().map(|(_, w)| w).sum::<f64>();
            let target = rng.random::<f64>() * total;

            let mut cumulative = 0.0;
            let pos = remaining
                .iter()
                .position(|(_, weight)| {
                    cumulative += weight;
                    cumulative >= target
                })
                .unwrap_or(remaining.len() - 1);
            let (index, _) = remaining.remove(pos);
            drawn.push(index);
        }
        drawn.sort_unstable();

        Ok(SampleResult::from_indices(
            population,
            drawn,
            self.sample_size,
        ))
    }
}
