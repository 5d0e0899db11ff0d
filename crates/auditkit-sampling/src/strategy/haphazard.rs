use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Population, SampleResult, ValidationError};

use super::SamplingMethod;

/// A manual selection being built up one click at a time.
///
/// Selecting a row appends it to the click order; selecting it again removes
/// it. The materialized sample keeps click order.
///
/// # Example
///
/// ```
/// use auditkit_sampling::{Population, Row, population::columns, strategy::HaphazardSelection};
///
/// let population: Population = (1_u32..=5)
///     .map(|i| Row::new().with(columns::AMOUNT, f64::from(i)))
///     .collect();
///
/// let mut selection = HaphazardSelection::new(population.len());
/// selection.toggle(3).unwrap();
/// selection.toggle(0).unwrap();
/// selection.toggle(4).unwrap();
/// selection.toggle(0).unwrap();
///
/// let result = selection.materialize(&population).unwrap();
/// assert_eq!(result.indices, vec![3, 4]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HaphazardSelection {
    selected: Vec<bool>,
    order: Vec<usize>,
}

impl HaphazardSelection {
    #[must_use]
    pub fn new(population_len: usize) -> Self {
        Self {
            selected: vec![false; population_len],
            order: vec![],
        }
    }

    #[must_use]
    pub fn population_len(&self) -> usize {
        self.selected.len()
    }

    /// Flips the selection state of `index` and returns whether it is now selected.
    pub fn toggle(&mut self, index: usize) -> Result<bool, ValidationError> {
        let len = self.population_len();
        let slot = self
            .selected
            .get_mut(index)
            .ok_or(ValidationError::IndexOutOfRange { index, len })?;
        *slot = !*slot;
        if *slot {
            self.order.push(index);
        } else {
            self.order.retain(|&i| i != index);
        }
        Ok(*slot)
    }

    #[must_use]
    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.get(index).copied().unwrap_or(false)
    }

    /// Selected indices in the order they were clicked.
    #[must_use]
    pub fn click_order(&self) -> &[usize] {
        &self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.selected.fill(false);
        self.order.clear();
    }

    /// Turns the current selection into a sample of `population`.
    ///
    /// `population` must be the population the selection was built against.
    pub fn materialize(&self, population: &Population) -> Result<SampleResult, ValidationError> {
        if self.population_len() != population.len()
            && let Some(&index) = self.order.iter().find(|&&i| i >= population.len())
        {
            return Err(ValidationError::IndexOutOfRange {
                index,
                len: population.len(),
            });
        }
        if self.is_empty() {
            return Err(ValidationError::EmptySelection);
        }
        Ok(SampleResult::from_indices(
            population,
            self.order.clone(),
            self.len(),
        ))
    }
}

/// Replays a recorded list of clicks as a [`HaphazardSelection`].
///
/// A row clicked twice is deselected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HaphazardParams {
    pub clicks: Vec<usize>,
}

impl HaphazardParams {
    /// Builds the selection the clicks describe.
    pub fn replay(&self, population_len: usize) -> Result<HaphazardSelection, ValidationError> {
        let mut selection = HaphazardSelection::new(population_len);
        for &index in &self.clicks {
            selection.toggle(index)?;
        }
        Ok(selection)
    }
}

impl SamplingMethod for HaphazardParams {
    fn sample<R>(
        &self,
        population: &Population,
        _rng: &mut R,
    ) -> Result<SampleResult, ValidationError>
    where
        R: Rng + ?Sized,
    {
        if population.is_empty() {
            return Err(ValidationError::EmptyPopulation);
        }
        self.replay(population.len())?.materialize(population)
    }
}
