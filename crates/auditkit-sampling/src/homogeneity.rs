//! Partitioning a population into groups of similar magnitude.
//!
//! Rows are ordered by `|AMOUNT|` and grown greedily into groups whose
//! coefficient of variation stays within a threshold:
//!
//! ```
//! use auditkit_sampling::{Population, Row, partition_by_homogeneity, population::columns};
//!
//! let population: Population = [10.0, 1000.0, 10.0, 10.0]
//!     .into_iter()
//!     .map(|amount| Row::new().with(columns::AMOUNT, amount))
//!     .collect();
//!
//! let partition = partition_by_homogeneity(&population, 40.0).unwrap();
//! assert_eq!(partition.groups.len(), 2);
//! assert_eq!(partition.groups[0].members, vec![0, 2, 3]);
//! assert_eq!(partition.groups[1].members, vec![1]);
//! ```

use auditkit_stats::measures;
use serde::{Deserialize, Serialize};

use crate::{Population, Row, ValidationError, population::columns};

/// A group of rows produced by [`partition_by_homogeneity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subpopulation {
    /// Population indices in ascending `|AMOUNT|` order.
    pub members: Vec<usize>,
    /// Coefficient of variation of the members' `|AMOUNT|`, in percent.
    pub cv: f64,
    /// Rows whose `AMOUNT` is not numeric and could not be grouped.
    pub is_unassigned: bool,
}

impl Subpopulation {
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns `true` for an assigned group whose CV does not exceed `max_cv`.
    #[must_use]
    pub fn is_within(&self, max_cv: f64) -> bool {
        !self.is_unassigned && self.cv <= max_cv
    }

    #[must_use]
    pub fn rows(&self, population: &Population) -> Vec<Row> {
        population.select(&self.members)
    }
}

/// The result of [`partition_by_homogeneity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    pub groups: Vec<Subpopulation>,
    /// Threshold the partition was built with, in percent.
    pub max_cv: f64,
    /// CV of the whole population before grouping.
    pub overall_cv: f64,
}

impl Partition {
    /// Groups whose CV is within the threshold, excluding the unassigned bucket.
    pub fn within_threshold(&self) -> impl Iterator<Item = &Subpopulation> + '_ {
        self.groups
            .iter()
            .filter(|group| group.is_within(self.max_cv))
    }

    /// All members in group order.
    pub fn members(&self) -> impl Iterator<Item = usize> + '_ {
        self.groups.iter().flat_map(|group| group.members.iter().copied())
    }
}

fn group_cv(amounts: &[(usize, f64)]) -> f64 {
    measures::coefficient_of_variation(amounts.iter().map(|&(_, amount)| amount)).unwrap_or(0.0)
}

/// Splits `population` into groups whose `|AMOUNT|` CV does not exceed `max_cv` percent.
///
/// Starting from the smallest unplaced amount, a group keeps absorbing the
/// next larger amount while its CV stays within `max_cv`. A row that cannot
/// join its neighbor forms a singleton group with CV 0. Rows without a
/// numeric amount are collected in one trailing group marked `is_unassigned`.
pub fn partition_by_homogeneity(
    population: &Population,
    max_cv: f64,
) -> Result<Partition, ValidationError> {
    if !(max_cv.is_finite() && max_cv > 0.0) {
        return Err(ValidationError::InvalidMaxCv { max_cv });
    }
    population.require_column(columns::AMOUNT)?;

    let mut amounts = vec![];
    let mut unassigned = vec![];
    for (index, row) in population.iter() {
        match row.abs_amount() {
            Some(amount) => amounts.push((index, amount)),
            None => unassigned.push(index),
        }
    }
    amounts.sort_by(|a, b| a.1.total_cmp(&b.1));

    let overall_cv = group_cv(&amounts);
    let mut groups = vec![];
    let mut start = 0;
    while start < amounts.len() {
        let mut end = start + 1;
        while end < amounts.len() && group_cv(&amounts[start..=end]) <= max_cv {
            end += 1;
        }
        let group = &amounts[start..end];
        groups.push(Subpopulation {
            members: group.iter().map(|&(index, _)| index).collect(),
            cv: group_cv(group),
            is_unassigned: false,
        });
        start = end;
    }
    if !unassigned.is_empty() {
        tracing::warn!(rows = unassigned.len(), "rows without a numeric amount left unassigned");
        groups.push(Subpopulation {
            members: unassigned,
            cv: 0.0,
            is_unassigned: true,
        });
    }

    tracing::debug!(max_cv, overall_cv, groups = groups.len(), "population partitioned");
    Ok(Partition {
        groups,
        max_cv,
        overall_cv,
    })
}
