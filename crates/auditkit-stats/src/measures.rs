//! Individual statistical measures.
//!
//! Every function accepts any iterator of `f64`. Non-finite values are
//! skipped, and an empty input (after skipping) yields `None`.
//!
//! Variance is the *population* variance (divides by `N`, not `N - 1`).

use std::{collections::HashMap, hash::Hash};

/// Means whose absolute value is at or below this threshold are treated as zero.
///
/// Dividing by such a mean would report absurd percentages for groups of
/// near-zero values, so [`coefficient_of_variation`] returns `None` instead.
pub const NEGLIGIBLE_MEAN: f64 = 1e-9;

fn finite_values<I>(values: I) -> Vec<f64>
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().filter(|v| v.is_finite()).collect()
}

/// Computes the arithmetic mean.
///
/// # Examples
///
/// ```
/// use auditkit_stats::measures::mean;
///
/// assert_eq!(mean([1.0, 2.0, 3.0]), Some(2.0));
/// assert_eq!(mean([1.0, f64::NAN, 3.0]), Some(2.0));
/// assert_eq!(mean(std::iter::empty()), None);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let values = finite_values(values);
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Computes the population variance around a precomputed mean.
///
/// # Examples
///
/// ```
/// use auditkit_stats::measures::variance;
///
/// assert_eq!(variance([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 5.0), Some(4.0));
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn variance<I>(values: I, mean: f64) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let values = finite_values(values);
    if values.is_empty() {
        return None;
    }
    let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    Some(sum_sq / values.len() as f64)
}

/// Computes the population standard deviation around a precomputed mean.
#[must_use]
pub fn std_dev<I>(values: I, mean: f64) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    variance(values, mean).map(f64::sqrt)
}

/// Computes the coefficient of variation as a percentage (`std_dev / mean * 100`).
///
/// Returns `None` when there are no values or when the mean is negligible
/// (see [`NEGLIGIBLE_MEAN`]).
///
/// # Examples
///
/// ```
/// use auditkit_stats::measures::coefficient_of_variation;
///
/// let cv = coefficient_of_variation([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
/// assert!((cv - 40.0).abs() < 1e-9);
///
/// assert_eq!(coefficient_of_variation([0.0, 0.0]), None);
/// ```
#[must_use]
pub fn coefficient_of_variation<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let values = finite_values(values);
    let mean = mean(values.iter().copied())?;
    if mean.abs() <= NEGLIGIBLE_MEAN {
        return None;
    }
    let std_dev = std_dev(values, mean)?;
    Some(std_dev / mean * 100.0)
}

/// Computes the median.
///
/// For an even number of values, the median is the average of the two middle
/// values. The caller's slice is not reordered.
///
/// # Examples
///
/// ```
/// use auditkit_stats::measures::median;
///
/// let values = [4.0, 1.0, 3.0, 2.0];
/// assert_eq!(median(&values), Some(2.5));
/// assert_eq!(values, [4.0, 1.0, 3.0, 2.0]);
/// ```
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = finite_values(values.iter().copied());
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some(f64::midpoint(sorted[mid - 1], sorted[mid]))
    } else {
        Some(sorted[mid])
    }
}

/// Counts how many times the most frequent value occurs.
///
/// This returns the *frequency* of the mode, not the mode itself.
///
/// # Examples
///
/// ```
/// use auditkit_stats::measures::mode_frequency;
///
/// assert_eq!(mode_frequency(["a", "b", "a", "c", "a"]), Some(3));
/// assert_eq!(mode_frequency(Vec::<&str>::new()), None);
/// ```
#[must_use]
pub fn mode_frequency<I, T>(values: I) -> Option<usize>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash,
{
    let mut counts = HashMap::<T, usize>::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    counts.into_values().max()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_empty_inputs_yield_none() {
        assert_eq!(mean(std::iter::empty()), None);
        assert_eq!(variance(std::iter::empty(), 0.0), None);
        assert_eq!(std_dev(std::iter::empty(), 0.0), None);
        assert_eq!(coefficient_of_variation(std::iter::empty()), None);
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_non_finite_values_are_excluded() {
        assert_eq!(mean([f64::NAN, f64::INFINITY]), None);
        assert_eq!(mean([f64::NAN, 4.0, 6.0]), Some(5.0));
        assert_eq!(median(&[f64::NAN, 1.0, 3.0]), Some(2.0));
    }

    #[test]
    fn test_variance_divides_by_n() {
        // Sample variance would be 2.0 here
        let v = variance([1.0, 2.0, 3.0, 4.0, 5.0], 3.0).unwrap();
        assert!((v - 2.0).abs() < EPS);
        let v = variance([1.0, 3.0], 2.0).unwrap();
        assert!((v - 1.0).abs() < EPS);
    }

    #[test]
    fn test_cv_of_constant_values_is_zero() {
        assert_eq!(coefficient_of_variation([10.0; 9]), Some(0.0));
    }

    #[test]
    fn test_cv_negligible_mean() {
        assert_eq!(coefficient_of_variation([1e-12, -1e-12]), None);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[10.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(median(&[7.0]), Some(7.0));
    }

    #[test]
    fn test_mode_frequency_counts_most_common() {
        assert_eq!(mode_frequency([1, 2, 2, 3, 3, 3]), Some(3));
        assert_eq!(mode_frequency([1, 2, 3]), Some(1));
    }
}
