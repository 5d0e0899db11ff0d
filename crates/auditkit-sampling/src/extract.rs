//! Per-column descriptive statistics.
//!
//! [`compute_descriptive_stats`] evaluates a set of [`Measure`]s for each
//! requested column. Numeric measures use the values that parse as numbers;
//! [`Measure::Mode`] counts over all non-blank cells, text included.
//!
//! Identifier-like columns only admit [`Measure::Mode`], and free-form columns
//! are not offered at all (see [`extractable_columns`]).

use std::collections::{BTreeMap, BTreeSet};

use auditkit_stats::{descriptive::DescriptiveStats, measures::mode_frequency};
use serde::{Deserialize, Serialize};

use crate::{Population, ValidationError, population::columns};

/// Columns for which only [`Measure::Mode`] is meaningful.
pub const MODE_ONLY_COLUMNS: [&str; 3] = [
    columns::ACCOUNT_CODE,
    columns::ACCOUNT_NAME,
    columns::ENTRY_DATE,
];

/// Columns that are never offered for extraction.
pub const EXCLUDED_COLUMNS: [&str; 3] = [columns::ENTRY_NUMBER, columns::NARRATION, columns::USER];

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Mean,
    Variance,
    #[display("Standard deviation")]
    StdDev,
    #[display("CV")]
    Cv,
    Median,
    Mode,
}

impl Measure {
    pub const ALL: [Self; 6] = [
        Self::Mean,
        Self::Variance,
        Self::StdDev,
        Self::Cv,
        Self::Median,
        Self::Mode,
    ];

    /// Returns `true` if the measure can be computed for `column`.
    ///
    /// # Examples
    ///
    /// ```
    /// use auditkit_sampling::{extract::Measure, population::columns};
    ///
    /// assert!(Measure::Mean.applies_to(columns::AMOUNT));
    /// assert!(!Measure::Mean.applies_to(columns::ACCOUNT_NAME));
    /// assert!(Measure::Mode.applies_to(columns::ACCOUNT_NAME));
    /// assert!(!Measure::Mode.applies_to(columns::NARRATION));
    /// ```
    #[must_use]
    pub fn applies_to(self, column: &str) -> bool {
        if EXCLUDED_COLUMNS.contains(&column) {
            return false;
        }
        self == Self::Mode || !MODE_ONLY_COLUMNS.contains(&column)
    }
}

/// The value of one measure for one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(untagged)]
pub enum MeasureValue {
    Number(f64),
    /// Frequency of the most common value.
    Count(usize),
    /// No valid input for the measure.
    Missing,
}

impl MeasureValue {
    fn from_number(value: Option<f64>) -> Self {
        value.map_or(Self::Missing, Self::Number)
    }

    #[must_use]
    pub fn as_number(self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(n),
            Self::Count(_) | Self::Missing => None,
        }
    }
}

/// Requested measures for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub column: String,
    pub values: BTreeMap<Measure, MeasureValue>,
}

impl ColumnStats {
    #[must_use]
    pub fn get(&self, measure: Measure) -> Option<MeasureValue> {
        self.values.get(&measure).copied()
    }
}

/// Columns present in `population` that may be extracted, in name order.
#[must_use]
pub fn extractable_columns(population: &Population) -> Vec<String> {
    population
        .rows()
        .iter()
        .flat_map(|row| row.columns())
        .filter(|column| !EXCLUDED_COLUMNS.contains(column))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// Computes `measures` for each of `columns`.
///
/// Fails if a column does not occur in the population or a measure does not
/// apply to a column. A measure without valid input yields
/// [`MeasureValue::Missing`], as does CV when the mean is negligible.
///
/// # Examples
///
/// ```
/// use auditkit_sampling::{
///     Population, Row, compute_descriptive_stats,
///     extract::{Measure, MeasureValue},
///     population::columns,
/// };
///
/// let population: Population = [2.0, 4.0, 4.0, 6.0]
///     .into_iter()
///     .map(|amount| Row::new().with(columns::AMOUNT, amount))
///     .collect();
///
/// let stats =
///     compute_descriptive_stats(&population, [columns::AMOUNT], &[Measure::Mean, Measure::Mode])
///         .unwrap();
/// assert_eq!(stats[0].get(Measure::Mean), Some(MeasureValue::Number(4.0)));
/// assert_eq!(stats[0].get(Measure::Mode), Some(MeasureValue::Count(2)));
/// ```
pub fn compute_descriptive_stats<'a, I>(
    population: &Population,
    columns: I,
    measures: &[Measure],
) -> Result<Vec<ColumnStats>, ValidationError>
where
    I: IntoIterator<Item = &'a str>,
{
    if population.is_empty() {
        return Err(ValidationError::EmptyPopulation);
    }

    let mut results = vec![];
    for column in columns {
        if !population.rows().iter().any(|row| row.contains_column(column)) {
            return Err(ValidationError::UnknownColumn {
                column: column.to_owned(),
            });
        }
        if let Some(&measure) = measures.iter().find(|m| !m.applies_to(column)) {
            return Err(ValidationError::MeasureNotApplicable {
                column: column.to_owned(),
                measure,
            });
        }

        let cells = population
            .rows()
            .iter()
            .filter_map(|row| row.get(column))
            .filter(|value| !value.is_blank())
            .collect::<Vec<_>>();
        let stats = DescriptiveStats::new(cells.iter().filter_map(|value| value.as_number()));

        let values = measures
            .iter()
            .map(|&measure| {
                let value = match measure {
                    Measure::Mean => MeasureValue::from_number(stats.as_ref().map(|s| s.mean)),
                    Measure::Variance => {
                        MeasureValue::from_number(stats.as_ref().map(|s| s.variance))
                    }
                    Measure::StdDev => MeasureValue::from_number(stats.as_ref().map(|s| s.std_dev)),
                    Measure::Cv => MeasureValue::from_number(stats.as_ref().and_then(|s| s.cv)),
                    Measure::Median => MeasureValue::from_number(stats.as_ref().map(|s| s.median)),
                    Measure::Mode => mode_frequency(cells.iter().map(|value| value.to_string()))
                        .map_or(MeasureValue::Missing, MeasureValue::Count),
                };
                (measure, value)
            })
            .collect();

        tracing::debug!(column, cells = cells.len(), "column statistics computed");
        results.push(ColumnStats {
            column: column.to_owned(),
            values,
        });
    }
    Ok(results)
}
