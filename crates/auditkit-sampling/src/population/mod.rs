//! Row populations drawn from one or more sheets.
//!
//! - [`Value`] - A single cell value (number, text or empty)
//! - [`Row`] - A mapping from column name to [`Value`]
//! - [`Sheet`] / [`Workbook`] - Named row lists as supplied by the importer
//! - [`Population`] - The immutable snapshot every operation works on
//!
//! A row's identity inside a [`Population`] is its position. Strategies track
//! selections by position, so duplicate rows never confuse the mapping back to
//! the source.

pub use self::{
    row::{Row, columns},
    sheet::{Sheet, Workbook},
    value::Value,
};

mod row;
mod sheet;
mod value;

use crate::ValidationError;

/// An ordered, immutable snapshot of ledger rows.
///
/// # Example
///
/// ```
/// use auditkit_sampling::{Population, Row, Sheet, population::columns};
///
/// let with_amount = Sheet::new("GL", vec![Row::new().with(columns::AMOUNT, 10.0)]);
/// let without_amount = Sheet::new("Notes", vec![Row::new().with(columns::NARRATION, "memo")]);
///
/// let population =
///     Population::from_sheets([&with_amount, &without_amount], Some(columns::AMOUNT)).unwrap();
/// assert_eq!(population.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    rows: Vec<Row>,
}

impl Population {
    #[must_use]
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Concatenates sheets in order into one population.
    ///
    /// When `required_column` is given, a sheet whose rows do not all carry that
    /// column is excluded as a whole.
    pub fn from_sheets<'a, I>(
        sheets: I,
        required_column: Option<&str>,
    ) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = &'a Sheet>,
    {
        let mut rows = vec![];
        for sheet in sheets {
            if let Some(column) = required_column
                && !sheet.has_column(column)
            {
                tracing::warn!(sheet = %sheet.name, column, "excluding sheet without required column");
                continue;
            }
            rows.extend(sheet.rows.iter().cloned());
        }

        if rows.is_empty() {
            return Err(match required_column {
                Some(column) => ValidationError::MissingColumn {
                    column: column.to_owned(),
                },
                None => ValidationError::EmptyPopulation,
            });
        }
        Ok(Self { rows })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Iterates rows together with their population index.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (usize, &Row)> + '_ {
        self.rows.iter().enumerate()
    }

    /// Fails unless the population is non-empty and every row carries `column`.
    pub fn require_column(&self, column: &str) -> Result<(), ValidationError> {
        if self.rows.is_empty() {
            return Err(ValidationError::EmptyPopulation);
        }
        if !self.rows.iter().all(|row| row.contains_column(column)) {
            return Err(ValidationError::MissingColumn {
                column: column.to_owned(),
            });
        }
        Ok(())
    }

    /// Clones the rows at `indices`, in the given order.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds.
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Vec<Row> {
        indices.iter().map(|&i| self.rows[i].clone()).collect()
    }
}

impl From<Vec<Row>> for Population {
    fn from(rows: Vec<Row>) -> Self {
        Self::new(rows)
    }
}

impl FromIterator<Row> for Population {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount_sheet(name: &str, amounts: &[f64]) -> Sheet {
        Sheet::new(
            name,
            amounts
                .iter()
                .map(|&a| Row::new().with(columns::AMOUNT, a))
                .collect(),
        )
    }

    #[test]
    fn test_from_sheets_concatenates_in_order() {
        let a = amount_sheet("A", &[1.0, 2.0]);
        let b = amount_sheet("B", &[3.0]);
        let population = Population::from_sheets([&a, &b], Some(columns::AMOUNT)).unwrap();
        let amounts: Vec<_> = population.iter().map(|(_, r)| r.amount().unwrap()).collect();
        assert_eq!(amounts, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_from_sheets_excludes_sheet_with_partial_column() {
        let mut partial = amount_sheet("Partial", &[5.0]);
        partial.rows.push(Row::new().with(columns::USER, "bob"));
        let full = amount_sheet("Full", &[1.0]);
        let population = Population::from_sheets([&partial, &full], Some(columns::AMOUNT)).unwrap();
        assert_eq!(population.len(), 1);
        assert_eq!(population.get(0).unwrap().amount(), Some(1.0));
    }

    #[test]
    fn test_from_sheets_without_candidates() {
        let notes = Sheet::new("Notes", vec![Row::new().with(columns::USER, "x")]);
        assert_eq!(
            Population::from_sheets([&notes], Some(columns::AMOUNT)),
            Err(ValidationError::MissingColumn {
                column: columns::AMOUNT.to_owned()
            })
        );
        assert_eq!(
            Population::from_sheets(std::iter::empty(), None),
            Err(ValidationError::EmptyPopulation)
        );
    }

    #[test]
    fn test_require_column() {
        let population = Population::new(vec![]);
        assert_eq!(
            population.require_column(columns::AMOUNT),
            Err(ValidationError::EmptyPopulation)
        );

        let population: Population = [
            Row::new().with(columns::AMOUNT, 1.0),
            Row::new().with(columns::USER, "x"),
        ]
        .into_iter()
        .collect();
        assert!(population.require_column(columns::AMOUNT).is_err());
        assert!(population.require_column("missing").is_err());
    }

    #[test]
    fn test_select_keeps_given_order() {
        let population: Population = (0_u32..5)
            .map(|i| Row::new().with(columns::AMOUNT, f64::from(i)))
            .collect();
        let rows = population.select(&[3, 0]);
        assert_eq!(rows[0].amount(), Some(3.0));
        assert_eq!(rows[1].amount(), Some(0.0));
    }
}
