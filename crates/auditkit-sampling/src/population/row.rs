use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Value;

/// Canonical ledger column names.
pub mod columns {
    pub const ACCOUNT_CODE: &str = "ACCOUNT CODE";
    pub const ACCOUNT_NAME: &str = "ACCOUNT NAME";
    pub const ENTRY_DATE: &str = "Entry Date";
    pub const ENTRY_NUMBER: &str = "ENTRY NUMBER";
    pub const NARRATION: &str = "NARRATION";
    pub const AMOUNT: &str = "AMOUNT";
    pub const USER: &str = "USER";

    /// All canonical columns, in display order.
    pub const CANONICAL: [&str; 7] = [
        ACCOUNT_CODE,
        ACCOUNT_NAME,
        ENTRY_DATE,
        ENTRY_NUMBER,
        NARRATION,
        AMOUNT,
        USER,
    ];
}

/// A ledger row: a mapping from column name to cell value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, Value>);

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion.
    ///
    /// # Examples
    ///
    /// ```
    /// use auditkit_sampling::{Row, population::columns};
    ///
    /// let row = Row::new()
    ///     .with(columns::ACCOUNT_NAME, "Cash")
    ///     .with(columns::AMOUNT, -120.0);
    /// assert_eq!(row.amount(), Some(-120.0));
    /// assert_eq!(row.abs_amount(), Some(120.0));
    /// ```
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(column.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    #[must_use]
    pub fn contains_column(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }

    /// Signed numeric value of the `AMOUNT` column.
    #[must_use]
    pub fn amount(&self) -> Option<f64> {
        self.get(columns::AMOUNT).and_then(Value::as_number)
    }

    /// Magnitude of the `AMOUNT` column.
    #[must_use]
    pub fn abs_amount(&self) -> Option<f64> {
        self.amount().map(f64::abs)
    }

    /// Projects the row onto the canonical column set.
    ///
    /// Missing or empty canonical columns become empty text; non-canonical
    /// columns are dropped.
    #[must_use]
    pub fn to_canonical(&self) -> Row {
        columns::CANONICAL
            .iter()
            .map(|&column| {
                let value = match self.get(column) {
                    Some(value) if !value.is_blank() => value.clone(),
                    _ => Value::Text(String::new()),
                };
                (column.to_owned(), value)
            })
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
