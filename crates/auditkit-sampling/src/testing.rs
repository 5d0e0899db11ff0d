use rand::SeedableRng as _;

use crate::{
    SampleRng,
    population::{Population, Row, columns},
};

/// Builds a population whose rows carry an entry number (1-based) and an amount.
pub(crate) fn ledger(amounts: &[f64]) -> Population {
    amounts
        .iter()
        .zip(1_u32..)
        .map(|(&amount, entry)| {
            Row::new()
                .with(columns::ENTRY_NUMBER, f64::from(entry))
                .with(columns::AMOUNT, amount)
        })
        .collect()
}

/// A population of `len` rows with amounts `1.0..=len`.
pub(crate) fn sequential(len: u32) -> Population {
    ledger(&(1..=len).map(f64::from).collect::<Vec<_>>())
}

pub(crate) fn rng(seed: u64) -> SampleRng {
    SampleRng::seed_from_u64(seed)
}

pub(crate) fn assert_no_duplicates(indices: &[usize]) {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), indices.len(), "duplicate selection in {indices:?}");
}
