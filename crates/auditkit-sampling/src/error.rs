use crate::extract::Measure;

/// Caller-input problems detected before any selection is made.
///
/// Returned as a value so that the caller can report the message and let the
/// user retry with different parameters.
#[derive(
    Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum ValidationError {
    #[display("population is empty")]
    EmptyPopulation,
    #[display("population has no '{column}' column")]
    MissingColumn { column: String },
    #[display("sample size must be between {min} and {max}, got {sample_size}")]
    SampleSizeOutOfRange {
        sample_size: usize,
        min: usize,
        max: usize,
    },
    #[display("starting row must be between 1 and {max}, got {starting_row}")]
    StartingRowOutOfRange { starting_row: usize, max: usize },
    #[display("block size must be between 1 and {max}, got {block_size}")]
    BlockSizeOutOfRange { block_size: usize, max: usize },
    #[display("number of blocks must be between 1 and {max}, got {num_blocks}")]
    BlockCountOutOfRange { num_blocks: usize, max: usize },
    #[display(
        "sample size {sample_size} does not match {num_blocks} blocks of {block_size} rows"
    )]
    BlockSampleSizeMismatch {
        sample_size: usize,
        block_size: usize,
        num_blocks: usize,
    },
    #[display("maximum CV must be a positive percentage, got {max_cv}")]
    InvalidMaxCv { max_cv: f64 },
    #[display("no rows selected")]
    EmptySelection,
    #[display("row index {index} is outside the population of {len} rows")]
    IndexOutOfRange { index: usize, len: usize },
    #[display("column '{column}' not found in population")]
    UnknownColumn { column: String },
    #[display("measure '{measure}' does not apply to column '{column}'")]
    MeasureNotApplicable { column: String, measure: Measure },
}
