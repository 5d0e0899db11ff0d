use std::path::PathBuf;

use auditkit_sampling::{
    Population, Row, SampleResult, SampleSeed, SamplingStrategy, extract::ColumnStats,
    homogeneity::Partition,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a population was read from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    /// Workbook file path
    pub input: PathBuf,
    /// Sheets that made up the population, in order
    pub sheets: Vec<String>,
    /// Number of rows in the population
    pub population_size: usize,
}

/// Result of `auditkit sample`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleReport {
    /// Timestamp when the report was generated (RFC 3339, UTC)
    pub generated_at: DateTime<Utc>,
    pub source: Source,
    /// Strategy and the parameters it was run with
    pub strategy: SamplingStrategy,
    /// Seed to re-perform the sample; absent for deterministic strategies
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub seed: Option<SampleSeed>,
    /// Selected rows (canonical columns), provenance and shortfall
    pub result: SampleResult,
}

/// Result of `auditkit partition`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionReport {
    pub generated_at: DateTime<Utc>,
    pub source: Source,
    /// Maximum CV in percent
    pub max_cv: f64,
    /// CV of the whole population in percent
    pub overall_cv: f64,
    pub groups: Vec<GroupReport>,
}

/// One subpopulation with its rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupReport {
    /// 1-based group number in partition order
    pub group: usize,
    pub cv: f64,
    pub is_unassigned: bool,
    pub within_threshold: bool,
    /// Population indices of the rows
    pub members: Vec<usize>,
    pub rows: Vec<Row>,
}

impl PartitionReport {
    pub fn new(
        source: Source,
        partition: &Partition,
        population: &Population,
        only_within_threshold: bool,
    ) -> Self {
        let groups = partition
            .groups
            .iter()
            .enumerate()
            .map(|(i, group)| GroupReport {
                group: i + 1,
                cv: group.cv,
                is_unassigned: group.is_unassigned,
                within_threshold: group.is_within(partition.max_cv),
                members: group.members.clone(),
                rows: group
                    .rows(population)
                    .iter()
                    .map(Row::to_canonical)
                    .collect(),
            })
            .filter(|group| !only_within_threshold || group.within_threshold)
            .collect();
        Self {
            generated_at: Utc::now(),
            source,
            max_cv: partition.max_cv,
            overall_cv: partition.overall_cv,
            groups,
        }
    }
}

/// Result of `auditkit extract`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractReport {
    pub generated_at: DateTime<Utc>,
    pub source: Source,
    pub columns: Vec<ColumnStats>,
}
