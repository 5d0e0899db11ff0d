use std::path::PathBuf;

use anyhow::Context as _;
use auditkit_sampling::{partition_by_homogeneity, population::columns};

use crate::{command::PopulationArg, schema::report::PartitionReport, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PartitionArg {
    #[command(flatten)]
    population: PopulationArg,
    /// Maximum coefficient of variation per group, in percent
    #[arg(long, default_value_t = 40.0)]
    max_cv: f64,
    /// Only report groups whose CV is within the maximum
    #[arg(long)]
    within_threshold: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &PartitionArg) -> anyhow::Result<()> {
    let PartitionArg {
        population,
        max_cv,
        within_threshold,
        output,
    } = arg;
    let (population, source) = population.load(Some(columns::AMOUNT))?;

    let partition =
        partition_by_homogeneity(&population, *max_cv).context("Failed to partition population")?;
    let report = PartitionReport::new(source, &partition, &population, *within_threshold);
    Output::save_json(&report, output.clone())?;

    eprintln!();
    eprintln!("Partition generated successfully");
    if let Some(path) = output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Population CV: {:.2}%", partition.overall_cv);
    eprintln!(
        "  Groups: {} ({} within {:.2}%)",
        partition.groups.len(),
        partition.within_threshold().count(),
        partition.max_cv
    );
    for group in &report.groups {
        let label = if group.is_unassigned {
            " (unassigned)"
        } else {
            ""
        };
        eprintln!(
            "  {:3}: {:5} rows, CV {:.2}%{label}",
            group.group,
            group.members.len(),
            group.cv
        );
    }

    Ok(())
}
