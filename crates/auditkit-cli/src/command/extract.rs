use std::path::PathBuf;

use auditkit_sampling::{
    Population, ValidationError, compute_descriptive_stats,
    extract::{self, ColumnStats, Measure, MeasureValue},
};
use chrono::Utc;

use crate::{command::PopulationArg, schema::report::ExtractReport, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ExtractArg {
    #[command(flatten)]
    population: PopulationArg,
    /// Column to summarize; repeat for several (default: every extractable column)
    #[arg(long = "column")]
    columns: Vec<String>,
    /// Comma-separated measures: mean, variance, stddev, cv, median, mode
    #[arg(long = "measure", value_delimiter = ',', required = true)]
    measures: Vec<Measure>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ExtractArg) -> anyhow::Result<()> {
    let ExtractArg {
        population,
        columns,
        measures,
        output,
    } = arg;
    let (population, source) = population.load(None)?;

    let stats = column_stats(&population, columns, measures)?;

    let report = ExtractReport {
        generated_at: Utc::now(),
        source,
        columns: stats,
    };
    Output::save_json(&report, output.clone())?;

    eprintln!();
    eprintln!("Statistics computed successfully");
    if let Some(path) = output {
        eprintln!("  Path: {}", path.display());
    }
    for column in &report.columns {
        eprintln!("  {}:", column.column);
        for (measure, value) in &column.values {
            match value {
                MeasureValue::Number(n) if *measure == Measure::Cv => {
                    eprintln!("    {measure}: {n:.2}%");
                }
                MeasureValue::Number(n) => eprintln!("    {measure}: {n:.2}"),
                MeasureValue::Count(count) => eprintln!("    {measure}: {count}"),
                MeasureValue::Missing => eprintln!("    {measure}: -"),
            }
        }
    }

    Ok(())
}

/// Computes `measures` for `columns`, or for every extractable column when
/// none are named.
///
/// Without named columns, each column only gets the measures that apply to
/// it, and a column to which none apply is left out.
fn column_stats(
    population: &Population,
    columns: &[String],
    measures: &[Measure],
) -> Result<Vec<ColumnStats>, ValidationError> {
    if !columns.is_empty() {
        return compute_descriptive_stats(population, columns.iter().map(String::as_str), measures);
    }

    let mut stats = vec![];
    for column in extract::extractable_columns(population) {
        let applicable = measures
            .iter()
            .copied()
            .filter(|measure| measure.applies_to(&column))
            .collect::<Vec<_>>();
        if applicable.is_empty() {
            continue;
        }
        stats.extend(compute_descriptive_stats(
            population,
            [column.as_str()],
            &applicable,
        )?);
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use auditkit_sampling::{Row, population::columns};

    use super::*;

    fn population() -> Population {
        [("Cash", 100.0), ("Cash", 300.0), ("Bank", 200.0)]
            .into_iter()
            .map(|(name, amount)| {
                Row::new()
                    .with(columns::ACCOUNT_NAME, name)
                    .with(columns::AMOUNT, amount)
                    .with(columns::NARRATION, "payment")
            })
            .collect()
    }

    #[test]
    fn test_default_columns_get_applicable_measures() {
        let stats = column_stats(&population(), &[], &[Measure::Mean, Measure::Mode]).unwrap();
        let names = stats.iter().map(|s| s.column.as_str()).collect::<Vec<_>>();
        assert_eq!(names, [columns::ACCOUNT_NAME, columns::AMOUNT]);

        let account = &stats[0];
        assert_eq!(account.values.len(), 1);
        assert_eq!(account.get(Measure::Mode), Some(MeasureValue::Count(2)));
        assert_eq!(account.get(Measure::Mean), None);

        let amount = &stats[1];
        assert_eq!(amount.get(Measure::Mean), Some(MeasureValue::Number(200.0)));
        assert_eq!(amount.get(Measure::Mode), Some(MeasureValue::Count(1)));
    }

    #[test]
    fn test_default_columns_skip_columns_without_measures() {
        let stats = column_stats(&population(), &[], &[Measure::Median]).unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].column, columns::AMOUNT);
        assert_eq!(stats[0].get(Measure::Median), Some(MeasureValue::Number(200.0)));
    }

    #[test]
    fn test_named_columns_reject_inapplicable_measures() {
        let err = column_stats(
            &population(),
            &[columns::ACCOUNT_NAME.to_owned()],
            &[Measure::Mean],
        )
        .unwrap_err();
        assert!(err.is_measure_not_applicable());
    }
}
