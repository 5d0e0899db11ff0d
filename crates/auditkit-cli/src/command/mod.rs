use std::path::PathBuf;

use anyhow::Context as _;
use auditkit_sampling::{Population, Workbook};
use clap::{Parser, Subcommand};

use crate::{logger, schema::report::Source, util};

use self::{extract::ExtractArg, partition::PartitionArg, sample::SampleArg};

mod extract;
mod partition;
mod sample;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log debug events from the sampling engine
    #[arg(long, short, global = true)]
    verbose: bool,
    /// What to do with the population
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Draw a sample with one of the sampling strategies
    Sample(#[clap(flatten)] SampleArg),
    /// Group rows into subpopulations with bounded coefficient of variation
    Partition(#[clap(flatten)] PartitionArg),
    /// Compute descriptive statistics per column
    Extract(#[clap(flatten)] ExtractArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    logger::init_logger(args.verbose);
    match args.mode {
        Mode::Sample(arg) => sample::run(&arg)?,
        Mode::Partition(arg) => partition::run(&arg)?,
        Mode::Extract(arg) => extract::run(&arg)?,
    }
    Ok(())
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PopulationArg {
    /// Workbook JSON file
    #[arg(long)]
    input: PathBuf,
    /// Sheet to include; repeat for several sheets (default: every sheet)
    #[arg(long = "sheet")]
    sheets: Vec<String>,
}

impl PopulationArg {
    /// Reads the workbook and concatenates the selected sheets.
    ///
    /// With `required_column`, sheets lacking that column are left out.
    fn load(&self, required_column: Option<&str>) -> anyhow::Result<(Population, Source)> {
        let workbook = util::read_workbook_file(&self.input)?;
        self.load_from(&workbook, required_column)
    }

    fn load_from(
        &self,
        workbook: &Workbook,
        required_column: Option<&str>,
    ) -> anyhow::Result<(Population, Source)> {
        let selected = if self.sheets.is_empty() {
            workbook.sheets.iter().collect::<Vec<_>>()
        } else {
            self.sheets
                .iter()
                .map(|name| {
                    workbook.sheet(name).with_context(|| {
                        format!(
                            "Sheet not found: {name} (available: {})",
                            workbook.sheet_names().collect::<Vec<_>>().join(", ")
                        )
                    })
                })
                .collect::<anyhow::Result<Vec<_>>>()?
        };

        let population = Population::from_sheets(selected.iter().copied(), required_column)
            .with_context(|| format!("No usable population in {}", self.input.display()))?;
        let sheets: Vec<String> = selected
            .iter()
            .filter(|sheet| required_column.is_none_or(|column| sheet.has_column(column)))
            .map(|sheet| sheet.name.clone())
            .collect();

        tracing::info!(
            input = %self.input.display(),
            sheets = ?sheets,
            rows = population.len(),
            "population loaded"
        );
        let source = Source {
            input: self.input.clone(),
            sheets,
            population_size: population.len(),
        };
        Ok((population, source))
    }
}

#[cfg(test)]
mod tests {
    use auditkit_sampling::{Row, Sheet, population::columns};

    use super::*;

    fn workbook() -> Workbook {
        let amounts = |amounts: &[f64]| -> Vec<Row> {
            amounts
                .iter()
                .map(|&amount| Row::new().with(columns::AMOUNT, amount))
                .collect()
        };
        Workbook {
            sheets: vec![
                Sheet::new("January", amounts(&[10.0, 20.0])),
                Sheet::new("Notes", vec![Row::new().with(columns::NARRATION, "memo")]),
                Sheet::new("February", amounts(&[30.0])),
            ],
        }
    }

    fn arg(sheets: &[&str]) -> PopulationArg {
        PopulationArg {
            input: PathBuf::from("ledger.json"),
            sheets: sheets.iter().map(|&name| name.to_owned()).collect(),
        }
    }

    #[test]
    fn test_all_sheets_skip_those_without_required_column() {
        let (population, source) = arg(&[])
            .load_from(&workbook(), Some(columns::AMOUNT))
            .unwrap();
        assert_eq!(population.len(), 3);
        assert_eq!(source.sheets, ["January", "February"]);
        assert_eq!(source.population_size, 3);
    }

    #[test]
    fn test_selected_sheets_in_given_order() {
        let (population, source) = arg(&["February", "January"])
            .load_from(&workbook(), Some(columns::AMOUNT))
            .unwrap();
        assert_eq!(source.sheets, ["February", "January"]);
        assert_eq!(population.get(0).unwrap().amount(), Some(30.0));
    }

    #[test]
    fn test_without_required_column_every_sheet_counts() {
        let (population, source) = arg(&[]).load_from(&workbook(), None).unwrap();
        assert_eq!(population.len(), 4);
        assert_eq!(source.sheets, ["January", "Notes", "February"]);
    }

    #[test]
    fn test_unknown_sheet_is_an_error() {
        let err = arg(&["March"])
            .load_from(&workbook(), None)
            .unwrap_err()
            .to_string();
        assert!(err.contains("Sheet not found: March"), "{err}");
        assert!(err.contains("January, Notes, February"), "{err}");
    }

    #[test]
    fn test_no_sheet_with_required_column() {
        assert!(
            arg(&["Notes"])
                .load_from(&workbook(), Some(columns::AMOUNT))
                .is_err()
        );
    }
}
