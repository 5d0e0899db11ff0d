use std::path::PathBuf;

use anyhow::Context as _;
use auditkit_sampling::{
    SampleSeed, SamplingStrategy,
    population::columns,
    run_sampling_strategy,
    strategy::{
        BlockParams, BlockRegime, HaphazardParams, RandomSampleParams, StepParams, WeightedParams,
    },
};
use chrono::Utc;
use clap::Subcommand;
use rand::Rng as _;

use crate::{command::PopulationArg, schema::report::SampleReport, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SampleArg {
    #[command(subcommand)]
    strategy: StrategyCommand,
}

#[derive(Debug, Clone, Subcommand)]
enum StrategyCommand {
    /// Uniform random sample without replacement
    Random(SizedArg),
    /// Every n-th row from a starting row
    FixedStep(StepArg),
    /// Random steps of 1 to 10 rows from a starting row
    VariableStep(StepArg),
    /// Monetary unit sample, weighted by |AMOUNT|
    Weighted(SizedArg),
    /// Contiguous blocks of rows
    Block(BlockArg),
    /// Manually chosen rows, kept in the order given
    Haphazard(HaphazardArg),
    /// Strategy read from a JSON plan file
    Plan(PlanArg),
}

#[derive(Debug, Clone, clap::Args)]
struct RunArg {
    #[command(flatten)]
    population: PopulationArg,
    /// Seed as 32 hex characters (default: random)
    #[arg(long)]
    seed: Option<SampleSeed>,
    /// Keep every input column instead of the canonical ledger columns
    #[arg(long)]
    all_columns: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, clap::Args)]
struct SizedArg {
    /// Number of rows to select
    #[arg(long)]
    sample_size: usize,
    #[command(flatten)]
    run: RunArg,
}

#[derive(Debug, Clone, clap::Args)]
struct StepArg {
    /// Number of rows to select
    #[arg(long)]
    sample_size: usize,
    /// 1-based row to start from
    #[arg(long, default_value_t = 1)]
    starting_row: usize,
    #[command(flatten)]
    run: RunArg,
}

#[derive(Debug, Clone, clap::Args)]
struct BlockArg {
    /// Rows per block (default: derived from the population size)
    #[arg(long)]
    block_size: Option<usize>,
    /// Number of blocks (default: derived from the population size)
    #[arg(long)]
    num_blocks: Option<usize>,
    /// Total rows; block size and count are adjusted to fit
    #[arg(long)]
    sample_size: Option<usize>,
    /// Block placement: auto, even_segments or non_overlapping
    #[arg(long, default_value = "auto")]
    regime: BlockRegime,
    #[command(flatten)]
    run: RunArg,
}

impl BlockArg {
    fn params(&self, population_len: usize) -> BlockParams {
        let suggested = BlockParams::suggested(population_len);
        let params = BlockParams::new(
            self.block_size.unwrap_or(suggested.block_size),
            self.num_blocks.unwrap_or(suggested.num_blocks),
        );
        let params = match self.sample_size {
            Some(sample_size) => params.derive_from_sample_size(population_len, sample_size),
            None if self.block_size.is_none() && self.num_blocks.is_none() => suggested,
            None => params,
        };
        params.with_regime(self.regime)
    }
}

#[derive(Debug, Clone, clap::Args)]
struct HaphazardArg {
    /// 1-based row numbers in selection order; a row given twice is deselected
    #[arg(long, value_delimiter = ',', required = true)]
    rows: Vec<usize>,
    #[command(flatten)]
    run: RunArg,
}

#[derive(Debug, Clone, clap::Args)]
struct PlanArg {
    /// JSON file holding a strategy, e.g. {"kind": "random", "sample_size": 25}
    #[arg(long, value_parser = parse_plan_file)]
    plan: SamplingStrategy,
    #[command(flatten)]
    run: RunArg,
}

fn parse_plan_file(path: &str) -> anyhow::Result<SamplingStrategy> {
    crate::util::read_plan_file(path)
}

impl StrategyCommand {
    fn run_arg(&self) -> &RunArg {
        match self {
            StrategyCommand::Random(arg) | StrategyCommand::Weighted(arg) => &arg.run,
            StrategyCommand::FixedStep(arg) | StrategyCommand::VariableStep(arg) => &arg.run,
            StrategyCommand::Block(arg) => &arg.run,
            StrategyCommand::Haphazard(arg) => &arg.run,
            StrategyCommand::Plan(arg) => &arg.run,
        }
    }

    fn required_column(&self) -> Option<&'static str> {
        match self {
            StrategyCommand::Plan(arg) => arg.plan.required_column(),
            StrategyCommand::Block(_) | StrategyCommand::Haphazard(_) => None,
            StrategyCommand::Random(_)
            | StrategyCommand::Weighted(_)
            | StrategyCommand::FixedStep(_)
            | StrategyCommand::VariableStep(_) => Some(columns::AMOUNT),
        }
    }

    fn strategy(&self, population_len: usize) -> anyhow::Result<SamplingStrategy> {
        let step = |arg: &StepArg| StepParams {
            sample_size: arg.sample_size,
            starting_row: arg.starting_row,
        };
        let strategy = match self {
            StrategyCommand::Random(arg) => SamplingStrategy::Random(RandomSampleParams {
                sample_size: arg.sample_size,
            }),
            StrategyCommand::FixedStep(arg) => SamplingStrategy::FixedStep(step(arg)),
            StrategyCommand::VariableStep(arg) => SamplingStrategy::VariableStep(step(arg)),
            StrategyCommand::Weighted(arg) => SamplingStrategy::Weighted(WeightedParams {
                sample_size: arg.sample_size,
            }),
            StrategyCommand::Block(arg) => SamplingStrategy::Block(arg.params(population_len)),
            StrategyCommand::Haphazard(arg) => {
                let clicks = arg
                    .rows
                    .iter()
                    .map(|&row| row.checked_sub(1).context("Row numbers start at 1, got 0"))
                    .collect::<anyhow::Result<_>>()?;
                SamplingStrategy::Haphazard(HaphazardParams { clicks })
            }
            StrategyCommand::Plan(arg) => arg.plan.clone(),
        };
        Ok(strategy)
    }
}

pub(crate) fn run(arg: &SampleArg) -> anyhow::Result<()> {
    let run_arg = arg.strategy.run_arg();
    let (population, source) = run_arg
        .population
        .load(arg.strategy.required_column())?;
    let strategy = arg.strategy.strategy(population.len())?;

    let seed = run_arg.seed.unwrap_or_else(|| rand::rng().random());
    let mut result = run_sampling_strategy(&strategy, &population, &mut seed.rng())
        .with_context(|| format!("Invalid {} parameters", strategy.name()))?;
    if !run_arg.all_columns {
        result.rows = result.canonical_rows();
    }

    let report = SampleReport {
        generated_at: Utc::now(),
        source,
        seed: strategy.uses_randomness().then_some(seed),
        strategy,
        result,
    };
    Output::save_json(&report, run_arg.output.clone())?;

    eprintln!();
    eprintln!("Sample generated successfully");
    if let Some(path) = &run_arg.output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Strategy: {}", report.strategy.name());
    eprintln!(
        "  Selected: {} of {} rows",
        report.result.len(),
        report.source.population_size
    );
    eprintln!("  Ranges: {}", report.result.ranges.len());
    if let Some(seed) = &report.seed {
        eprintln!("  Seed: {seed}");
    }
    if let Some(shortfall) = &report.result.shortfall {
        eprintln!(
            "  Shortfall: {} ({} of {} requested)",
            shortfall.reason, shortfall.produced, shortfall.requested
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;
    use crate::command::{CommandArgs, Mode};

    fn parse(args: &[&str]) -> StrategyCommand {
        let args = CommandArgs::try_parse_from(
            ["auditkit", "sample"]
                .iter()
                .chain(args)
                .chain(&["--input", "ledger.json"])
                .copied(),
        )
        .unwrap();
        match args.mode {
            Mode::Sample(arg) => arg.strategy,
            mode => panic!("unexpected mode: {mode:?}"),
        }
    }

    #[test]
    fn test_block_defaults_follow_population_size() {
        let command = parse(&["block"]);
        let SamplingStrategy::Block(params) = command.strategy(500).unwrap() else {
            panic!("expected block strategy");
        };
        assert_eq!((params.block_size, params.num_blocks), (3, 6));
        assert_eq!(params.regime, BlockRegime::Auto);
    }

    #[test]
    fn test_block_sample_size_adjusts_block_count() {
        let command = parse(&["block", "--sample-size", "21", "--regime", "non_overlapping"]);
        let SamplingStrategy::Block(params) = command.strategy(500).unwrap() else {
            panic!("expected block strategy");
        };
        assert_eq!((params.block_size, params.num_blocks), (3, 7));
        assert_eq!(params.regime, BlockRegime::NonOverlapping);
    }

    #[test]
    fn test_haphazard_rows_are_one_based() {
        let command = parse(&["haphazard", "--rows", "3,7,3,1"]);
        assert_eq!(command.required_column(), None);
        assert_eq!(
            command.strategy(10).unwrap(),
            SamplingStrategy::Haphazard(HaphazardParams {
                clicks: vec![2, 6, 2, 0]
            })
        );
        assert!(parse(&["haphazard", "--rows", "0"]).strategy(10).is_err());
    }

    #[test]
    fn test_step_defaults_to_first_row() {
        let command = parse(&["fixed-step", "--sample-size", "4"]);
        assert_eq!(command.required_column(), Some(columns::AMOUNT));
        assert_eq!(
            command.strategy(10).unwrap(),
            SamplingStrategy::FixedStep(StepParams {
                sample_size: 4,
                starting_row: 1,
            })
        );
    }
}
