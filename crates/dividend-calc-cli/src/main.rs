mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use dividend_calc_core::CalcError;

use commands::drip::DripArgs;
use commands::planning::{
    CagrArgs, CompoundInterestArgs, DividendGrowthArgs, InvestmentReturnArgs, SavingsGoalArgs,
    YieldOnCostArgs,
};
use commands::presets::PresetsArgs;

/// Dividend reinvestment projections with decimal precision
#[derive(Parser)]
#[command(
    name = "divcalc",
    version,
    about = "Dividend reinvestment projections with decimal precision",
    long_about = "A CLI for projecting dividend reinvestment plans (DRIP) year by year \
                  in exact decimal arithmetic, plus compound interest, dividend growth, \
                  savings goal, investment return and yield-on-cost calculators."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log calculation steps to stderr (same as RUST_LOG=debug)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Project a dividend reinvestment plan year by year
    Drip(DripArgs),
    /// Check DRIP inputs and list every invalid field
    Validate(DripArgs),
    /// Compound annual growth rate between two values
    Cagr(CagrArgs),
    /// Grow a principal with monthly contributions and periodic compounding
    CompoundInterest(CompoundInterestArgs),
    /// Project a dividend per share and its income under steady growth
    DividendGrowth(DividendGrowthArgs),
    /// Months needed to reach a savings goal
    SavingsGoal(SavingsGoalArgs),
    /// Total and annualized return of an investment
    InvestmentReturn(InvestmentReturnArgs),
    /// Yield on cost of an existing dividend position
    YieldOnCost(YieldOnCostArgs),
    /// List the built-in DRIP scenarios
    Presets(PresetsArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
    /// Markdown report (DRIP projections only)
    Report,
    /// CSV report (DRIP projections only)
    ReportCsv,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Drip(args) => commands::drip::run_drip(args, &cli.output),
        Commands::Validate(args) => commands::drip::run_validate(args),
        Commands::Cagr(args) => commands::planning::run_cagr(args),
        Commands::CompoundInterest(args) => commands::planning::run_compound_interest(args),
        Commands::DividendGrowth(args) => commands::planning::run_dividend_growth(args),
        Commands::SavingsGoal(args) => commands::planning::run_savings_goal(args),
        Commands::InvestmentReturn(args) => commands::planning::run_investment_return(args),
        Commands::YieldOnCost(args) => commands::planning::run_yield_on_cost(args),
        Commands::Presets(args) => commands::presets::run_presets(args),
        Commands::Version => {
            println!("divcalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            match e.downcast_ref::<CalcError>() {
                Some(CalcError::Validation(errors)) => {
                    for fe in errors {
                        eprintln!("{}: {}: {}", "error".red().bold(), fe.field, fe.message);
                    }
                }
                _ => eprintln!("{}: {}", "error".red().bold(), e),
            }
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dividend_calc_core::planning::compound_interest::CompoundingFrequency;

    #[test]
    fn test_cagr_accepts_negative_values() {
        let cli = Cli::try_parse_from([
            "divcalc", "cagr", "--initial", "10000", "--final", "-5000", "--years", "2",
        ])
        .unwrap();
        match cli.command {
            Commands::Cagr(args) => {
                assert_eq!(args.final_value.to_string(), "-5000");
                assert!(commands::planning::run_cagr(args).is_err());
            }
            _ => panic!("expected the cagr command"),
        }
    }

    #[test]
    fn test_report_csv_output_flag() {
        use dividend_calc_core::drip::presets;
        use dividend_calc_core::drip::validation::DripInput;

        let cli = Cli::try_parse_from([
            "divcalc", "drip", "--preset", "conservative", "--output", "report-csv",
        ])
        .unwrap();
        assert_eq!(cli.output, OutputFormat::ReportCsv);

        let preset = presets::preset("conservative").unwrap();
        let input = DripInput::try_from(&preset.inputs).unwrap();
        let value = commands::drip::render_drip(&input, &cli.output).unwrap();
        let csv = value.as_str().unwrap();
        assert!(csv.starts_with("Dividend Investment Analysis"));
        assert!(csv.contains("YEARLY BREAKDOWN"));

        let json = commands::drip::render_drip(&input, &OutputFormat::Json).unwrap();
        assert!(json["result"]["results"].is_array());
    }

    #[test]
    fn test_new_calculator_subcommands_parse() {
        let cli = Cli::try_parse_from([
            "divcalc",
            "compound-interest",
            "--principal",
            "1000",
            "--annual-rate",
            "12",
            "--years",
            "1",
            "--compounding",
            "quarterly",
        ])
        .unwrap();
        let Commands::CompoundInterest(args) = cli.command else {
            panic!("expected the compound-interest command");
        };
        assert_eq!(args.compounding, CompoundingFrequency::Quarterly);
        assert_eq!(args.years, Some(1));

        let cli = Cli::try_parse_from([
            "divcalc",
            "dividend-growth",
            "--shares",
            "1000",
            "--dividend",
            "2.5",
            "--growth-rate",
            "-10",
            "--years",
            "2",
        ])
        .unwrap();
        let Commands::DividendGrowth(args) = cli.command else {
            panic!("expected the dividend-growth command");
        };
        assert_eq!(args.growth_rate.to_string(), "-10");
        assert_eq!(args.start_year, None);
    }
}
