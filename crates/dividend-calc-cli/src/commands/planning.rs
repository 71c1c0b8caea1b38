use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Instant;

use dividend_calc_core::decimal::{widen, FINANCIAL};
use dividend_calc_core::planning::compound_interest::{
    self, CompoundInterestInput, CompoundingFrequency,
};
use dividend_calc_core::planning::dividend_growth::{self, DividendGrowthInput};
use dividend_calc_core::planning::investment_return::{self, InvestmentReturnInput};
use dividend_calc_core::planning::savings_goal::{self, SavingsGoalInput};
use dividend_calc_core::planning::yield_on_cost::{self, YieldOnCostInput};
use dividend_calc_core::time_value;
use dividend_calc_core::types::with_metadata;

use crate::input;

/// Arguments for a compound annual growth rate
#[derive(Args)]
pub struct CagrArgs {
    /// Starting value
    #[arg(long, allow_hyphen_values = true)]
    pub initial: Decimal,

    /// Ending value
    #[arg(long = "final", allow_hyphen_values = true)]
    pub final_value: Decimal,

    /// Number of whole years between the two values
    #[arg(long)]
    pub years: u32,
}

pub fn run_cagr(args: CagrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let initial = widen(args.initial);
    let final_value = widen(args.final_value);
    let annualized = time_value::cagr(&FINANCIAL, &initial, &final_value, args.years)?;
    let total = time_value::total_return_percent(&FINANCIAL, &initial, &final_value)?;

    let result = serde_json::json!({
        "annualized_return": annualized.to_string(),
        "total_return_percent": total.to_string(),
    });
    let output = with_metadata(
        "Compound annual growth rate",
        &serde_json::json!({
            "initial": args.initial.to_string(),
            "final_value": args.final_value.to_string(),
            "years": args.years,
        }),
        Vec::new(),
        start.elapsed().as_micros() as u64,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

/// Arguments for the compound interest calculator
#[derive(Args)]
pub struct CompoundInterestArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount invested at the start
    #[arg(long, default_value = "0")]
    pub principal: Decimal,

    /// Amount added at the start of every month
    #[arg(long, default_value = "0")]
    pub monthly_contribution: Decimal,

    /// Nominal annual rate in percent
    #[arg(long, allow_hyphen_values = true)]
    pub annual_rate: Option<Decimal>,

    /// Number of years (1-50)
    #[arg(long)]
    pub years: Option<u32>,

    /// annually, semi-annually, quarterly, monthly or daily
    #[arg(long, default_value = "monthly")]
    pub compounding: CompoundingFrequency,
}

pub fn run_compound_interest(
    args: CompoundInterestArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let ci_input = match input::read_input::<CompoundInterestInput>(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => CompoundInterestInput {
            principal: args.principal,
            monthly_contribution: args.monthly_contribution,
            annual_rate: args
                .annual_rate
                .ok_or("--annual-rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
            compounding: args.compounding,
        }
    };

    let result = compound_interest::calculate_compound_interest(&ci_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the dividend growth calculator
#[derive(Args)]
pub struct DividendGrowthArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Shares held
    #[arg(long)]
    pub shares: Option<Decimal>,

    /// Annual dividend per share today
    #[arg(long)]
    pub dividend: Option<Decimal>,

    /// Yearly dividend growth in percent
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub growth_rate: Decimal,

    /// Number of years to project (1-50)
    #[arg(long)]
    pub years: Option<u32>,

    /// Label the first row with this calendar year
    #[arg(long)]
    pub start_year: Option<u32>,
}

pub fn run_dividend_growth(args: DividendGrowthArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let growth_input = match input::read_input::<DividendGrowthInput>(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => DividendGrowthInput {
            shares: args.shares.ok_or("--shares is required (or provide --input)")?,
            current_dividend: args
                .dividend
                .ok_or("--dividend is required (or provide --input)")?,
            growth_rate: args.growth_rate,
            years: args.years.ok_or("--years is required (or provide --input)")?,
            start_year: args.start_year,
        }
    };

    let result = dividend_growth::calculate_dividend_growth(&growth_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the savings goal calculator
#[derive(Args)]
pub struct SavingsGoalArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount to reach
    #[arg(long)]
    pub goal: Option<Decimal>,

    /// Amount already saved
    #[arg(long, default_value = "0")]
    pub current_savings: Decimal,

    /// Amount saved every month
    #[arg(long, default_value = "0")]
    pub monthly_contribution: Decimal,

    /// Expected annual return in percent
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub annual_return: Decimal,

    /// Savings horizon in months
    #[arg(long)]
    pub months: Option<u32>,
}

pub fn run_savings_goal(args: SavingsGoalArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let goal_input = match input::read_input::<SavingsGoalInput>(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => SavingsGoalInput {
            savings_goal: args.goal.ok_or("--goal is required (or provide --input)")?,
            current_savings: args.current_savings,
            monthly_contribution: args.monthly_contribution,
            annual_return: args.annual_return,
            months: args.months.ok_or("--months is required (or provide --input)")?,
        }
    };

    let result = savings_goal::calculate_savings_goal(&goal_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the investment return calculator
#[derive(Args)]
pub struct InvestmentReturnArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount originally invested
    #[arg(long)]
    pub initial_investment: Option<Decimal>,

    /// Value today or at exit
    #[arg(long)]
    pub final_value: Option<Decimal>,

    /// Holding period in whole years
    #[arg(long)]
    pub years: Option<u32>,
}

pub fn run_investment_return(
    args: InvestmentReturnArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let return_input = match input::read_input::<InvestmentReturnInput>(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => InvestmentReturnInput {
            initial_investment: args
                .initial_investment
                .ok_or("--initial-investment is required (or provide --input)")?,
            final_value: args
                .final_value
                .ok_or("--final-value is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
        }
    };

    let result = investment_return::calculate_investment_return(&return_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the yield on cost calculator
#[derive(Args)]
pub struct YieldOnCostArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Shares held
    #[arg(long)]
    pub shares: Option<Decimal>,

    /// Price paid per share
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Annual dividend per share at purchase
    #[arg(long)]
    pub initial_dividend: Option<Decimal>,

    /// Price per share today
    #[arg(long)]
    pub current_price: Option<Decimal>,

    /// Annual dividend per share today
    #[arg(long)]
    pub current_dividend: Option<Decimal>,

    /// Years the position has been held
    #[arg(long)]
    pub years_held: Option<u32>,
}

pub fn run_yield_on_cost(args: YieldOnCostArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let yoc_input = match input::read_input::<YieldOnCostInput>(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => YieldOnCostInput {
            shares: args.shares.ok_or("--shares is required (or provide --input)")?,
            purchase_price: args
                .purchase_price
                .ok_or("--purchase-price is required (or provide --input)")?,
            initial_dividend: args
                .initial_dividend
                .ok_or("--initial-dividend is required (or provide --input)")?,
            current_price: args
                .current_price
                .ok_or("--current-price is required (or provide --input)")?,
            current_dividend: args
                .current_dividend
                .ok_or("--current-dividend is required (or provide --input)")?,
            years_held: args
                .years_held
                .ok_or("--years-held is required (or provide --input)")?,
        }
    };

    let result = yield_on_cost::calculate_yield_on_cost(&yoc_input)?;
    Ok(serde_json::to_value(result)?)
}
