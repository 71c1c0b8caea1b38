use bigdecimal::{BigDecimal, Zero};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::decimal::{hundred, widen, FINANCIAL};
use crate::error::CalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::CalcResult;

pub const MAX_YEARS: u32 = 50;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DividendGrowthInput {
    pub shares: Decimal,
    /// Annual dividend per share today.
    pub current_dividend: Decimal,
    /// Yearly dividend growth in percent.
    pub growth_rate: Decimal,
    pub years: u32,
    /// Calendar year of row 0. Rows are numbered from 0 when absent.
    #[serde(default)]
    pub start_year: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DividendGrowthOutput {
    pub final_dividend: Money,
    pub final_income: Money,
    /// Income summed over every row, today's included.
    pub total_received: Money,
    pub percent_increase: Percent,
    pub yearly: Vec<DividendGrowthYear>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendGrowthYear {
    pub year: u32,
    pub dividend_per_share: Money,
    pub annual_income: Money,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Project the dividend per share and the position's income from today
/// (row 0) through `years` years of compound growth.
pub fn calculate_dividend_growth(
    input: &DividendGrowthInput,
) -> CalcResult<ComputationOutput<DividendGrowthOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let ctx = FINANCIAL;

    validate_input(input)?;

    let shares = widen(input.shares);
    let initial_dividend = widen(input.current_dividend);
    let growth = ctx.growth_factor(&widen(input.growth_rate))?;
    let first_row = input.start_year.unwrap_or(0);

    // Exact d × (1 + g)^n; rows are rounded for presentation only
    let mut dividend = initial_dividend.clone();
    let mut total_received = BigDecimal::zero();
    let mut yearly = Vec::with_capacity(input.years as usize + 1);

    for offset in 0..=input.years {
        if offset > 0 {
            dividend = ctx.mul(&dividend, &growth);
        }
        let income = ctx.mul(&dividend, &shares);
        total_received = ctx.add(&total_received, &income);
        yearly.push(DividendGrowthYear {
            year: first_row + offset,
            dividend_per_share: ctx.round(&dividend),
            annual_income: ctx.round(&income),
        });
    }

    let increase = ctx.sub(&dividend, &initial_dividend);
    let percent_increase = ctx.round(&ctx.mul(&ctx.div(&increase, &initial_dividend)?, &hundred()));

    if input.growth_rate < Decimal::ZERO {
        warnings.push("Negative growth rate: the dividend shrinks every year".into());
    }

    let output = DividendGrowthOutput {
        final_dividend: ctx.round(&dividend),
        final_income: ctx.round(&ctx.mul(&dividend, &shares)),
        total_received: ctx.round(&total_received),
        percent_increase,
        yearly,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Dividend growth (dividend per share compounded yearly, income = dividend x shares)",
        &serde_json::json!({
            "shares": input.shares.to_string(),
            "current_dividend": input.current_dividend.to_string(),
            "growth_rate_pct": input.growth_rate.to_string(),
            "years": input.years,
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn validate_input(input: &DividendGrowthInput) -> CalcResult<()> {
    if input.shares <= Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "shares".into(),
            reason: "shares must be greater than 0".into(),
        });
    }
    if input.current_dividend <= Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "current_dividend".into(),
            reason: "current dividend must be greater than 0".into(),
        });
    }
    if input.growth_rate <= dec!(-100) {
        return Err(CalcError::InvalidInput {
            field: "growth_rate".into(),
            reason: "growth rate must be greater than -100%".into(),
        });
    }
    if input.years == 0 || input.years > MAX_YEARS {
        return Err(CalcError::InvalidInput {
            field: "years".into(),
            reason: format!("years must be between 1 and {MAX_YEARS}"),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
