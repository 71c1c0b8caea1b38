use bigdecimal::{BigDecimal, Zero};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::decimal::{hundred, widen, FINANCIAL};
use crate::error::CalcError;
use crate::time_value::{cagr, total_return_percent};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::CalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YieldOnCostInput {
    pub shares: Decimal,
    pub purchase_price: Decimal,
    /// Annual dividend per share when the position was bought.
    pub initial_dividend: Decimal,
    pub current_price: Decimal,
    /// Annual dividend per share today.
    pub current_dividend: Decimal,
    pub years_held: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YieldOnCostOutput {
    pub initial_investment: Money,
    pub current_value: Money,
    pub annual_income: Money,
    pub yield_on_cost: Percent,
    pub current_yield: Percent,
    pub initial_yield: Percent,
    /// Implied compound growth of the dividend per share.
    pub dividend_growth_rate: Percent,
    pub capital_gain: Money,
    pub total_return_percent: Percent,
    /// Dividends collected over the holding period, assuming the dividend
    /// grew at `dividend_growth_rate` every year.
    pub total_income_received: Money,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

pub fn calculate_yield_on_cost(
    input: &YieldOnCostInput,
) -> CalcResult<ComputationOutput<YieldOnCostOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let ctx = FINANCIAL;

    validate_input(input)?;

    let shares = widen(input.shares);
    let purchase_price = widen(input.purchase_price);
    let current_price = widen(input.current_price);
    let initial_dividend = widen(input.initial_dividend);
    let current_dividend = widen(input.current_dividend);

    let initial_investment = ctx.mul(&shares, &purchase_price);
    let current_value = ctx.mul(&shares, &current_price);
    let annual_income = ctx.mul(&shares, &current_dividend);

    let yield_on_cost = as_percent(&current_dividend, &purchase_price)?;
    let current_yield = as_percent(&current_dividend, &current_price)?;
    let initial_yield = as_percent(&initial_dividend, &purchase_price)?;

    let dividend_growth_rate = cagr(&ctx, &initial_dividend, &current_dividend, input.years_held)?;

    // One payment per year held, starting from the initial dividend
    let growth_factor = ctx.growth_factor(&dividend_growth_rate)?;
    let mut dividend = initial_dividend;
    let mut total_income_received = BigDecimal::zero();
    for _ in 0..input.years_held {
        total_income_received = ctx.add(&total_income_received, &ctx.mul(&dividend, &shares));
        dividend = ctx.round(&ctx.mul(&dividend, &growth_factor));
    }

    if input.current_dividend < input.initial_dividend {
        warnings.push("Dividend per share has been cut since purchase".into());
    }

    let output = YieldOnCostOutput {
        initial_investment: initial_investment.clone(),
        current_value: current_value.clone(),
        annual_income,
        yield_on_cost,
        current_yield,
        initial_yield,
        dividend_growth_rate,
        capital_gain: ctx.sub(&current_value, &initial_investment),
        total_return_percent: total_return_percent(&ctx, &initial_investment, &current_value)?,
        total_income_received,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Yield on cost (current dividend over original purchase price)",
        &serde_json::json!({
            "shares": input.shares.to_string(),
            "purchase_price": input.purchase_price.to_string(),
            "years_held": input.years_held,
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn as_percent(part: &BigDecimal, whole: &BigDecimal) -> CalcResult<Percent> {
    let ratio = FINANCIAL.div(part, whole)?;
    Ok(FINANCIAL.round(&FINANCIAL.mul(&ratio, &hundred())))
}

fn validate_input(input: &YieldOnCostInput) -> CalcResult<()> {
    let positive = [
        ("shares", input.shares),
        ("purchase_price", input.purchase_price),
        ("current_price", input.current_price),
        ("initial_dividend", input.initial_dividend),
    ];
    for (field, value) in positive {
        if value <= Decimal::ZERO {
            return Err(CalcError::InvalidInput {
                field: field.into(),
                reason: format!("{} must be greater than 0", field.replace('_', " ")),
            });
        }
    }
    if input.current_dividend < Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "current_dividend".into(),
            reason: "current dividend cannot be negative".into(),
        });
    }
    if input.years_held == 0 {
        return Err(CalcError::InvalidInput {
            field: "years_held".into(),
            reason: "years held must be at least 1".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
