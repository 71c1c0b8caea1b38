use bigdecimal::{BigDecimal, Zero};
use log::{debug, info};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::decimal::{hundred, widen, DecimalContext, FINANCIAL};
use crate::drip::validation::{DripFormInput, DripInput};
use crate::error::CalcError;
use crate::time_value::cagr;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Shares};
use crate::CalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Snapshot of the position at the end of one simulated year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyResult {
    pub year: u32,
    pub shares: Shares,
    pub share_price: Money,
    pub dividend_per_share: Money,
    pub gross_annual_dividend: Money,
    pub tax_on_dividends: Money,
    pub net_annual_dividend: Money,
    pub total_dividends_earned: Money,
    pub total_contributions: Money,
    pub portfolio_value: Money,
    pub total_return: Money,
    pub total_return_percent: Percent,
    /// Dividend per share over the current share price.
    pub dividend_yield: Percent,
    /// Dividend per share over the original purchase price.
    pub yield_on_cost: Percent,
}

/// Headline figures for the whole projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DripSummary {
    pub initial_investment: Money,
    pub final_portfolio_value: Money,
    pub total_contributions: Money,
    pub total_dividends_earned: Money,
    pub total_return: Money,
    pub total_return_percent: Percent,
    pub annualized_return: Percent,
    pub final_shares: Shares,
    pub final_dividend_income: Money,
    pub final_yield_on_cost: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DripProjection {
    pub results: Vec<YearlyResult>,
    pub summary: DripSummary,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Project a dividend reinvestment plan year by year at financial precision.
pub fn project(input: &DripInput) -> CalcResult<DripProjection> {
    project_with_context(&FINANCIAL, input)
}

/// Project with an explicit decimal context.
///
/// Order of operations within a year: advance price and dividend per share
/// (from year 2), earn dividends on the opening share balance, then buy
/// shares with the year's contributions and, if enabled, the after-tax
/// dividends.
///
/// Sums and products are exact; only quotients (share purchases and the
/// percentage fields) are rounded to the context's scale.
pub fn project_with_context(
    ctx: &DecimalContext,
    input: &DripInput,
) -> CalcResult<DripProjection> {
    check_preconditions(input)?;

    info!(
        "Starting DRIP projection: ticker={:?} years={} reinvest={}",
        input.ticker, input.years_to_calculate, input.reinvest_dividends
    );

    let original_price = widen(input.share_price);
    let initial_investment = widen(input.initial_investment);
    let tax_rate = widen(input.tax_rate);
    let price_growth = ctx.growth_factor(&widen(input.share_appreciation_rate))?;
    let dividend_growth = ctx.growth_factor(&widen(input.dividend_growth_rate))?;
    let annual_contributions =
        ctx.mul(&widen(input.monthly_contribution), &BigDecimal::from(12));

    let mut shares = ctx.div(&initial_investment, &original_price)?;
    let mut share_price = original_price.clone();
    let mut dividend_per_share = widen(input.annual_dividend);
    let mut total_dividends_earned = BigDecimal::zero();
    let mut total_contributions = initial_investment;

    let mut results: Vec<YearlyResult> = Vec::with_capacity(input.years_to_calculate as usize);

    for year in 1..=input.years_to_calculate {
        if year > 1 {
            share_price = ctx.mul(&share_price, &price_growth);
            dividend_per_share = ctx.mul(&dividend_per_share, &dividend_growth);
        }

        // Dividends accrue on the shares held coming into the year
        let gross_annual_dividend = ctx.mul(&shares, &dividend_per_share);
        let tax_on_dividends = ctx.percent_of(&gross_annual_dividend, &tax_rate)?;
        let net_annual_dividend = ctx.sub(&gross_annual_dividend, &tax_on_dividends);

        total_contributions = ctx.add(&total_contributions, &annual_contributions);
        let shares_from_contributions = ctx.div(&annual_contributions, &share_price)?;
        shares = ctx.add(&shares, &shares_from_contributions);

        if input.reinvest_dividends {
            let shares_from_dividends = ctx.div(&net_annual_dividend, &share_price)?;
            shares = ctx.add(&shares, &shares_from_dividends);
        }

        total_dividends_earned = ctx.add(&total_dividends_earned, &gross_annual_dividend);

        let portfolio_value = ctx.mul(&shares, &share_price);
        let total_return = ctx.sub(
            &ctx.add(&portfolio_value, &total_dividends_earned),
            &total_contributions,
        );
        let total_return_percent = percent_ratio(ctx, &total_return, &total_contributions)?;
        let dividend_yield = percent_ratio(ctx, &dividend_per_share, &share_price)?;
        let yield_on_cost = percent_ratio(ctx, &dividend_per_share, &original_price)?;

        debug!(
            "year {}: shares={} price={} gross_dividend={} portfolio={}",
            year,
            shares,
            ctx.round(&share_price),
            ctx.round(&gross_annual_dividend),
            ctx.round(&portfolio_value)
        );

        results.push(YearlyResult {
            year,
            shares: shares.clone(),
            share_price: share_price.clone(),
            dividend_per_share: dividend_per_share.clone(),
            gross_annual_dividend,
            tax_on_dividends,
            net_annual_dividend,
            total_dividends_earned: total_dividends_earned.clone(),
            total_contributions: total_contributions.clone(),
            portfolio_value,
            total_return,
            total_return_percent,
            dividend_yield,
            yield_on_cost,
        });
    }

    let summary = summarize(ctx, input, &results)?;
    info!(
        "DRIP projection completed: final_value={} annualized_return={}%",
        summary.final_portfolio_value, summary.annualized_return
    );

    Ok(DripProjection { results, summary })
}

/// Engine preconditions. Ranges are the validator's job; these are the
/// inputs that would otherwise divide by zero or produce an empty series.
fn check_preconditions(input: &DripInput) -> CalcResult<()> {
    if input.years_to_calculate == 0 {
        return Err(CalcError::InvalidInput {
            field: "years_to_calculate".into(),
            reason: "at least one year must be projected".into(),
        });
    }
    if input.share_price.is_zero() {
        return Err(CalcError::DivisionByZero {
            context: "share_price is zero".into(),
        });
    }
    if input.share_price < Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "share_price".into(),
            reason: "share price must be greater than 0".into(),
        });
    }
    // A -100% appreciation rate zeroes the price from year 2 onwards and
    // every later share purchase would divide by zero. Any rate above -100%
    // keeps the exact price positive.
    if input.years_to_calculate > 1 && input.share_appreciation_rate <= -Decimal::ONE_HUNDRED {
        return Err(CalcError::DivisionByZero {
            context: format!(
                "share price reaches zero in year 2 at a {}% appreciation rate",
                input.share_appreciation_rate
            ),
        });
    }
    Ok(())
}

/// `numerator / denominator × 100`, or zero for a zero denominator.
fn percent_ratio(
    ctx: &DecimalContext,
    numerator: &BigDecimal,
    denominator: &BigDecimal,
) -> CalcResult<Percent> {
    if denominator.is_zero() {
        return Ok(BigDecimal::zero());
    }
    let ratio = ctx.div(numerator, denominator)?;
    Ok(ctx.round(&ctx.mul(&ratio, &hundred())))
}

fn summarize(
    ctx: &DecimalContext,
    input: &DripInput,
    results: &[YearlyResult],
) -> CalcResult<DripSummary> {
    let last = results
        .last()
        .ok_or_else(|| CalcError::InvalidInput {
            field: "years_to_calculate".into(),
            reason: "projection produced no years".into(),
        })?;

    let annualized_return = cagr(
        ctx,
        &last.total_contributions,
        &last.portfolio_value,
        input.years_to_calculate,
    )?;

    Ok(DripSummary {
        initial_investment: widen(input.initial_investment),
        final_portfolio_value: last.portfolio_value.clone(),
        total_contributions: last.total_contributions.clone(),
        total_dividends_earned: last.total_dividends_earned.clone(),
        total_return: last.total_return.clone(),
        total_return_percent: last.total_return_percent.clone(),
        annualized_return,
        final_shares: last.shares.clone(),
        final_dividend_income: last.gross_annual_dividend.clone(),
        final_yield_on_cost: last.yield_on_cost.clone(),
    })
}

// ---------------------------------------------------------------------------
// Envelope entry points
// ---------------------------------------------------------------------------

/// Run a projection and wrap it in the standard output envelope with
/// methodology, assumptions and warnings.
pub fn calculate_drip(input: &DripInput) -> CalcResult<ComputationOutput<DripProjection>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if !input.reinvest_dividends {
        warnings.push(
            "Dividend reinvestment disabled: dividends are paid out as cash and buy no shares"
                .into(),
        );
    }
    if input.dividend_growth_rate <= -Decimal::ONE_HUNDRED && input.years_to_calculate > 1 {
        warnings.push("A -100% dividend growth rate eliminates dividends after year 1".into());
    }
    if input.tax_rate >= Decimal::ONE_HUNDRED && input.reinvest_dividends {
        warnings.push("Tax rate of 100% leaves no dividends to reinvest".into());
    }
    if input.annual_dividend.is_zero() {
        warnings.push("Annual dividend is zero: growth comes from contributions and price only".into());
    }

    let projection = project(input)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "DRIP projection (annual periods, dividends on opening shares, decimal 10dp half-up)",
        &serde_json::json!({
            "ticker": input.ticker,
            "initial_investment": input.initial_investment.to_string(),
            "share_price": input.share_price.to_string(),
            "annual_dividend": input.annual_dividend.to_string(),
            "monthly_contribution": input.monthly_contribution.to_string(),
            "dividend_growth_rate_pct": input.dividend_growth_rate.to_string(),
            "share_appreciation_rate_pct": input.share_appreciation_rate.to_string(),
            "tax_rate_pct": input.tax_rate.to_string(),
            "years_to_calculate": input.years_to_calculate,
            "reinvest_dividends": input.reinvest_dividends,
        }),
        warnings,
        elapsed,
        projection,
    ))
}

/// Validate a raw form and project it. Validation failures are returned as
/// `CalcError::Validation` with every field problem; no projection is run.
pub fn calculate_drip_from_form(
    form: &DripFormInput,
) -> CalcResult<ComputationOutput<DripProjection>> {
    let input = DripInput::try_from(form).map_err(CalcError::Validation)?;
    calculate_drip(&input)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
