use bigdecimal::{BigDecimal, One, Zero};
use log::warn;

use crate::decimal::{hundred, log10, DecimalContext};
use crate::error::CalcError;
use crate::types::{Money, Percent};
use crate::CalcResult;

/// Compound annual growth rate between two values, as a percentage.
///
/// Returns zero when `initial` is zero or `years` is zero; those are
/// undefined growth rates, reported as "no growth" rather than an error.
///
/// The n-th root has no exact decimal algorithm, so it runs in `f64` on the
/// ratio's base-10 logarithm and the result is converted back to the
/// context's precision. The result is therefore accurate to roughly 15
/// significant digits, which is far below what a displayed percentage needs.
/// Working on the logarithm keeps ratios past the `f64` range finite.
pub fn cagr(
    ctx: &DecimalContext,
    initial: &Money,
    final_value: &Money,
    years: u32,
) -> CalcResult<Percent> {
    if initial.is_zero() || years == 0 {
        return Ok(BigDecimal::zero());
    }

    let ratio = ctx.div(final_value, initial)?;
    if ratio.is_zero() {
        return Ok(-hundred());
    }
    let growth = match log10(&ratio) {
        Some(exponent) => 10f64.powf(exponent / f64::from(years)) - 1.0,
        None => f64::NAN,
    };

    if !growth.is_finite() {
        warn!(
            "CAGR undefined for initial={} final={} years={}",
            initial, final_value, years
        );
        return Err(CalcError::FinancialImpossibility(format!(
            "annualized return undefined for a value ratio of {ratio} over {years} years"
        )));
    }

    ctx.from_f64(growth * 100.0)
}

/// Simple (non-annualized) return as a percentage of the starting value.
pub fn total_return_percent(
    ctx: &DecimalContext,
    initial: &Money,
    final_value: &Money,
) -> CalcResult<Percent> {
    if initial.is_zero() {
        return Ok(BigDecimal::zero());
    }
    let gain = ctx.sub(final_value, initial);
    let ratio = ctx.div(&gain, initial)?;
    Ok(ctx.round(&ctx.mul(&ratio, &hundred())))
}

/// Compute `factor^n` via iterative multiplication, rounding each step to
/// the context's scale so the digit count stays flat over long horizons.
pub fn compound(ctx: &DecimalContext, factor: &BigDecimal, n: u32) -> BigDecimal {
    let mut result = BigDecimal::one();
    for _ in 0..n {
        result = ctx.round(&ctx.mul(&result, factor));
    }
    result
}

/// Level payment that grows `present_value` to `goal` over `periods`:
/// PMT = [FV − PV(1+r)^n] · r / [(1+r)^n − 1]
///
/// With a zero rate the goal gap is split evenly across the periods. The
/// result is negative when the current balance alone outgrows the goal.
pub fn annuity_payment_for_goal(
    ctx: &DecimalContext,
    goal: &Money,
    present_value: &Money,
    periodic_rate: &BigDecimal,
    periods: u32,
) -> CalcResult<Money> {
    if periods == 0 {
        return Ok(BigDecimal::zero());
    }
    if periodic_rate.is_zero() {
        let gap = ctx.sub(goal, present_value);
        return ctx.div(&gap, &BigDecimal::from(periods));
    }

    let one = BigDecimal::one();
    let growth = compound(ctx, &ctx.add(&one, periodic_rate), periods);
    let denominator = ctx.sub(&growth, &one);
    if denominator <= BigDecimal::zero() {
        return Ok(BigDecimal::zero());
    }
    let fv_current = ctx.mul(present_value, &growth);
    let numerator = ctx.mul(&ctx.sub(goal, &fv_current), periodic_rate);
    ctx.div(&numerator, &denominator)
}
