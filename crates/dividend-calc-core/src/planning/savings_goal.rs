use bigdecimal::{BigDecimal, Zero};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::decimal::{hundred, widen, FINANCIAL};
use crate::error::CalcError;
use crate::time_value::annuity_payment_for_goal;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::CalcResult;

/// Longest savings horizon accepted (50 years).
pub const MAX_MONTHS: u32 = 600;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsGoalInput {
    pub savings_goal: Decimal,
    pub current_savings: Decimal,
    pub monthly_contribution: Decimal,
    /// Expected annual return in percent, compounded monthly.
    pub annual_return: Decimal,
    pub months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsGoalOutput {
    pub goal_met: bool,
    /// First month the balance reached the goal, or the full horizon if it
    /// never did.
    pub months_to_goal: u32,
    pub years_to_goal: BigDecimal,
    /// Monthly contribution needed to hit the goal by the end of the horizon.
    /// Equals the planned contribution when the goal is already met.
    pub required_monthly: Money,
    pub total_saved: Money,
    pub total_contributions: Money,
    pub interest_earned: Money,
    pub progress_percent: Percent,
    pub monthly_breakdown: Vec<SavingsMonth>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsMonth {
    pub month: u32,
    pub contribution: Money,
    pub interest: Money,
    pub balance: Money,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Simulate saving towards a goal month by month: the contribution lands
/// first, then the month's interest is earned on the new balance.
pub fn calculate_savings_goal(
    input: &SavingsGoalInput,
) -> CalcResult<ComputationOutput<SavingsGoalOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let ctx = FINANCIAL;

    validate_input(input)?;

    let goal = widen(input.savings_goal);
    let contribution = widen(input.monthly_contribution);
    let annual_return = widen(input.annual_return);
    let twelve_hundred = BigDecimal::from(1200);

    let mut balance = widen(input.current_savings);
    let mut total_contributions = balance.clone();
    let mut interest_earned = BigDecimal::zero();
    let mut goal_month: Option<u32> = None;
    let mut monthly_breakdown = Vec::with_capacity(input.months as usize);

    for month in 1..=input.months {
        balance = ctx.add(&balance, &contribution);
        total_contributions = ctx.add(&total_contributions, &contribution);

        // balance × annual% / 1200, one division so the month's interest
        // is rounded once
        let interest = ctx.div(&ctx.mul(&balance, &annual_return), &twelve_hundred)?;
        balance = ctx.add(&balance, &interest);
        interest_earned = ctx.add(&interest_earned, &interest);

        monthly_breakdown.push(SavingsMonth {
            month,
            contribution: contribution.clone(),
            interest,
            balance: balance.clone(),
        });

        if goal_month.is_none() && balance >= goal {
            goal_month = Some(month);
        }
    }

    let goal_met = goal_month.is_some();
    let months_to_goal = goal_month.unwrap_or(input.months);

    let required_monthly = if goal_met {
        contribution.clone()
    } else {
        let monthly_rate = ctx.div(&annual_return, &twelve_hundred)?;
        let pmt = annuity_payment_for_goal(
            &ctx,
            &goal,
            &widen(input.current_savings),
            &monthly_rate,
            input.months,
        )?;
        warnings.push(format!(
            "Goal not reached within {} months at the planned contribution",
            input.months
        ));
        pmt.max(BigDecimal::zero())
    };

    let progress_ratio = ctx.div(&balance, &goal)?;
    let progress_percent = ctx.round(&ctx.mul(&progress_ratio, &hundred())).min(hundred());

    let output = SavingsGoalOutput {
        goal_met,
        months_to_goal,
        years_to_goal: ctx.div(&BigDecimal::from(months_to_goal), &BigDecimal::from(12))?,
        required_monthly,
        total_saved: balance,
        total_contributions,
        interest_earned,
        progress_percent,
        monthly_breakdown,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Savings goal (monthly contributions, monthly compounding)",
        &serde_json::json!({
            "savings_goal": input.savings_goal.to_string(),
            "annual_return_pct": input.annual_return.to_string(),
            "months": input.months,
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn validate_input(input: &SavingsGoalInput) -> CalcResult<()> {
    if input.savings_goal <= Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "savings_goal".into(),
            reason: "savings goal must be greater than 0".into(),
        });
    }
    if input.current_savings < Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "current_savings".into(),
            reason: "current savings cannot be negative".into(),
        });
    }
    if input.monthly_contribution < Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "monthly_contribution".into(),
            reason: "monthly contribution cannot be negative".into(),
        });
    }
    if input.annual_return <= dec!(-100) {
        return Err(CalcError::InvalidInput {
            field: "annual_return".into(),
            reason: "annual return must be greater than -100%".into(),
        });
    }
    if input.months == 0 || input.months > MAX_MONTHS {
        return Err(CalcError::InvalidInput {
            field: "months".into(),
            reason: format!("months must be between 1 and {MAX_MONTHS}"),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn big(raw: &str) -> BigDecimal {
        BigDecimal::from_str(raw).unwrap()
    }

    fn default_input() -> SavingsGoalInput {
        SavingsGoalInput {
            savings_goal: dec!(50_000),
            current_savings: dec!(5_000),
            monthly_contribution: dec!(500),
            annual_return: dec!(4),
            months: 60,
        }
    }

    #[test]
    fn test_zero_interest_reaches_goal_on_exact_month() {
        let input = SavingsGoalInput {
            savings_goal: dec!(6_000),
            current_savings: Decimal::ZERO,
            monthly_contribution: dec!(500),
            annual_return: Decimal::ZERO,
            months: 24,
        };
        let out = calculate_savings_goal(&input).unwrap().result;
        assert!(out.goal_met);
        assert_eq!(out.months_to_goal, 12);
        assert_eq!(out.years_to_goal, big("1"));
        assert_eq!(out.total_saved, big("12000"));
        assert!(out.interest_earned.is_zero());
        assert_eq!(out.progress_percent, big("100"));
        assert_eq!(out.required_monthly, big("500"));
    }

    #[test]
    fn test_first_month_interest() {
        let out = calculate_savings_goal(&default_input()).unwrap().result;
        let m1 = &out.monthly_breakdown[0];
        // (5000 + 500) * 4% / 12
        assert_eq!(m1.interest, big("18.3333333333"));
        assert_eq!(out.monthly_breakdown.len(), 60);
    }

    fn to_input(value: &BigDecimal) -> Decimal {
        Decimal::from_str(&FINANCIAL.round(value).to_string()).unwrap()
    }

    #[test]
    fn test_unmet_goal_reports_required_contribution() {
        let out = calculate_savings_goal(&default_input()).unwrap();
        assert!(!out.result.goal_met);
        assert_eq!(out.result.months_to_goal, 60);
        assert!(out.result.required_monthly > big("500"));
        assert!(out.result.progress_percent < big("100"));
        assert_eq!(out.warnings.len(), 1);

        // Saving the required amount does reach the goal
        let retry = calculate_savings_goal(&SavingsGoalInput {
            monthly_contribution: to_input(&out.result.required_monthly) + dec!(0.01),
            ..default_input()
        })
        .unwrap();
        assert!(retry.result.goal_met);
    }

    #[test]
    fn test_zero_rate_required_contribution_splits_gap() {
        let out = calculate_savings_goal(&SavingsGoalInput {
            annual_return: Decimal::ZERO,
            ..default_input()
        })
        .unwrap()
        .result;
        // (50_000 - 5_000) / 60
        assert_eq!(out.required_monthly, big("750"));
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let bad_goal = SavingsGoalInput {
            savings_goal: Decimal::ZERO,
            ..default_input()
        };
        assert!(calculate_savings_goal(&bad_goal).is_err());
        let bad_months = SavingsGoalInput {
            months: 0,
            ..default_input()
        };
        assert!(calculate_savings_goal(&bad_months).is_err());
    }
}
