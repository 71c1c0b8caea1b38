use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::decimal::{widen, FINANCIAL};
use crate::error::CalcError;
use crate::time_value::{cagr, total_return_percent};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::CalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentReturnInput {
    pub initial_investment: Decimal,
    pub final_value: Decimal,
    /// Holding period in whole years.
    pub years: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentReturnOutput {
    pub final_value: Money,
    pub profit_loss: Money,
    pub total_return_percent: Percent,
    pub annualized_return: Percent,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

pub fn calculate_investment_return(
    input: &InvestmentReturnInput,
) -> CalcResult<ComputationOutput<InvestmentReturnOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let ctx = FINANCIAL;

    if input.initial_investment <= Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "initial_investment".into(),
            reason: "initial investment must be greater than 0".into(),
        });
    }
    if input.final_value < Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "final_value".into(),
            reason: "final value cannot be negative".into(),
        });
    }
    if input.years == 0 {
        return Err(CalcError::InvalidInput {
            field: "years".into(),
            reason: "years must be at least 1".into(),
        });
    }

    let initial = widen(input.initial_investment);
    let final_value = widen(input.final_value);
    let profit_loss = ctx.sub(&final_value, &initial);
    let total_return = total_return_percent(&ctx, &initial, &final_value)?;
    let annualized_return = cagr(&ctx, &initial, &final_value, input.years)?;

    if input.final_value.is_zero() {
        warnings.push("Final value of zero means a total loss".into());
    }

    let output = InvestmentReturnOutput {
        final_value,
        profit_loss,
        total_return_percent: total_return,
        annualized_return,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Investment return (total and compound annual growth rate)",
        &serde_json::json!({
            "initial_investment": input.initial_investment.to_string(),
            "years": input.years,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::to_number;
    use bigdecimal::{BigDecimal, Zero};
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn big(raw: &str) -> BigDecimal {
        BigDecimal::from_str(raw).unwrap()
    }

    #[test]
    fn test_doubling_over_ten_years() {
        let out = calculate_investment_return(&InvestmentReturnInput {
            initial_investment: dec!(10_000),
            final_value: dec!(20_000),
            years: 10,
        })
        .unwrap()
        .result;
        assert_eq!(out.profit_loss, big("10000"));
        assert_eq!(out.total_return_percent, big("100"));
        assert!((to_number(&out.annualized_return) - 7.177).abs() < 0.01);
    }

    #[test]
    fn test_loss_is_negative() {
        let out = calculate_investment_return(&InvestmentReturnInput {
            initial_investment: dec!(10_000),
            final_value: dec!(7_500),
            years: 3,
        })
        .unwrap()
        .result;
        assert_eq!(out.profit_loss, big("-2500"));
        assert_eq!(out.total_return_percent, big("-25"));
        assert!(out.annualized_return < BigDecimal::zero());
    }

    #[test]
    fn test_total_loss_warns() {
        let out = calculate_investment_return(&InvestmentReturnInput {
            initial_investment: dec!(1_000),
            final_value: Decimal::ZERO,
            years: 2,
        })
        .unwrap();
        assert_eq!(out.result.annualized_return, big("-100"));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_rejects_zero_initial_and_zero_years() {
        let zero_initial = InvestmentReturnInput {
            initial_investment: Decimal::ZERO,
            final_value: dec!(100),
            years: 1,
        };
        assert!(matches!(
            calculate_investment_return(&zero_initial),
            Err(CalcError::InvalidInput { .. })
        ));
        let zero_years = InvestmentReturnInput {
            initial_investment: dec!(100),
            final_value: dec!(100),
            years: 0,
        };
        assert!(calculate_investment_return(&zero_years).is_err());
    }
}
