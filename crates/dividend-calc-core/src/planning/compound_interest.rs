use bigdecimal::{BigDecimal, Zero};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::decimal::{widen, FINANCIAL};
use crate::error::CalcError;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::CalcResult;

/// Longest horizon accepted, matching the DRIP projection.
pub const MAX_YEARS: u32 = 50;

const DAYS_PER_YEAR: u32 = 365;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How often earned interest is credited to the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundingFrequency {
    Annually,
    SemiAnnually,
    Quarterly,
    #[default]
    Monthly,
    Daily,
}

impl CompoundingFrequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            CompoundingFrequency::Annually => 1,
            CompoundingFrequency::SemiAnnually => 2,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::Monthly => 12,
            CompoundingFrequency::Daily => DAYS_PER_YEAR,
        }
    }

    /// Months between credits; `None` when interest is credited more often
    /// than monthly.
    fn months_per_period(&self) -> Option<u32> {
        match self {
            CompoundingFrequency::Daily => None,
            other => Some(12 / other.periods_per_year()),
        }
    }
}

impl fmt::Display for CompoundingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompoundingFrequency::Annually => "annually",
            CompoundingFrequency::SemiAnnually => "semi_annually",
            CompoundingFrequency::Quarterly => "quarterly",
            CompoundingFrequency::Monthly => "monthly",
            CompoundingFrequency::Daily => "daily",
        };
        f.write_str(name)
    }
}

/// Accepts a name (`"quarterly"`, `"semi-annually"`) or the number of
/// periods per year (`"4"`), as the calculator's frequency picker sends.
impl FromStr for CompoundingFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "annually" | "annual" | "yearly" | "1" => Ok(CompoundingFrequency::Annually),
            "semi_annually" | "semiannually" | "2" => Ok(CompoundingFrequency::SemiAnnually),
            "quarterly" | "4" => Ok(CompoundingFrequency::Quarterly),
            "monthly" | "12" => Ok(CompoundingFrequency::Monthly),
            "daily" | "365" => Ok(CompoundingFrequency::Daily),
            other => Err(format!(
                "unknown compounding frequency '{other}' \
                 (expected annually, semi-annually, quarterly, monthly or daily)"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundInterestInput {
    pub principal: Decimal,
    #[serde(default)]
    pub monthly_contribution: Decimal,
    /// Nominal annual rate in percent.
    pub annual_rate: Decimal,
    pub years: u32,
    #[serde(default)]
    pub compounding: CompoundingFrequency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundInterestOutput {
    pub final_amount: Money,
    pub total_contributions: Money,
    pub total_interest: Money,
    pub yearly_breakdown: Vec<CompoundInterestYear>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundInterestYear {
    pub year: u32,
    pub starting_balance: Money,
    pub contribution: Money,
    pub interest_earned: Money,
    pub ending_balance: Money,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Grow a principal with monthly contributions.
///
/// Contributions land at the start of each month. Interest accrues monthly
/// on the credited balance and is added to it at the end of each
/// compounding period; with daily compounding it is credited every day of
/// a 365-day year instead.
pub fn calculate_compound_interest(
    input: &CompoundInterestInput,
) -> CalcResult<ComputationOutput<CompoundInterestOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let ctx = FINANCIAL;

    validate_input(input)?;

    let contribution = widen(input.monthly_contribution);
    let rate = widen(input.annual_rate);
    let monthly_divisor = BigDecimal::from(1200);
    let daily_divisor = BigDecimal::from(DAYS_PER_YEAR * 100);

    let mut balance = widen(input.principal);
    let mut total_contributions = balance.clone();
    let mut yearly_breakdown = Vec::with_capacity(input.years as usize);

    for year in 1..=input.years {
        let starting_balance = balance.clone();
        let mut year_contributions = BigDecimal::zero();
        let mut year_interest = BigDecimal::zero();
        let mut accrued = BigDecimal::zero();

        for month in 0..12u32 {
            balance = ctx.add(&balance, &contribution);
            year_contributions = ctx.add(&year_contributions, &contribution);

            match input.compounding.months_per_period() {
                Some(months) => {
                    let interest = ctx.div(&ctx.mul(&balance, &rate), &monthly_divisor)?;
                    accrued = ctx.add(&accrued, &interest);
                    if (month + 1) % months == 0 {
                        balance = ctx.add(&balance, &accrued);
                        year_interest = ctx.add(&year_interest, &accrued);
                        accrued = BigDecimal::zero();
                    }
                }
                None => {
                    for _ in 0..days_in_month(month) {
                        let interest = ctx.div(&ctx.mul(&balance, &rate), &daily_divisor)?;
                        balance = ctx.add(&balance, &interest);
                        year_interest = ctx.add(&year_interest, &interest);
                    }
                }
            }
        }

        total_contributions = ctx.add(&total_contributions, &year_contributions);
        yearly_breakdown.push(CompoundInterestYear {
            year,
            starting_balance,
            contribution: year_contributions,
            interest_earned: year_interest,
            ending_balance: balance.clone(),
        });
    }

    if input.annual_rate.is_zero() {
        warnings.push("Annual rate is zero: the balance grows by contributions only".into());
    }

    let total_interest = ctx.sub(&balance, &total_contributions);
    let output = CompoundInterestOutput {
        final_amount: balance,
        total_contributions,
        total_interest,
        yearly_breakdown,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Compound interest (monthly contributions at period start, interest credited per compounding period)",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "monthly_contribution": input.monthly_contribution.to_string(),
            "annual_rate_pct": input.annual_rate.to_string(),
            "years": input.years,
            "compounding": input.compounding.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Days in month `month` (0-based) of a 365-day year split as evenly as
/// whole days allow.
fn days_in_month(month: u32) -> u32 {
    (month + 1) * DAYS_PER_YEAR / 12 - month * DAYS_PER_YEAR / 12
}

fn validate_input(input: &CompoundInterestInput) -> CalcResult<()> {
    if input.principal < Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "principal".into(),
            reason: "principal cannot be negative".into(),
        });
    }
    if input.monthly_contribution < Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "monthly_contribution".into(),
            reason: "monthly contribution cannot be negative".into(),
        });
    }
    if input.annual_rate < Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "annual_rate".into(),
            reason: "annual rate cannot be negative".into(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::to_number;
    use rust_decimal_macros::dec;

    fn big(raw: &str) -> BigDecimal {
        BigDecimal::from_str(raw).unwrap()
    }

    fn default_input() -> CompoundInterestInput {
        CompoundInterestInput {
            principal: dec!(10_000),
            monthly_contribution: dec!(200),
            annual_rate: dec!(7),
            years: 20,
            compounding: CompoundingFrequency::Monthly,
        }
    }

    fn lump_sum(compounding: CompoundingFrequency) -> CompoundInterestInput {
        CompoundInterestInput {
            principal: dec!(1_000),
            monthly_contribution: Decimal::ZERO,
            annual_rate: dec!(12),
            years: 1,
            compounding,
        }
    }

    #[test]
    fn test_annual_compounding_of_a_lump_sum() {
        let out = calculate_compound_interest(&lump_sum(CompoundingFrequency::Annually))
            .unwrap()
            .result;
        assert_eq!(out.final_amount, big("1120"));
        assert_eq!(out.total_interest, big("120"));
    }

    #[test]
    fn test_more_frequent_compounding_earns_more() {
        let annual = calculate_compound_interest(&lump_sum(CompoundingFrequency::Annually))
            .unwrap()
            .result;
        let quarterly = calculate_compound_interest(&lump_sum(CompoundingFrequency::Quarterly))
            .unwrap()
            .result;
        let monthly = calculate_compound_interest(&lump_sum(CompoundingFrequency::Monthly))
            .unwrap()
            .result;
        let daily = calculate_compound_interest(&lump_sum(CompoundingFrequency::Daily))
            .unwrap()
            .result;

        // 1000 × 1.03^4
        assert_eq!(quarterly.final_amount, big("1125.50881"));
        // 1000 × 1.01^12 ≈ 1126.825
        assert!((to_number(&monthly.final_amount) - 1126.825).abs() < 0.001);
        // 1000 × (1 + 0.12/365)^365 ≈ 1127.47
        assert!((to_number(&daily.final_amount) - 1127.4746).abs() < 0.001);
        assert!(annual.final_amount < quarterly.final_amount);
        assert!(quarterly.final_amount < monthly.final_amount);
        assert!(monthly.final_amount < daily.final_amount);
    }

    #[test]
    fn test_monthly_contribution_lands_before_interest() {
        let out = calculate_compound_interest(&CompoundInterestInput {
            principal: Decimal::ZERO,
            monthly_contribution: dec!(100),
            annual_rate: dec!(12),
            years: 1,
            compounding: CompoundingFrequency::Monthly,
        })
        .unwrap()
        .result;
        // 100 × 1.01 × (1.01^12 − 1) / 0.01
        assert!((to_number(&out.final_amount) - 1280.9328).abs() < 0.001);
        assert_eq!(out.total_contributions, big("1200"));
    }

    #[test]
    fn test_breakdown_chains_year_to_year() {
        let out = calculate_compound_interest(&default_input()).unwrap().result;
        assert_eq!(out.yearly_breakdown.len(), 20);
        assert_eq!(out.yearly_breakdown[0].starting_balance, big("10000"));
        for pair in out.yearly_breakdown.windows(2) {
            assert_eq!(pair[1].starting_balance, pair[0].ending_balance);
        }
        for y in &out.yearly_breakdown {
            assert_eq!(y.contribution, big("2400"));
            assert_eq!(
                &y.starting_balance + &y.contribution + &y.interest_earned,
                y.ending_balance
            );
        }
        // P + PMT × 12 × t
        assert_eq!(out.total_contributions, big("58000"));
        assert_eq!(
            &out.total_contributions + &out.total_interest,
            out.final_amount
        );
    }

    #[test]
    fn test_zero_rate_warns_and_only_adds_contributions() {
        let out = calculate_compound_interest(&CompoundInterestInput {
            annual_rate: Decimal::ZERO,
            ..default_input()
        })
        .unwrap();
        assert_eq!(out.result.final_amount, big("58000"));
        assert!(out.result.total_interest.is_zero());
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_days_in_month_cover_the_year() {
        let days: Vec<u32> = (0..12).map(days_in_month).collect();
        assert_eq!(days.iter().sum::<u32>(), 365);
        assert!(days.iter().all(|d| *d == 30 || *d == 31));
    }

    #[test]
    fn test_frequency_parsing() {
        assert_eq!(
            "semi-annually".parse::<CompoundingFrequency>().unwrap(),
            CompoundingFrequency::SemiAnnually
        );
        assert_eq!(
            "365".parse::<CompoundingFrequency>().unwrap(),
            CompoundingFrequency::Daily
        );
        assert!("weekly".parse::<CompoundingFrequency>().is_err());

        let input: CompoundInterestInput = serde_json::from_str(
            r#"{"principal": "5000", "annual_rate": "5", "years": 3, "compounding": "quarterly"}"#,
        )
        .unwrap();
        assert_eq!(input.compounding, CompoundingFrequency::Quarterly);
        assert!(input.monthly_contribution.is_zero());
    }

    #[test]
    fn test_rejects_bad_inputs() {
        for bad in [
            CompoundInterestInput {
                principal: dec!(-1),
                ..default_input()
            },
            CompoundInterestInput {
                annual_rate: dec!(-0.5),
                ..default_input()
            },
            CompoundInterestInput {
                years: 0,
                ..default_input()
            },
            CompoundInterestInput {
                years: 51,
                ..default_input()
            },
        ] {
            assert!(matches!(
                calculate_compound_interest(&bad),
                Err(CalcError::InvalidInput { .. })
            ));
        }
    }
}
