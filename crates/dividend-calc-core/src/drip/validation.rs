use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::decimal::FINANCIAL;
use crate::types::{deserialize_form_value, FieldError};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Validated year range for a projection.
pub const MIN_YEARS: u32 = 1;
pub const MAX_YEARS: u32 = 50;

/// Fields of the DRIP calculator form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DripField {
    InitialInvestment,
    SharePrice,
    AnnualDividend,
    MonthlyContribution,
    DividendGrowthRate,
    ShareAppreciationRate,
    TaxRate,
    YearsToCalculate,
}

impl DripField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DripField::InitialInvestment => "initial_investment",
            DripField::SharePrice => "share_price",
            DripField::AnnualDividend => "annual_dividend",
            DripField::MonthlyContribution => "monthly_contribution",
            DripField::DividendGrowthRate => "dividend_growth_rate",
            DripField::ShareAppreciationRate => "share_appreciation_rate",
            DripField::TaxRate => "tax_rate",
            DripField::YearsToCalculate => "years_to_calculate",
        }
    }
}

impl fmt::Display for DripField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw calculator form as submitted by a user. Numeric fields stay as text
/// until validation; JSON numbers are accepted and converted to text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DripFormInput {
    #[serde(default)]
    pub ticker: String,
    #[serde(deserialize_with = "deserialize_form_value")]
    pub initial_investment: String,
    #[serde(deserialize_with = "deserialize_form_value")]
    pub share_price: String,
    #[serde(deserialize_with = "deserialize_form_value")]
    pub annual_dividend: String,
    #[serde(default = "zero", deserialize_with = "deserialize_form_value")]
    pub monthly_contribution: String,
    #[serde(default = "zero", deserialize_with = "deserialize_form_value")]
    pub dividend_growth_rate: String,
    #[serde(default = "zero", deserialize_with = "deserialize_form_value")]
    pub share_appreciation_rate: String,
    #[serde(default = "zero", deserialize_with = "deserialize_form_value")]
    pub tax_rate: String,
    #[serde(deserialize_with = "deserialize_form_value")]
    pub years_to_calculate: String,
    #[serde(default = "reinvest_by_default")]
    pub reinvest_dividends: bool,
}

fn zero() -> String {
    "0".to_string()
}

fn reinvest_by_default() -> bool {
    true
}

/// Typed, range-checked inputs for the projection engine. Percentages are in
/// percent units (7 = 7%). Form values are bounded, so they stay in
/// fixed-width decimals; the engine widens them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DripInput {
    #[serde(default)]
    pub ticker: String,
    pub initial_investment: Decimal,
    pub share_price: Decimal,
    pub annual_dividend: Decimal,
    pub monthly_contribution: Decimal,
    pub dividend_growth_rate: Decimal,
    pub share_appreciation_rate: Decimal,
    pub tax_rate: Decimal,
    pub years_to_calculate: u32,
    pub reinvest_dividends: bool,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check every field of a raw form and return all problems found. An empty
/// list means the form can be projected.
pub fn validate(form: &DripFormInput) -> Vec<FieldError> {
    match DripInput::try_from(form) {
        Ok(_) => Vec::new(),
        Err(errors) => errors,
    }
}

impl TryFrom<&DripFormInput> for DripInput {
    type Error = Vec<FieldError>;

    fn try_from(form: &DripFormInput) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();

        let initial_investment = check_number(
            &mut errors,
            DripField::InitialInvestment,
            &form.initial_investment,
            |v| v >= Decimal::ZERO,
            "Initial investment must be a positive number",
        );
        let share_price = check_number(
            &mut errors,
            DripField::SharePrice,
            &form.share_price,
            |v| v > Decimal::ZERO,
            "Share price must be greater than 0",
        );
        let annual_dividend = check_number(
            &mut errors,
            DripField::AnnualDividend,
            &form.annual_dividend,
            |v| v >= Decimal::ZERO,
            "Annual dividend must be a positive number",
        );
        let monthly_contribution = check_number(
            &mut errors,
            DripField::MonthlyContribution,
            &form.monthly_contribution,
            |v| v >= Decimal::ZERO,
            "Monthly contribution must be a positive number",
        );
        let dividend_growth_rate = check_number(
            &mut errors,
            DripField::DividendGrowthRate,
            &form.dividend_growth_rate,
            within(dec!(-100), Decimal::ONE_HUNDRED),
            "Dividend growth rate must be between -100% and 100%",
        );
        let share_appreciation_rate = check_number(
            &mut errors,
            DripField::ShareAppreciationRate,
            &form.share_appreciation_rate,
            within(dec!(-100), Decimal::ONE_HUNDRED),
            "Share appreciation rate must be between -100% and 100%",
        );
        let tax_rate = check_number(
            &mut errors,
            DripField::TaxRate,
            &form.tax_rate,
            within(Decimal::ZERO, Decimal::ONE_HUNDRED),
            "Tax rate must be between 0% and 100%",
        );
        let years_to_calculate = check_years(&mut errors, &form.years_to_calculate);

        match (
            initial_investment,
            share_price,
            annual_dividend,
            monthly_contribution,
            dividend_growth_rate,
            share_appreciation_rate,
            tax_rate,
            years_to_calculate,
        ) {
            (
                Some(initial_investment),
                Some(share_price),
                Some(annual_dividend),
                Some(monthly_contribution),
                Some(dividend_growth_rate),
                Some(share_appreciation_rate),
                Some(tax_rate),
                Some(years_to_calculate),
            ) if errors.is_empty() => Ok(DripInput {
                ticker: form.ticker.trim().to_string(),
                initial_investment,
                share_price,
                annual_dividend,
                monthly_contribution,
                dividend_growth_rate,
                share_appreciation_rate,
                tax_rate,
                years_to_calculate,
                reinvest_dividends: form.reinvest_dividends,
            }),
            _ => Err(errors),
        }
    }
}

fn within(min: Decimal, max: Decimal) -> impl Fn(Decimal) -> bool {
    move |v| v >= min && v <= max
}

/// Parse one field; record `message` when it is not a number or fails `ok`.
fn check_number(
    errors: &mut Vec<FieldError>,
    field: DripField,
    raw: &str,
    ok: impl Fn(Decimal) -> bool,
    message: &str,
) -> Option<Decimal> {
    match FINANCIAL.parse(raw) {
        Ok(value) if ok(value) => Some(value),
        _ => {
            errors.push(FieldError::new(field.as_str(), message));
            None
        }
    }
}

fn check_years(errors: &mut Vec<FieldError>, raw: &str) -> Option<u32> {
    let field = DripField::YearsToCalculate.as_str();
    let whole_number = "Years to calculate must be a whole number";
    let out_of_range = format!("Years to calculate must be between {MIN_YEARS} and {MAX_YEARS}");

    let parsed = match FINANCIAL.parse(raw) {
        Ok(v) => v,
        Err(_) => {
            // Numbers too large for a form field ("1e100") are out of range,
            // not malformed
            let trimmed = raw.trim();
            let numeric = trimmed.bytes().any(|b| b.is_ascii_digit());
            let message = match trimmed.parse::<f64>() {
                Ok(v) if numeric && (v.is_infinite() || v.fract() == 0.0) => out_of_range,
                _ => whole_number.to_string(),
            };
            errors.push(FieldError::new(field, message));
            return None;
        }
    };
    if !parsed.fract().is_zero() {
        errors.push(FieldError::new(field, whole_number));
        return None;
    }
    match parsed.to_u32() {
        Some(years) if (MIN_YEARS..=MAX_YEARS).contains(&years) => Some(years),
        _ => {
            errors.push(FieldError::new(field, out_of_range));
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Input cleanup
// ---------------------------------------------------------------------------

/// Strip everything except digits, the decimal point and the minus sign,
/// e.g. `"$1,250.00"` → `"1250.00"`.
pub fn sanitize_numeric_input(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

/// Accept both `"5"` and `"5%"` for percentage fields.
pub fn parse_percentage_input(value: &str) -> String {
    sanitize_numeric_input(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
