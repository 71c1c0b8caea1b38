//! Arbitrary-precision decimal arithmetic.
//!
//! Form inputs are bounded and validated, so they are parsed into
//! `rust_decimal::Decimal`. Everything a projection derives from them (share
//! counts, compounded prices, running totals) can grow or shrink without
//! limit over fifty years, so the engine works on [`BigDecimal`] through a
//! [`DecimalContext`].
//!
//! Addition, subtraction and multiplication are exact. Division is the only
//! operation that can produce an infinite expansion; its quotient is rounded
//! to the context's scale with the context's rounding mode. The context
//! carries its own scale and rounding rule instead of relying on
//! process-wide settings, so two callers with different precision needs
//! never interfere.

use std::str::FromStr;

use bigdecimal::num_bigint::BigInt;
use bigdecimal::{BigDecimal, FromPrimitive, RoundingMode, Signed, ToPrimitive, Zero};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::CalcError;
use crate::CalcResult;

/// Scale (fractional digits) used for financial projections.
pub const FINANCIAL_SCALE: u32 = 10;

/// 10 fractional digits on every quotient, round half away from zero.
pub const FINANCIAL: DecimalContext = DecimalContext::new(FINANCIAL_SCALE, RoundingMode::HalfUp);

/// Scale and rounding applied to quotients and to explicit `round` calls.
#[derive(Debug, Clone, Copy)]
pub struct DecimalContext {
    pub scale: u32,
    pub rounding: RoundingMode,
}

impl Default for DecimalContext {
    fn default() -> Self {
        FINANCIAL
    }
}

impl DecimalContext {
    pub const fn new(scale: u32, rounding: RoundingMode) -> Self {
        DecimalContext { scale, rounding }
    }

    /// Round a value to this context's scale. Trailing zeros are dropped so
    /// `104.0000000000` reads as `104`.
    pub fn round(&self, value: &BigDecimal) -> BigDecimal {
        trim_zeros(value.with_scale_round(i64::from(self.scale), self.rounding))
    }

    pub fn from_int(&self, value: i64) -> BigDecimal {
        BigDecimal::from(value)
    }

    /// Parse a form value: plain (`"1234.56"`) or scientific (`"1.2e3"`)
    /// notation, rounded to this context's scale. Surrounding whitespace is
    /// ignored; anything else is rejected, as is a value too large for an
    /// input field.
    pub fn parse(&self, raw: &str) -> CalcResult<Decimal> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CalcError::InvalidNumericInput {
                value: raw.to_string(),
            });
        }
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map(|d| d.round_dp_with_strategy(self.scale, input_strategy(self.rounding)))
            .map_err(|_| CalcError::InvalidNumericInput {
                value: raw.to_string(),
            })
    }

    pub fn from_f64(&self, value: f64) -> CalcResult<BigDecimal> {
        if !value.is_finite() {
            return Err(CalcError::InvalidNumericInput {
                value: value.to_string(),
            });
        }
        BigDecimal::from_f64(value)
            .map(|d| self.round(&d))
            .ok_or_else(|| CalcError::InvalidNumericInput {
                value: value.to_string(),
            })
    }

    pub fn add(&self, a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
        a + b
    }

    pub fn sub(&self, a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
        a - b
    }

    pub fn mul(&self, a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
        a * b
    }

    /// `a / b` rounded to the context's scale.
    ///
    /// The quotient is computed exactly on the integer digits: one digit past
    /// the scale plus a sticky digit for a non-zero remainder, which is
    /// enough for every rounding mode to decide correctly.
    pub fn div(&self, a: &BigDecimal, b: &BigDecimal) -> CalcResult<BigDecimal> {
        if b.is_zero() {
            return Err(CalcError::DivisionByZero {
                context: format!("{a} / {b}"),
            });
        }
        if a.is_zero() {
            return Ok(BigDecimal::zero());
        }

        let negative = a.is_negative() != b.is_negative();
        let (a_digits, a_scale) = a.abs().as_bigint_and_exponent();
        let (b_digits, b_scale) = b.abs().as_bigint_and_exponent();

        // a / b = (a_digits / b_digits) * 10^(b_scale - a_scale)
        let guard_scale = i64::from(self.scale) + 1;
        let shift = guard_scale + b_scale - a_scale;
        let (numerator, denominator) = if shift >= 0 {
            (a_digits * pow10(shift)?, b_digits)
        } else {
            (a_digits, b_digits * pow10(-shift)?)
        };

        let quotient = &numerator / &denominator;
        let sticky = if (&numerator % &denominator).is_zero() { 0 } else { 1 };
        let mut guarded: BigInt = quotient * 10 + sticky;
        if negative {
            guarded = -guarded;
        }

        Ok(self.round(&BigDecimal::new(guarded, guard_scale + 1)))
    }

    /// `value × pct / 100`
    pub fn percent_of(&self, value: &BigDecimal, pct: &BigDecimal) -> CalcResult<BigDecimal> {
        let fraction = self.div(pct, &hundred())?;
        Ok(self.mul(value, &fraction))
    }

    /// `1 + pct / 100`, the per-period growth factor for a percentage rate.
    pub fn growth_factor(&self, pct: &BigDecimal) -> CalcResult<BigDecimal> {
        let fraction = self.div(pct, &hundred())?;
        Ok(self.add(&BigDecimal::from(1), &fraction))
    }
}

/// Exact conversion of a validated input into the engine's number type.
pub fn widen(value: Decimal) -> BigDecimal {
    BigDecimal::new(BigInt::from(value.mantissa()), i64::from(value.scale()))
}

/// Lossy conversion for display and for the f64 power step in CAGR.
pub fn to_number(value: &BigDecimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Base-10 logarithm of a positive value, taken from its leading digits and
/// exponent so values past the `f64` range still have one. `None` for zero
/// or negative values.
pub fn log10(value: &BigDecimal) -> Option<f64> {
    if !value.is_positive() {
        return None;
    }
    let (digits, scale) = value.as_bigint_and_exponent();
    let text = digits.to_string();
    let lead = &text[..text.len().min(17)];
    let mantissa: f64 = lead.parse().ok()?;
    let exponent = (text.len() - lead.len()) as i64 - scale;
    Some(mantissa.log10() + exponent as f64)
}

pub fn hundred() -> BigDecimal {
    BigDecimal::from(100)
}

fn pow10(exponent: i64) -> CalcResult<BigInt> {
    let exponent = u32::try_from(exponent).map_err(|_| {
        CalcError::FinancialImpossibility(format!("decimal exponent {exponent} out of range"))
    })?;
    Ok(BigInt::from(10).pow(exponent))
}

fn trim_zeros(value: BigDecimal) -> BigDecimal {
    let normalized = value.normalized();
    if normalized.as_bigint_and_exponent().1 < 0 {
        normalized.with_scale(0)
    } else {
        normalized
    }
}

fn input_strategy(mode: RoundingMode) -> RoundingStrategy {
    match mode {
        RoundingMode::Up => RoundingStrategy::AwayFromZero,
        RoundingMode::Down => RoundingStrategy::ToZero,
        RoundingMode::Ceiling => RoundingStrategy::ToPositiveInfinity,
        RoundingMode::Floor => RoundingStrategy::ToNegativeInfinity,
        RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
        RoundingMode::HalfDown => RoundingStrategy::MidpointTowardZero,
        RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn big(raw: &str) -> BigDecimal {
        BigDecimal::from_str(raw).unwrap()
    }

    #[test]
    fn test_parse_plain_and_scientific() {
        assert_eq!(FINANCIAL.parse("1234.56").unwrap(), dec!(1234.56));
        assert_eq!(FINANCIAL.parse("  42 ").unwrap(), dec!(42));
        assert_eq!(FINANCIAL.parse("1.5e3").unwrap(), dec!(1500));
        assert_eq!(FINANCIAL.parse("-100").unwrap(), dec!(-100));
        assert_eq!(FINANCIAL.parse("0.123456789012").unwrap(), dec!(0.1234567890));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        for raw in ["abc", "", "   ", "12abc", "1,000"] {
            match FINANCIAL.parse(raw) {
                Err(CalcError::InvalidNumericInput { value }) => assert_eq!(value, raw),
                other => panic!("expected InvalidNumericInput for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_division_rounds_half_up_at_ten_places() {
        // 2/3 = 0.666..., rounds up at the 10th digit
        assert_eq!(FINANCIAL.div(&big("2"), &big("3")).unwrap(), big("0.6666666667"));
        // 1/3 rounds down
        assert_eq!(FINANCIAL.div(&big("1"), &big("3")).unwrap(), big("0.3333333333"));
        assert_eq!(FINANCIAL.div(&big("-2"), &big("3")).unwrap(), big("-0.6666666667"));
        // Exact midpoint rounds away from zero
        assert_eq!(FINANCIAL.round(&big("0.00000000005")), big("0.0000000001"));
        assert_eq!(FINANCIAL.round(&big("-0.00000000005")), big("-0.0000000001"));
        assert_eq!(
            FINANCIAL.div(&big("1"), &big("20000000000")).unwrap(),
            big("0.0000000001")
        );
    }

    #[test]
    fn test_quotient_just_above_midpoint_rounds_up() {
        // 0.000000000050000001 is past the midpoint only in the 18th digit
        let q = FINANCIAL
            .div(&big("0.000000000050000001"), &big("1"))
            .unwrap();
        assert_eq!(q, big("0.0000000001"));
        let below = FINANCIAL
            .div(&big("0.000000000049999999"), &big("1"))
            .unwrap();
        assert_eq!(below, BigDecimal::zero());
    }

    #[test]
    fn test_multiplication_is_exact() {
        // 100 × 0.1^13 would round to zero at ten places
        let mut price = big("100");
        for _ in 0..13 {
            price = FINANCIAL.mul(&price, &big("0.1"));
        }
        assert_eq!(price, big("0.00000000001"));
        assert!(price > BigDecimal::zero());
    }

    #[test]
    fn test_magnitude_is_unbounded() {
        // Past the 96-bit mantissa of rust_decimal (about 7.9e28)
        let shares = big("1715207340998895345821625081.6");
        let grown = FINANCIAL.mul(&shares, &big("1000000"));
        let back = FINANCIAL.div(&grown, &big("0.0405648192")).unwrap();
        assert!(back > big("1e33"));
        assert_eq!(FINANCIAL.div(&grown, &big("1000000")).unwrap(), shares);
    }

    #[test]
    fn test_division_by_zero_is_an_error() {
        let err = FINANCIAL.div(&big("100"), &BigDecimal::zero()).unwrap_err();
        assert!(matches!(err, CalcError::DivisionByZero { .. }));
    }

    #[test]
    fn test_equal_values_compare_equal_regardless_of_path() {
        let a = FINANCIAL.div(&big("10"), &big("4")).unwrap();
        let b = FINANCIAL.mul(&big("0.625"), &big("4"));
        assert_eq!(a, b);
        assert!(FINANCIAL.from_int(3) > a);
    }

    #[test]
    fn test_custom_context_is_independent() {
        let coarse = DecimalContext::new(2, RoundingMode::Down);
        assert_eq!(coarse.div(&big("2"), &big("3")).unwrap(), big("0.66"));
        assert_eq!(FINANCIAL.div(&big("2"), &big("3")).unwrap(), big("0.6666666667"));
        assert_eq!(coarse.parse("1.239").unwrap(), dec!(1.23));
    }

    #[test]
    fn test_growth_factor_and_percent_of() {
        assert_eq!(FINANCIAL.growth_factor(&big("7")).unwrap(), big("1.07"));
        assert_eq!(FINANCIAL.growth_factor(&big("-100")).unwrap(), BigDecimal::zero());
        assert_eq!(FINANCIAL.percent_of(&big("400"), &big("15")).unwrap(), big("60"));
    }

    #[test]
    fn test_widen_is_exact() {
        assert_eq!(widen(dec!(3.28)), big("3.28"));
        assert_eq!(widen(dec!(-0.0000000001)), big("-0.0000000001"));
        assert_eq!(widen(Decimal::MAX), big("79228162514264337593543950335"));
    }

    #[test]
    fn test_round_drops_trailing_zeros() {
        let r = FINANCIAL.round(&big("104.000000000000"));
        assert_eq!(r.to_string(), "104");
        assert_eq!(FINANCIAL.round(&big("1200")).to_string(), "1200");
    }

    #[test]
    fn test_log10_beyond_f64_range() {
        assert!((log10(&big("1000")).unwrap() - 3.0).abs() < 1e-12);
        assert!((log10(&big("0.001")).unwrap() + 3.0).abs() < 1e-12);
        assert!((log10(&big("2.5e400")).unwrap() - 400.39794).abs() < 1e-4);
        assert_eq!(log10(&BigDecimal::zero()), None);
        assert_eq!(log10(&big("-5")), None);
    }

    #[test]
    fn test_f64_round_trip() {
        assert_eq!(FINANCIAL.from_f64(7.5).unwrap(), big("7.5"));
        assert!(FINANCIAL.from_f64(f64::NAN).is_err());
        assert!(FINANCIAL.from_f64(f64::INFINITY).is_err());
        assert!((to_number(&big("1234.5")) - 1234.5).abs() < f64::EPSILON);
    }
}
