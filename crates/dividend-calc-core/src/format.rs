//! Display formatting for calculator output and reports.
//!
//! All helpers accept decimals, native numbers or numeric strings and never
//! fail. Input that is not a number renders as `NaN` so a formatting call
//! can never abort a report; catching bad input is validation's job.

use std::str::FromStr;

use bigdecimal::{BigDecimal, FromPrimitive, RoundingMode, Signed, Zero};
use rust_decimal::Decimal;

use crate::decimal::widen;

/// Decimal places used by `format_number_default`.
pub const DEFAULT_DECIMALS: u32 = 2;

const NAN: &str = "NaN";

/// Anything that can be shown as a number.
pub trait FormatValue {
    /// `None` when the value is not a finite number.
    fn to_format_decimal(&self) -> Option<BigDecimal>;
}

impl FormatValue for BigDecimal {
    fn to_format_decimal(&self) -> Option<BigDecimal> {
        Some(self.clone())
    }
}

impl FormatValue for Decimal {
    fn to_format_decimal(&self) -> Option<BigDecimal> {
        Some(widen(*self))
    }
}

impl FormatValue for f64 {
    fn to_format_decimal(&self) -> Option<BigDecimal> {
        if self.is_finite() {
            BigDecimal::from_f64(*self)
        } else {
            None
        }
    }
}

impl FormatValue for i64 {
    fn to_format_decimal(&self) -> Option<BigDecimal> {
        Some(BigDecimal::from(*self))
    }
}

impl FormatValue for i32 {
    fn to_format_decimal(&self) -> Option<BigDecimal> {
        Some(BigDecimal::from(*self))
    }
}

impl FormatValue for u32 {
    fn to_format_decimal(&self) -> Option<BigDecimal> {
        Some(BigDecimal::from(*self))
    }
}

impl FormatValue for str {
    fn to_format_decimal(&self) -> Option<BigDecimal> {
        let trimmed = self.trim();
        if trimmed.is_empty() {
            return None;
        }
        BigDecimal::from_str(trimmed).ok()
    }
}

impl FormatValue for String {
    fn to_format_decimal(&self) -> Option<BigDecimal> {
        self.as_str().to_format_decimal()
    }
}

impl<T: FormatValue + ?Sized> FormatValue for &T {
    fn to_format_decimal(&self) -> Option<BigDecimal> {
        (**self).to_format_decimal()
    }
}

/// US-dollar currency with two decimals and thousands separators:
/// `1234.5` → `$1,234.50`, `-20` → `-$20.00`.
pub fn format_currency<V: FormatValue + ?Sized>(value: &V) -> String {
    match value.to_format_decimal() {
        Some(d) => {
            let (negative, body) = grouped(&d, 2);
            if negative {
                format!("-${body}")
            } else {
                format!("${body}")
            }
        }
        None => format!("${NAN}"),
    }
}

/// Percentage with two decimals and no grouping: `7.5` → `7.50%`.
/// The value is already in percent units.
pub fn format_percent<V: FormatValue + ?Sized>(value: &V) -> String {
    match value.to_format_decimal() {
        Some(d) => {
            let (negative, body) = fixed(&d, 2);
            format!("{}{body}%", if negative { "-" } else { "" })
        }
        None => format!("{NAN}%"),
    }
}

/// Grouped number with exactly `decimals` fractional digits:
/// `format_number(&1234.567, 2)` → `1,234.57`.
pub fn format_number<V: FormatValue + ?Sized>(value: &V, decimals: u32) -> String {
    match value.to_format_decimal() {
        Some(d) => {
            let (negative, body) = grouped(&d, decimals);
            format!("{}{body}", if negative { "-" } else { "" })
        }
        None => NAN.to_string(),
    }
}

pub fn format_number_default<V: FormatValue + ?Sized>(value: &V) -> String {
    format_number(value, DEFAULT_DECIMALS)
}

/// Round half away from zero and render the magnitude with exactly
/// `decimals` digits. Returns the sign separately; a value that rounds to
/// zero is never negative.
fn fixed(value: &BigDecimal, decimals: u32) -> (bool, String) {
    let rounded = value
        .abs()
        .with_scale_round(i64::from(decimals), RoundingMode::HalfUp);
    let negative = value.is_negative() && !rounded.is_zero();

    let (digits, _) = rounded.as_bigint_and_exponent();
    let mut text = digits.to_string();
    let width = decimals as usize + 1;
    if text.len() < width {
        text = format!("{}{text}", "0".repeat(width - text.len()));
    }
    if decimals > 0 {
        text.insert(text.len() - decimals as usize, '.');
    }
    (negative, text)
}

fn grouped(value: &BigDecimal, decimals: u32) -> (bool, String) {
    let (negative, plain) = fixed(value, decimals);
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };

    let mut out = String::with_capacity(plain.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    (negative, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_from_decimal_number_and_string() {
        assert_eq!(format_currency(&dec!(1234.5)), "$1,234.50");
        assert_eq!(format_currency(&1000.0), "$1,000.00");
        assert_eq!(format_currency("999.9"), "$999.90");
        assert_eq!(format_currency(&0.0), "$0.00");
        assert_eq!(format_currency(&1_000_000i64), "$1,000,000.00");
    }

    #[test]
    fn test_currency_negative_and_rounding() {
        assert_eq!(format_currency(&dec!(-1234.5)), "-$1,234.50");
        assert_eq!(format_currency(&dec!(0.005)), "$0.01");
        assert_eq!(format_currency(&dec!(-0.001)), "$0.00");
    }

    #[test]
    fn test_percent() {
        assert_eq!(format_percent(&dec!(7.5)), "7.50%");
        assert_eq!(format_percent(&3.14159), "3.14%");
        assert_eq!(format_percent("12"), "12.00%");
        assert_eq!(format_percent(&dec!(-12.944)), "-12.94%");
        assert_eq!(format_percent(&dec!(12345.678)), "12345.68%");
    }

    #[test]
    fn test_number() {
        assert_eq!(format_number_default(&1234.567), "1,234.57");
        assert_eq!(format_number(&1234.5, 0), "1,235");
        assert_eq!(format_number(&dec!(999.1), 1), "999.1");
        assert_eq!(format_number(&dec!(104), 4), "104.0000");
        assert_eq!(format_number(&dec!(123456789.123), 2), "123,456,789.12");
        assert_eq!(format_number(&dec!(100), 0), "100");
    }

    #[test]
    fn test_values_beyond_fixed_width_decimals() {
        let shares = BigDecimal::from_str("171520734099889534582162508160000.126").unwrap();
        assert_eq!(
            format_number(&shares, 2),
            "171,520,734,099,889,534,582,162,508,160,000.13"
        );
        assert_eq!(format_currency("1e30"), "$1,000,000,000,000,000,000,000,000,000,000.00");
        assert_eq!(format_number(&BigDecimal::from_str("0.00000000001").unwrap(), 4), "0.0000");
    }

    #[test]
    fn test_non_numeric_renders_nan() {
        assert_eq!(format_currency("abc"), "$NaN");
        assert_eq!(format_percent("abc"), "NaN%");
        assert_eq!(format_number("abc", 2), "NaN");
        assert_eq!(format_number(&f64::NAN, 2), "NaN");
        assert_eq!(format_currency(""), "$NaN");
    }
}
