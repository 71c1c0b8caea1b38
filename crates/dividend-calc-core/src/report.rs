//! Shareable Markdown and CSV reports of a DRIP projection.
//!
//! Both renderings carry the same three sections: the input parameters, the
//! headline summary and the year-by-year breakdown. Money and percentages go
//! through the `format` helpers so reports read the same as the calculator.

use crate::drip::projection::DripProjection;
use crate::drip::validation::DripInput;
use crate::error::CalcError;
use crate::format::{format_currency, format_number, format_percent};
use crate::CalcResult;

pub const REPORT_TITLE: &str = "Dividend Investment Analysis";

const BREAKDOWN_HEADERS: [&str; 5] = [
    "Year",
    "Portfolio Value",
    "Annual Dividends",
    "Total Dividends",
    "Yield %",
];

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn input_rows(input: &DripInput) -> Vec<(&'static str, String)> {
    let mut rows = Vec::with_capacity(10);
    if !input.ticker.is_empty() {
        rows.push(("Ticker", input.ticker.clone()));
    }
    rows.extend([
        ("Initial Investment", format_currency(&input.initial_investment)),
        ("Share Price", format_currency(&input.share_price)),
        ("Annual Dividend", format_currency(&input.annual_dividend)),
        ("Monthly Contribution", format_currency(&input.monthly_contribution)),
        ("Dividend Growth Rate", format_percent(&input.dividend_growth_rate)),
        ("Share Appreciation Rate", format_percent(&input.share_appreciation_rate)),
        ("Tax Rate", format_percent(&input.tax_rate)),
        ("Years", input.years_to_calculate.to_string()),
        (
            "Reinvest Dividends",
            if input.reinvest_dividends { "Yes" } else { "No" }.to_string(),
        ),
    ]);
    rows
}

fn summary_rows(projection: &DripProjection) -> Vec<(&'static str, String)> {
    let s = &projection.summary;
    vec![
        ("Final Portfolio Value", format_currency(&s.final_portfolio_value)),
        ("Total Contributions", format_currency(&s.total_contributions)),
        ("Total Dividends Earned", format_currency(&s.total_dividends_earned)),
        ("Total Return", format_currency(&s.total_return)),
        ("Total Return %", format_percent(&s.total_return_percent)),
        ("Annualized Return", format_percent(&s.annualized_return)),
        ("Final Shares", format_number(&s.final_shares, 4)),
        ("Final Annual Dividend Income", format_currency(&s.final_dividend_income)),
        ("Final Yield on Cost", format_percent(&s.final_yield_on_cost)),
    ]
}

fn breakdown_rows(projection: &DripProjection) -> Vec<[String; 5]> {
    projection
        .results
        .iter()
        .map(|r| {
            [
                r.year.to_string(),
                format_currency(&r.portfolio_value),
                format_currency(&r.net_annual_dividend),
                format_currency(&r.total_dividends_earned),
                format_percent(&r.dividend_yield),
            ]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Renderers
// ---------------------------------------------------------------------------

pub fn render_markdown(input: &DripInput, projection: &DripProjection) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("# {REPORT_TITLE}"));
    lines.push("**Calculator Type:** DRIP".into());
    lines.push(String::new());

    lines.push("## Input Parameters".into());
    lines.push(String::new());
    for (label, value) in input_rows(input) {
        lines.push(format!("- **{label}:** {value}"));
    }
    lines.push(String::new());

    lines.push("## Results Summary".into());
    lines.push(String::new());
    for (label, value) in summary_rows(projection) {
        lines.push(format!("- **{label}:** {value}"));
    }
    lines.push(String::new());

    if !projection.results.is_empty() {
        lines.push("## Yearly Breakdown".into());
        lines.push(String::new());
        lines.push(format!("| {} |", BREAKDOWN_HEADERS.join(" | ")));
        lines.push(format!(
            "|{}|",
            BREAKDOWN_HEADERS
                .iter()
                .map(|h| "-".repeat(h.len() + 2))
                .collect::<Vec<_>>()
                .join("|")
        ));
        for row in breakdown_rows(projection) {
            lines.push(format!("| {} |", row.join(" | ")));
        }
        lines.push(String::new());
    }

    lines.push("---".into());
    lines.push("*Generated by Dividend Calculator Hub*".into());

    lines.join("\n")
}

/// Section-per-block CSV. Rows have different widths, so the writer runs in
/// flexible mode; cells containing commas or quotes are quoted.
pub fn render_csv(input: &DripInput, projection: &DripProjection) -> CalcResult<String> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    wtr.write_record([REPORT_TITLE]).map_err(csv_error)?;
    wtr.write_record(["Calculator Type: DRIP"]).map_err(csv_error)?;

    wtr.write_record(["INPUT PARAMETERS"]).map_err(csv_error)?;
    for (label, value) in input_rows(input) {
        wtr.write_record([label, value.as_str()]).map_err(csv_error)?;
    }

    wtr.write_record(["RESULTS SUMMARY"]).map_err(csv_error)?;
    for (label, value) in summary_rows(projection) {
        wtr.write_record([label, value.as_str()]).map_err(csv_error)?;
    }

    if !projection.results.is_empty() {
        wtr.write_record(["YEARLY BREAKDOWN"]).map_err(csv_error)?;
        wtr.write_record(BREAKDOWN_HEADERS).map_err(csv_error)?;
        for row in breakdown_rows(projection) {
            wtr.write_record(&row).map_err(csv_error)?;
        }
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| CalcError::SerializationError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CalcError::SerializationError(e.to_string()))
}

fn csv_error(e: csv::Error) -> CalcError {
    CalcError::SerializationError(e.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drip::projection::project;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn flat_input() -> DripInput {
        DripInput {
            ticker: "SCHD".into(),
            initial_investment: dec!(10_000),
            share_price: dec!(100),
            annual_dividend: dec!(4),
            monthly_contribution: Decimal::ZERO,
            dividend_growth_rate: Decimal::ZERO,
            share_appreciation_rate: Decimal::ZERO,
            tax_rate: Decimal::ZERO,
            years_to_calculate: 3,
            reinvest_dividends: true,
        }
    }

    #[test]
    fn test_markdown_sections_and_values() {
        let input = flat_input();
        let projection = project(&input).unwrap();
        let md = render_markdown(&input, &projection);

        assert!(md.starts_with("# Dividend Investment Analysis"));
        assert!(md.contains("- **Ticker:** SCHD"));
        assert!(md.contains("- **Initial Investment:** $10,000.00"));
        assert!(md.contains("- **Reinvest Dividends:** Yes"));
        assert!(md.contains("## Results Summary"));
        assert!(md.contains("| 1 | $10,400.00 | $400.00 | $400.00 | 4.00% |"));
        // Header, separator and one row per year
        assert_eq!(md.lines().filter(|l| l.starts_with('|')).count(), 2 + 3);
    }

    #[test]
    fn test_markdown_summary_matches_projection() {
        let input = flat_input();
        let projection = project(&input).unwrap();
        let md = render_markdown(&input, &projection);
        let expected = format!(
            "- **Final Portfolio Value:** {}",
            format_currency(&projection.summary.final_portfolio_value)
        );
        assert!(md.contains(&expected));
    }

    #[test]
    fn test_csv_quotes_grouped_amounts() {
        let input = flat_input();
        let projection = project(&input).unwrap();
        let csv = render_csv(&input, &projection).unwrap();

        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Dividend Investment Analysis"));
        assert!(csv.contains("Initial Investment,\"$10,000.00\""));
        assert!(csv.contains("Year,Portfolio Value,Annual Dividends,Total Dividends,Yield %"));
        assert!(csv.contains("1,\"$10,400.00\",$400.00,$400.00,4.00%"));
    }

    #[test]
    fn test_ticker_row_omitted_when_blank() {
        let input = DripInput {
            ticker: String::new(),
            ..flat_input()
        };
        let projection = project(&input).unwrap();
        assert!(!render_markdown(&input, &projection).contains("Ticker"));
    }
}
