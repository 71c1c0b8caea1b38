use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Serialize;

use dividend_calc_core::decimal::{widen, FINANCIAL};
use dividend_calc_core::drip::{projection, validation};
use dividend_calc_core::types::FieldError;
use dividend_calc_core::{format, planning, report, time_value, CalcError};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_form(input_json: &str) -> NapiResult<validation::DripFormInput> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// DRIP
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ValidationReport {
    valid: bool,
    errors: Vec<FieldError>,
}

/// Validate the raw calculator form. Always succeeds for well-formed JSON;
/// problems are listed per field.
#[napi]
pub fn validate_drip_inputs(input_json: String) -> NapiResult<String> {
    let form = parse_form(&input_json)?;
    let errors = validation::validate(&form);
    let report = ValidationReport {
        valid: errors.is_empty(),
        errors,
    };
    serde_json::to_string(&report).map_err(to_napi_error)
}

#[napi]
pub fn calculate_drip(input_json: String) -> NapiResult<String> {
    let form = parse_form(&input_json)?;
    let output = projection::calculate_drip_from_form(&form).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn drip_report_markdown(input_json: String) -> NapiResult<String> {
    let form = parse_form(&input_json)?;
    let input = validation::DripInput::try_from(&form)
        .map_err(|errors| to_napi_error(CalcError::Validation(errors)))?;
    let projection = projection::project(&input).map_err(to_napi_error)?;
    Ok(report::render_markdown(&input, &projection))
}

/// Section-per-block CSV export of a projection.
#[napi]
pub fn drip_report_csv(input_json: String) -> NapiResult<String> {
    let form = parse_form(&input_json)?;
    let input = validation::DripInput::try_from(&form)
        .map_err(|errors| to_napi_error(CalcError::Validation(errors)))?;
    let projection = projection::project(&input).map_err(to_napi_error)?;
    report::render_csv(&input, &projection).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Returns
// ---------------------------------------------------------------------------

/// Compound annual growth rate as a decimal string, e.g. `"7.1773462536"`.
#[napi]
pub fn calculate_annualized_return(
    initial_value: String,
    final_value: String,
    years: u32,
) -> NapiResult<String> {
    let initial: Decimal = FINANCIAL.parse(&initial_value).map_err(to_napi_error)?;
    let final_value: Decimal = FINANCIAL.parse(&final_value).map_err(to_napi_error)?;
    let rate = time_value::cagr(&FINANCIAL, &widen(initial), &widen(final_value), years)
        .map_err(to_napi_error)?;
    Ok(rate.to_string())
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

#[napi]
pub fn format_currency(value: String) -> String {
    format::format_currency(&value)
}

#[napi]
pub fn format_percent(value: String) -> String {
    format::format_percent(&value)
}

#[napi]
pub fn format_number(value: String, decimals: Option<u32>) -> String {
    format::format_number(&value, decimals.unwrap_or(format::DEFAULT_DECIMALS))
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

#[napi]
pub fn compound_interest(input_json: String) -> NapiResult<String> {
    let input: planning::compound_interest::CompoundInterestInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = planning::compound_interest::calculate_compound_interest(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn dividend_growth(input_json: String) -> NapiResult<String> {
    let input: planning::dividend_growth::DividendGrowthInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        planning::dividend_growth::calculate_dividend_growth(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn savings_goal(input_json: String) -> NapiResult<String> {
    let input: planning::savings_goal::SavingsGoalInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        planning::savings_goal::calculate_savings_goal(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn investment_return(input_json: String) -> NapiResult<String> {
    let input: planning::investment_return::InvestmentReturnInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = planning::investment_return::calculate_investment_return(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn yield_on_cost(input_json: String) -> NapiResult<String> {
    let input: planning::yield_on_cost::YieldOnCostInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        planning::yield_on_cost::calculate_yield_on_cost(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
