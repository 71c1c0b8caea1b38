use clap::Args;
use serde_json::{json, Value};

use dividend_calc_core::drip::presets;
use dividend_calc_core::drip::projection;
use dividend_calc_core::drip::validation::{self, DripFormInput, DripInput};
use dividend_calc_core::report;
use dividend_calc_core::CalcError;

use crate::input;
use crate::OutputFormat;

/// Arguments for a DRIP projection. Values are taken as typed text and go
/// through the same validation as the web form.
#[derive(Args)]
pub struct DripArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Start from a built-in scenario (see `divcalc presets`); flags override it
    #[arg(long)]
    pub preset: Option<String>,

    /// Ticker label carried into the output
    #[arg(long)]
    pub ticker: Option<String>,

    /// Starting amount invested
    #[arg(long, allow_hyphen_values = true)]
    pub initial_investment: Option<String>,

    /// Price per share at the start
    #[arg(long, allow_hyphen_values = true)]
    pub share_price: Option<String>,

    /// Annual dividend per share at the start
    #[arg(long, allow_hyphen_values = true)]
    pub annual_dividend: Option<String>,

    /// Amount added every month
    #[arg(long, allow_hyphen_values = true)]
    pub monthly_contribution: Option<String>,

    /// Yearly dividend growth in percent (e.g. 7 or 7%)
    #[arg(long, allow_hyphen_values = true)]
    pub dividend_growth_rate: Option<String>,

    /// Yearly share price growth in percent
    #[arg(long, allow_hyphen_values = true)]
    pub share_appreciation_rate: Option<String>,

    /// Tax withheld from dividends in percent
    #[arg(long, allow_hyphen_values = true)]
    pub tax_rate: Option<String>,

    /// Number of years to project (1-50)
    #[arg(long, allow_hyphen_values = true)]
    pub years: Option<String>,

    /// Take dividends as cash instead of buying shares
    #[arg(long)]
    pub no_reinvest: bool,
}

pub fn run_drip(args: DripArgs, output: &OutputFormat) -> Result<Value, Box<dyn std::error::Error>> {
    let form = read_form(args)?;
    let input = DripInput::try_from(&form).map_err(CalcError::Validation)?;
    render_drip(&input, output)
}

/// Project a validated input in the shape the output format needs: a
/// pre-rendered report string or the JSON envelope.
pub fn render_drip(
    input: &DripInput,
    output: &OutputFormat,
) -> Result<Value, Box<dyn std::error::Error>> {
    match output {
        OutputFormat::Report => {
            let projection = projection::project(input)?;
            return Ok(Value::String(report::render_markdown(input, &projection)));
        }
        OutputFormat::ReportCsv => {
            let projection = projection::project(input)?;
            return Ok(Value::String(report::render_csv(input, &projection)?));
        }
        _ => {}
    }

    let result = projection::calculate_drip(input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_validate(args: DripArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let form = read_form(args)?;
    let errors = validation::validate(&form);
    if !errors.is_empty() {
        return Err(CalcError::Validation(errors).into());
    }
    Ok(json!({ "result": { "valid": true, "errors": [] } }))
}

fn read_form(args: DripArgs) -> Result<DripFormInput, Box<dyn std::error::Error>> {
    if let Some(form) = input::read_input::<DripFormInput>(args.input.as_deref())? {
        return Ok(form);
    }

    let mut form = match args.preset {
        Some(ref key) => {
            presets::preset(key)
                .ok_or_else(|| {
                    format!(
                        "unknown preset '{}' (available: {})",
                        key,
                        presets::preset_keys().join(", ")
                    )
                })?
                .inputs
        }
        None => blank_form(),
    };

    if let Some(v) = args.ticker {
        form.ticker = v;
    }
    if let Some(v) = args.initial_investment {
        form.initial_investment = validation::sanitize_numeric_input(&v);
    }
    if let Some(v) = args.share_price {
        form.share_price = validation::sanitize_numeric_input(&v);
    }
    if let Some(v) = args.annual_dividend {
        form.annual_dividend = validation::sanitize_numeric_input(&v);
    }
    if let Some(v) = args.monthly_contribution {
        form.monthly_contribution = validation::sanitize_numeric_input(&v);
    }
    if let Some(v) = args.dividend_growth_rate {
        form.dividend_growth_rate = validation::parse_percentage_input(&v);
    }
    if let Some(v) = args.share_appreciation_rate {
        form.share_appreciation_rate = validation::parse_percentage_input(&v);
    }
    if let Some(v) = args.tax_rate {
        form.tax_rate = validation::parse_percentage_input(&v);
    }
    if let Some(v) = args.years {
        form.years_to_calculate = v.trim().to_string();
    }
    if args.no_reinvest {
        form.reinvest_dividends = false;
    }
    Ok(form)
}

/// Required fields start empty so validation names each one that is missing.
fn blank_form() -> DripFormInput {
    DripFormInput {
        ticker: String::new(),
        initial_investment: String::new(),
        share_price: String::new(),
        annual_dividend: String::new(),
        monthly_contribution: "0".into(),
        dividend_growth_rate: "0".into(),
        share_appreciation_rate: "0".into(),
        tax_rate: "0".into(),
        years_to_calculate: String::new(),
        reinvest_dividends: true,
    }
}
