use clap::Args;
use serde_json::{json, Value};

use dividend_calc_core::drip::presets::{self, Preset};

/// Arguments for listing presets
#[derive(Args)]
pub struct PresetsArgs {
    /// Show a single preset in full
    pub key: Option<String>,
}

pub fn run_presets(args: PresetsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(ref key) = args.key {
        let preset = presets::preset(key).ok_or_else(|| {
            format!(
                "unknown preset '{}' (available: {})",
                key,
                presets::preset_keys().join(", ")
            )
        })?;
        return Ok(json!({ "result": preset }));
    }

    let rows: Vec<Value> = presets::presets().iter().map(summary_row).collect();
    Ok(json!({ "results": rows }))
}

/// One flat row per preset so table and CSV output stay readable.
fn summary_row(preset: &Preset) -> Value {
    json!({
        "key": preset.key,
        "name": preset.name,
        "initial_investment": preset.inputs.initial_investment,
        "share_price": preset.inputs.share_price,
        "annual_dividend": preset.inputs.annual_dividend,
        "monthly_contribution": preset.inputs.monthly_contribution,
        "years": preset.inputs.years_to_calculate,
        "description": preset.description,
    })
}
