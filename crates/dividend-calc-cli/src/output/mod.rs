pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod report;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
        OutputFormat::Report => report::print_report(value),
        OutputFormat::ReportCsv => report::print_report_csv(value),
    }
}

/// Render a JSON leaf for a single table or CSV cell.
pub(crate) fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(cell_text).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// The first field holding a non-empty array of objects, e.g. the yearly
/// results of a projection or a savings plan's monthly breakdown.
pub(crate) fn breakdown_field(map: &serde_json::Map<String, Value>) -> Option<(&str, &[Value])> {
    map.iter().find_map(|(key, val)| match val {
        Value::Array(arr) if matches!(arr.first(), Some(Value::Object(_))) => {
            Some((key.as_str(), arr.as_slice()))
        }
        _ => None,
    })
}
