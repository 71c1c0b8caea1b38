use serde_json::Value;

use super::{csv_out, table};

/// Print a pre-rendered Markdown report. Commands without a report
/// rendering fall back to the table view.
pub fn print_report(value: &Value) {
    match value {
        Value::String(markdown) => println!("{}", markdown),
        _ => table::print_table(value),
    }
}

/// Print a pre-rendered CSV report as is; other commands print their
/// result as plain CSV.
pub fn print_report_csv(value: &Value) {
    match value {
        Value::String(csv) => print!("{}", csv),
        _ => csv_out::print_csv(value),
    }
}
