use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{breakdown_field, cell_text};

/// Format output as tables using the tabled crate.
///
/// Scalar fields of the result go in a Field/Value table, a nested object
/// (such as a projection summary) gets its own Field/Value table, and a
/// per-period breakdown is printed as one row per period.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => {
                print_result_tables(result);
                print_envelope_notes(map);
            }
            _ => match map.get("results") {
                Some(Value::Array(rows)) => print_rows(rows),
                _ => print_fields(map),
            },
        },
        Value::Array(rows) => print_rows(rows),
        Value::String(text) => println!("{}", text),
        _ => println!("{}", value),
    }
}

fn print_result_tables(result: &Map<String, Value>) {
    let scalars: Map<String, Value> = result
        .iter()
        .filter(|(_, v)| !v.is_object() && !is_row_array(v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    if !scalars.is_empty() {
        print_fields(&scalars);
    }

    for (key, val) in result {
        if let Value::Object(nested) = val {
            println!("\n{}:", key);
            print_fields(nested);
        }
    }

    if let Some((key, rows)) = breakdown_field(result) {
        println!("\n{}:", key);
        print_rows(rows);
    }
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &cell_text(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        if rows.is_empty() {
            println!("(empty)");
        }
        for item in rows {
            println!("{}", cell_text(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(cell_text).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

fn is_row_array(value: &Value) -> bool {
    matches!(value, Value::Array(arr) if matches!(arr.first(), Some(Value::Object(_))))
}
