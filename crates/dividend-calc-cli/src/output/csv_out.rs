use serde_json::{Map, Value};
use std::io;

use super::{breakdown_field, cell_text};

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
///
/// A result carrying a per-period breakdown (projection years, savings
/// months) is written as that breakdown, one row per period. Other results
/// become a two-column field/value listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => match breakdown_field(result) {
                Some((_, rows)) => write_rows(&mut wtr, rows),
                None => write_fields(&mut wtr, result),
            },
            _ => match map.get("results") {
                Some(Value::Array(rows)) => write_rows(&mut wtr, rows),
                _ => write_fields(&mut wtr, map),
            },
        },
        Value::Array(rows) => write_rows(&mut wtr, rows),
        _ => {
            let _ = wtr.write_record([&cell_text(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_fields(wtr: &mut StdoutWriter<'_>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &cell_text(val)]);
    }
}

fn write_rows(wtr: &mut StdoutWriter<'_>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            let _ = wtr.write_record([&cell_text(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(cell_text).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
