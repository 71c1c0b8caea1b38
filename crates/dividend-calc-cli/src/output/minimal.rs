use serde_json::Value;

use super::cell_text;

/// Headline fields, most specific first. The first one present in the result
/// (or in its `summary`) is printed on its own.
const PRIORITY_KEYS: [&str; 8] = [
    "final_portfolio_value",
    "valid",
    "annualized_return",
    "required_monthly",
    "yield_on_cost",
    "months_to_goal",
    "total_return_percent",
    "key",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    // Listings print their row count
    if let Some(Value::Array(rows)) = value.get("results") {
        println!("{}", rows.len());
        return;
    }

    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::String(text) = result_obj {
        println!("{}", text);
        return;
    }

    if let Value::Object(map) = result_obj {
        let summary = map.get("summary").and_then(Value::as_object);
        for key in PRIORITY_KEYS {
            let hit = map
                .get(key)
                .or_else(|| summary.and_then(|s| s.get(key)))
                .filter(|v| !v.is_null());
            if let Some(val) = hit {
                println!("{}", cell_text(val));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, cell_text(val));
            return;
        }
    }

    println!("{}", cell_text(result_obj));
}
