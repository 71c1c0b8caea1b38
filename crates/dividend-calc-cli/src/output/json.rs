use serde_json::Value;

/// Pretty-print JSON to stdout. A pre-rendered report is printed verbatim.
pub fn print_json(value: &Value) {
    if let Value::String(text) = value {
        println!("{}", text);
        return;
    }
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}
