use serde_json::Value;

/// Print just the key answer from the output.
///
/// For a scored dataset that is one line per business (name, score,
/// category); for summaries, the first well-known headline field.
pub fn print_minimal(value: &Value) {
    match value {
        Value::Array(arr) => {
            for item in arr {
                if let Value::Object(map) = item {
                    println!(
                        "{}: {} ({})",
                        text_field(map, "name"),
                        text_field(map, "composite_score"),
                        text_field(map, "category")
                    );
                } else {
                    println!("{}", format_minimal(item));
                }
            }
        }
        Value::Object(map) => {
            // rendered report text wins; otherwise headline counters
            let priority_keys = [
                "rendered",
                "total_rows",
                "valid_rows",
                "top_composite",
                "avg_composite",
            ];
            for key in &priority_keys {
                if let Some(val) = map.get(*key) {
                    if !val.is_null() {
                        println!("{}", format_minimal(val));
                        return;
                    }
                }
            }
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, format_minimal(val));
            }
        }
        _ => println!("{}", format_minimal(value)),
    }
}

fn text_field(map: &serde_json::Map<String, Value>, key: &str) -> String {
    map.get(key).map(format_minimal).unwrap_or_default()
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
