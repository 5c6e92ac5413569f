use serde_json::Value;
use tabled::{builder::Builder, Table};

/// Format output as a table using the tabled crate.
///
/// An array of records becomes one table; an object becomes a field/value
/// table, with any array-of-objects fields rendered as their own titled
/// sub-tables (sectors, best/attention lists, and so on).
pub fn print_table(value: &Value) {
    match value {
        Value::Array(arr) => print_array_table(arr),
        Value::Object(map) => {
            let mut scalar_rows: Vec<(&str, String)> = Vec::new();
            let mut sections: Vec<(&str, &Vec<Value>)> = Vec::new();

            for (key, val) in map {
                match val {
                    Value::Array(arr) if arr.first().map(Value::is_object).unwrap_or(false) => {
                        sections.push((key.as_str(), arr));
                    }
                    Value::Object(_) => {
                        print_section_heading(key);
                        print_table(val);
                    }
                    other => scalar_rows.push((key.as_str(), format_value(other))),
                }
            }

            if !scalar_rows.is_empty() {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                for (key, val) in scalar_rows {
                    builder.push_record([key, &val]);
                }
                println!("{}", Table::from(builder));
            }

            for (title, arr) in sections {
                print_section_heading(title);
                print_array_table(arr);
            }
        }
        _ => println!("{}", format_value(value)),
    }
}

fn print_section_heading(title: &str) {
    println!();
    println!("{title}");
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
