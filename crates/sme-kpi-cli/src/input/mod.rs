pub mod file;
pub mod stdin;

use sme_kpi_core::RawTable;

/// Resolve the dataset for a command: an explicit `--input` path wins,
/// otherwise piped JSON on stdin.
pub fn load_table(path: Option<&str>) -> Result<RawTable, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_table(path);
    }
    if let Some(table) = stdin::read_stdin()? {
        return Ok(table);
    }
    Err("no dataset: pass --input <file.csv|file.json> or pipe JSON on stdin".into())
}

/// Convert a JSON value into a raw table. Accepts either the explicit
/// `{headers, rows}` shape or an array of flat objects.
pub fn json_to_table(value: serde_json::Value) -> Result<RawTable, Box<dyn std::error::Error>> {
    if value.is_object() {
        let table: RawTable = serde_json::from_value(value)?;
        return Ok(table);
    }

    let serde_json::Value::Array(items) = value else {
        return Err("expected a JSON object with headers/rows or an array of objects".into());
    };

    let mut maps = Vec::with_capacity(items.len());
    for item in &items {
        let Some(map) = item.as_object() else {
            return Err("dataset array must contain objects".into());
        };
        maps.push(map);
    }

    // union of keys across all rows, first-seen order
    let mut headers: Vec<String> = Vec::new();
    for map in &maps {
        for key in map.keys() {
            if !headers.iter().any(|h| h == key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = maps
        .iter()
        .map(|map| {
            headers
                .iter()
                .map(|h| map.get(h).map(cell_to_string).unwrap_or_default())
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn cell_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
