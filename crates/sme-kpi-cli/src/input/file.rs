use serde_json::Value;
use std::fs;
use std::path::Path;

use sme_kpi_core::RawTable;

/// Read a dataset file into a raw table. CSV is the spreadsheet path;
/// `.json` accepts either `{headers, rows}` or an array of flat objects.
pub fn read_table(path: &str) -> Result<RawTable, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    match canonical.extension().and_then(|e| e.to_str()) {
        Some("json") => read_json_table(&canonical),
        _ => read_csv_table(&canonical),
    }
}

fn read_csv_table(path: &Path) -> Result<RawTable, Box<dyn std::error::Error>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;

    let headers = reader
        .headers()
        .map_err(|e| format!("Failed to parse '{}': {}", path.display(), e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| format!("Failed to parse '{}': {}", path.display(), e))?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }

    Ok(RawTable { headers, rows })
}

fn read_json_table(path: &Path) -> Result<RawTable, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    let value: Value = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", path.display(), e))?;
    super::json_to_table(value)
}

/// Resolve and validate the path.
fn resolve_path(path: &str) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }
    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}
