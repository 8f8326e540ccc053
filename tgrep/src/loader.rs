use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tablegrep::Dataset;

#[derive(Deserialize)]
#[serde(untagged)]
enum DatasetFile {
    Rows(Vec<Vec<Value>>),
    Table {
        #[serde(default)]
        headers: Vec<Value>,
        rows: Vec<Vec<Value>>,
    },
}

pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset {}", path.display()))?;
    parse_dataset(&text).with_context(|| format!("Failed to parse dataset {}", path.display()))
}

pub fn parse_dataset(text: &str) -> Result<Dataset> {
    let file: DatasetFile = serde_json::from_str(text)?;
    let (headers, rows) = match file {
        DatasetFile::Rows(rows) => (Vec::new(), rows),
        DatasetFile::Table { headers, rows } => (headers, rows),
    };
    let headers: Vec<String> = headers
        .into_iter()
        .map(|value| cell(value).unwrap_or_default())
        .collect();
    let records: Vec<Vec<Option<String>>> = rows
        .into_iter()
        .map(|row| row.into_iter().map(cell).collect())
        .collect();
    Ok(Dataset::from_records(headers, records))
}

// Numbers and booleans keep their JSON spelling.
fn cell(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}
