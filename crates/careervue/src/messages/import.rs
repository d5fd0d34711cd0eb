use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::sentiment::MessageRecord;

/// Supported export formats for offline scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    Json,
}

impl ImportFormat {
    /// Guess from the file extension; anything that is not `.json` is read as CSV.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => ImportFormat::Json,
            _ => ImportFormat::Csv,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("unable to open message export: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed CSV export: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed JSON export: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Subject", default, deserialize_with = "empty_string_as_none")]
    subject: Option<String>,
    #[serde(
        alias = "Message",
        alias = "body",
        alias = "Body",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    message: Option<String>,
}

/// Reads `subject`/`message` columns; other columns are ignored.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<MessageRecord>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in csv_reader.deserialize::<CsvRow>() {
        let row = row?;
        records.push(MessageRecord {
            subject: row.subject,
            message: row.message,
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct JsonRow {
    #[serde(default)]
    subject: Value,
    #[serde(default, alias = "body")]
    message: Value,
}

/// Reads a JSON array of `{ "subject": ..., "message": ... }` objects.
///
/// Numbers and `true` are scored as their text; `null`, `false`, `0`, empty strings,
/// arrays and objects count as absent.
pub fn read_json<R: Read>(reader: R) -> Result<Vec<MessageRecord>, ImportError> {
    let rows: Vec<JsonRow> = serde_json::from_reader(reader)?;
    Ok(rows
        .into_iter()
        .map(|row| MessageRecord {
            subject: field_text(row.subject),
            message: field_text(row.message),
        })
        .collect())
}

fn field_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text),
        Value::Number(number) if number.as_f64() != Some(0.0) => Some(number.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

pub fn read_path(path: &Path, format: ImportFormat) -> Result<Vec<MessageRecord>, ImportError> {
    let reader = BufReader::new(File::open(path)?);
    match format {
        ImportFormat::Csv => read_csv(reader),
        ImportFormat::Json => read_json(reader),
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
