//! Turns uploaded file bytes into a [`Dataset`].

use crate::core::duration::parse_duration_text;
use crate::domain::model::{CellValue, Dataset};
use crate::utils::error::{HoursError, Result};
use calamine::{Data, DataType, Reader};
use chrono::{DateTime, NaiveDateTime};
use std::io::Cursor;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Tsv,
    Json,
    Workbook,
}

impl DatasetFormat {
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = Path::new(path).extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "tsv" => Some(Self::Tsv),
            "json" => Some(Self::Json),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Workbook),
            _ => None,
        }
    }
}

/// Reads a dataset, picking the parser from the file extension of `name`.
pub fn read_dataset(name: &str, bytes: &[u8]) -> Result<Dataset> {
    let format = DatasetFormat::from_path(name)
        .ok_or_else(|| HoursError::dataset_read(name, "unsupported file extension"))?;

    match format {
        DatasetFormat::Csv => read_delimited(name, bytes, b','),
        DatasetFormat::Tsv => read_delimited(name, bytes, b'\t'),
        DatasetFormat::Json => read_json(name, bytes),
        DatasetFormat::Workbook => read_workbook(name, bytes),
    }
}

fn read_delimited(name: &str, bytes: &[u8], delimiter: u8) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| HoursError::dataset_read(name, e))?
        .iter()
        .map(str::to_string)
        .collect();
    let mut dataset = Dataset::new(name, headers);

    for record in reader.records() {
        let record = record.map_err(|e| HoursError::dataset_read(name, e))?;
        dataset.rows.push(record.iter().map(infer_text_cell).collect());
    }

    Ok(dataset)
}

/// Delimited files carry no types: blanks are null, numbers are numbers.
fn infer_text_cell(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => CellValue::Number(v),
        _ => CellValue::Text(raw.to_string()),
    }
}

fn read_json(name: &str, bytes: &[u8]) -> Result<Dataset> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| HoursError::dataset_read(name, e))?;

    let serde_json::Value::Array(items) = value else {
        return Err(HoursError::dataset_read(
            name,
            "expected a JSON array of row objects",
        ));
    };

    let mut headers: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(items.len());
    for item in items {
        let serde_json::Value::Object(obj) = item else {
            return Err(HoursError::dataset_read(
                name,
                "every JSON row must be an object",
            ));
        };
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let mut dataset = Dataset::new(name, headers);
    for obj in &objects {
        let row = dataset
            .headers
            .iter()
            .map(|h| obj.get(h).map(json_cell).unwrap_or(CellValue::Empty))
            .collect();
        dataset.rows.push(row);
    }

    Ok(dataset)
}

fn json_cell(value: &serde_json::Value) -> CellValue {
    match value {
        serde_json::Value::Null => CellValue::Empty,
        serde_json::Value::Bool(b) => CellValue::Bool(*b),
        serde_json::Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or(CellValue::Empty),
        serde_json::Value::String(s) => CellValue::Text(s.clone()),
        other => CellValue::Text(other.to_string()),
    }
}

fn read_workbook(name: &str, bytes: &[u8]) -> Result<Dataset> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| HoursError::dataset_read(name, e))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| HoursError::dataset_read(name, "workbook has no worksheets"))?
        .map_err(|e| HoursError::dataset_read(name, e))?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_row.iter().map(|c| c.to_string()).collect(),
        None => Vec::new(),
    };

    let mut dataset = Dataset::new(name, headers);
    for row in rows {
        dataset.rows.push(row.iter().map(workbook_cell).collect());
    }

    tracing::debug!(
        "Read {} rows from first worksheet of '{}'",
        dataset.rows.len(),
        name
    );

    Ok(dataset)
}

fn workbook_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::DateTime(dt) => {
            if dt.is_duration() {
                return cell
                    .as_duration()
                    .map(CellValue::Duration)
                    .unwrap_or(CellValue::Number(dt.as_f64()));
            }
            // time-only cells are stored as a serial below one day
            if dt.as_f64() < 1.0 {
                if let Some(t) = cell.as_time() {
                    return CellValue::Time(t);
                }
            }
            cell.as_datetime()
                .map(CellValue::DateTime)
                .unwrap_or(CellValue::Number(dt.as_f64()))
        }
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => parse_duration_text(s)
            .map(CellValue::Duration)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_local())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").ok())
}
