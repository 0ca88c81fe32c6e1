use crate::core::duration;
use crate::domain::model::{CellValue, ColumnSpec, Dataset, NormalizedRecord, RawRecord};
use crate::utils::error::{HoursError, Result};

/// Trimmed, upper-cased technician key used for grouping and the roster join.
pub fn canonical_technician(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Validates one dataset against the required columns and returns its cleaned rows.
///
/// A dataset missing any required column is rejected as a whole. Rows without a
/// technician or a duration value are dropped.
pub fn ingest(dataset: &Dataset, columns: &ColumnSpec) -> Result<Vec<NormalizedRecord>> {
    let required = columns.required();
    let indices = required.map(|name| dataset.column_index(name));

    let [Some(tech_idx), Some(wo_idx), Some(dur_idx)] = indices else {
        let missing = required
            .iter()
            .zip(indices)
            .filter(|(_, idx)| idx.is_none())
            .map(|(name, _)| name.to_string())
            .collect();
        return Err(HoursError::SchemaError {
            dataset: dataset.name.clone(),
            missing,
        });
    };

    let mut rows = Vec::with_capacity(dataset.rows.len());
    let mut dropped = 0usize;

    for row in &dataset.rows {
        let raw = RawRecord {
            technician: cell(row, tech_idx),
            work_order: cell(row, wo_idx),
            duration: cell(row, dur_idx),
        };

        match normalize_record(&raw) {
            Some(record) => rows.push(record),
            None => dropped += 1,
        }
    }

    tracing::debug!(
        "Ingested {} rows from '{}' ({} dropped for missing technician or duration)",
        rows.len(),
        dataset.name,
        dropped
    );

    Ok(rows)
}

pub fn normalize_record(raw: &RawRecord) -> Option<NormalizedRecord> {
    if raw.duration.is_null() {
        return None;
    }
    let technician = canonical_technician(&raw.technician.to_text()?);
    if technician.is_empty() {
        return None;
    }

    Some(NormalizedRecord {
        technician,
        work_order: raw.work_order.to_text(),
        hours: duration::normalize(&raw.duration),
    })
}

fn cell(row: &[CellValue], idx: usize) -> CellValue {
    row.get(idx).cloned().unwrap_or(CellValue::Empty)
}
