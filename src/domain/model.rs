use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One spreadsheet cell as the reader saw it, before any interpretation.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
    Duration(TimeDelta),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
}

impl CellValue {
    /// Null-like cells: empty, or a float NaN.
    pub fn is_null(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Number(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Text form used for identifiers (technician, work order).
    pub fn to_text(&self) -> Option<String> {
        if self.is_null() {
            return None;
        }
        Some(self.to_string())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(v) => write!(f, "{}", v),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Duration(d) => write!(f, "{}", d),
            CellValue::DateTime(dt) => write!(f, "{}", dt),
            CellValue::Time(t) => write!(f, "{}", t),
        }
    }
}

/// A tabular dataset: header row plus typed data rows.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }
}

/// Header names of the three columns every labor export must carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSpec {
    pub technician: String,
    pub work_order: String,
    pub duration: String,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            technician: "Technician".to_string(),
            work_order: "Work order for labor reporting".to_string(),
            duration: "Labor reporting time (duration)".to_string(),
        }
    }
}

impl ColumnSpec {
    pub fn required(&self) -> [&str; 3] {
        [
            self.technician.as_str(),
            self.work_order.as_str(),
            self.duration.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub technician: CellValue,
    pub work_order: CellValue,
    pub duration: CellValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub technician: String,
    pub work_order: Option<String>,
    pub hours: f64,
}

/// Output of the extract phase: every ingested row plus what went wrong per dataset.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub rows: Vec<NormalizedRecord>,
    pub datasets_ingested: usize,
    pub issues: Vec<DatasetIssue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetIssue {
    pub dataset: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicianSummary {
    #[serde(rename = "Technician")]
    pub technician: String,
    #[serde(rename = "Work_Orders_Completed")]
    pub work_orders_completed: usize,
    #[serde(rename = "Total_Hours_Worked")]
    pub total_hours: f64,
}

/// A technician found in the uploaded data but not on the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnrosteredTechnician {
    pub technician: String,
    pub work_orders: usize,
    pub total_hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "band", rename_all = "snake_case")]
pub enum ColorBand {
    UnderThreshold,
    Gradient { position: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchMetrics {
    pub total_technicians: usize,
    pub total_hours: f64,
    pub average_hours: f64,
    pub total_work_orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub technician: String,
    pub hours: f64,
    pub color: String,
    pub band: ColorBand,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceMarker {
    pub hours: f64,
    pub label: String,
}

/// What a renderer needs to draw the horizontal bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub max_hours: f64,
    pub target: ReferenceMarker,
    pub bars: Vec<ChartBar>,
}

/// Output of the transform phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub summary: Vec<TechnicianSummary>,
    pub metrics: BatchMetrics,
    pub chart: ChartSpec,
    pub issues: Vec<DatasetIssue>,
    pub unrostered: Vec<UnrosteredTechnician>,
}
