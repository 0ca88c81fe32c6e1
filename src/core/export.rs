use crate::domain::model::{BatchReport, TechnicianSummary};
use crate::utils::error::{HoursError, Result};
use rust_xlsxwriter::{Format, Workbook};
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const SUMMARY_HEADERS: [&str; 3] = [
    "Technician",
    "Work_Orders_Completed",
    "Total_Hours_Worked",
];

pub const SUMMARY_FILE_STEM: &str = "technician_summary";
pub const SUMMARY_SHEET: &str = "Summary";
pub const BUNDLE_FILE: &str = "technician_report.zip";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Tsv,
    Xlsx,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "xlsx" => Ok(Self::Xlsx),
            "json" => Ok(Self::Json),
            other => Err(HoursError::InvalidConfigValueError {
                field: "output_formats".to_string(),
                value: other.to_string(),
                reason: "Unsupported format. Valid formats: csv, tsv, xlsx, json".to_string(),
            }),
        }
    }

    /// Output file name for this format; JSON is named after the chart.
    pub fn file_name(&self, report: &BatchReport) -> String {
        match self {
            Self::Csv => format!("{}.csv", SUMMARY_FILE_STEM),
            Self::Tsv => format!("{}.tsv", SUMMARY_FILE_STEM),
            Self::Xlsx => format!("{}.xlsx", SUMMARY_FILE_STEM),
            Self::Json => format!("{}.json", report.chart.file_stem()),
        }
    }

    pub fn render(&self, report: &BatchReport) -> Result<Vec<u8>> {
        match self {
            Self::Csv => summary_delimited(&report.summary, b','),
            Self::Tsv => summary_delimited(&report.summary, b'\t'),
            Self::Xlsx => summary_xlsx(&report.summary),
            Self::Json => Ok(report_json(report)?.into_bytes()),
        }
    }
}

pub fn summary_delimited(summary: &[TechnicianSummary], delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(SUMMARY_HEADERS)?;
    for row in summary {
        writer.write_record([
            row.technician.clone(),
            row.work_orders_completed.to_string(),
            format!("{:.2}", row.total_hours),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| HoursError::IoError(e.into_error()))
}

pub fn summary_xlsx(summary: &[TechnicianSummary]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let hours_format = Format::new().set_num_format("0.00");

    let sheet = workbook.add_worksheet();
    sheet.set_name(SUMMARY_SHEET)?;

    for (col, header) in SUMMARY_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (i, row) in summary.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string(r, 0, &row.technician)?;
        sheet.write_number(r, 1, row.work_orders_completed as f64)?;
        sheet.write_number_with_format(r, 2, row.total_hours, &hours_format)?;
    }

    sheet.set_column_width(0, 20)?;
    sheet.set_column_width(1, 24)?;
    sheet.set_column_width(2, 20)?;

    Ok(workbook.save_to_buffer()?)
}

pub fn report_json(report: &BatchReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Packs already-rendered files into a single ZIP archive.
pub fn bundle(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for (name, data) in files {
        zip.start_file(name.as_str(), SimpleFileOptions::default())?;
        zip.write_all(data)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
