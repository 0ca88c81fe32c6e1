use crate::core::color::color_for;
use crate::domain::model::{BatchMetrics, ChartBar, ChartSpec, ReferenceMarker, TechnicianSummary};

/// Weekly hours target drawn as a reference line on the chart.
pub const TARGET_HOURS: f64 = 40.0;

/// Used as the batch maximum when the summary has no rows.
const EMPTY_BATCH_MAX_HOURS: f64 = 40.0;

impl BatchMetrics {
    pub fn from_summary(summary: &[TechnicianSummary]) -> Self {
        let total_technicians = summary.len();
        let total_hours: f64 = summary.iter().map(|s| s.total_hours).sum();
        let average_hours = if total_technicians == 0 {
            0.0
        } else {
            total_hours / total_technicians as f64
        };

        Self {
            total_technicians,
            total_hours,
            average_hours,
            total_work_orders: summary.iter().map(|s| s.work_orders_completed).sum(),
        }
    }
}

impl ChartSpec {
    pub fn from_summary(title: &str, summary: &[TechnicianSummary]) -> Self {
        let max_hours = max_hours(summary);

        let bars = summary
            .iter()
            .map(|row| {
                let band = color_for(row.total_hours, max_hours);
                ChartBar {
                    technician: row.technician.clone(),
                    hours: row.total_hours,
                    color: band.hex(),
                    band,
                    label: format!("{:.2}", row.total_hours),
                }
            })
            .collect();

        Self {
            title: title.to_string(),
            max_hours,
            target: ReferenceMarker {
                hours: TARGET_HOURS,
                label: format!("Target ({}h)", TARGET_HOURS),
            },
            bars,
        }
    }

    /// File stem for the chart artifact: spaces to underscores, lower-cased.
    pub fn file_stem(&self) -> String {
        chart_file_stem(&self.title)
    }
}

pub fn chart_file_stem(title: &str) -> String {
    title.replace(' ', "_").to_lowercase()
}

fn max_hours(summary: &[TechnicianSummary]) -> f64 {
    summary
        .iter()
        .map(|s| s.total_hours)
        .reduce(f64::max)
        .unwrap_or(EMPTY_BATCH_MAX_HOURS)
}
