use crate::domain::model::NormalizedRecord;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TechnicianTotals {
    pub distinct_work_orders: usize,
    pub total_hours: f64,
}

#[derive(Debug, Default)]
struct Accumulator {
    work_orders: HashSet<String>,
    total_hours: f64,
}

/// Group-by on the canonical technician key across every ingested dataset.
///
/// Work orders are counted once per technician no matter how many rows or
/// files repeat them; hours are summed over every row.
#[derive(Debug, Default)]
pub struct Aggregator {
    groups: HashMap<String, Accumulator>,
    rows_seen: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend<'a>(&mut self, rows: impl IntoIterator<Item = &'a NormalizedRecord>) {
        for row in rows {
            let group = self.groups.entry(row.technician.clone()).or_default();
            if let Some(work_order) = &row.work_order {
                group.work_orders.insert(work_order.clone());
            }
            group.total_hours += row.hours;
            self.rows_seen += 1;
        }
    }

    pub fn rows_seen(&self) -> usize {
        self.rows_seen
    }

    pub fn finish(self) -> HashMap<String, TechnicianTotals> {
        self.groups
            .into_iter()
            .map(|(technician, acc)| {
                (
                    technician,
                    TechnicianTotals {
                        distinct_work_orders: acc.work_orders.len(),
                        total_hours: acc.total_hours,
                    },
                )
            })
            .collect()
    }
}

pub fn aggregate(rows: &[NormalizedRecord]) -> HashMap<String, TechnicianTotals> {
    let mut aggregator = Aggregator::new();
    aggregator.extend(rows);
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(tech: &str, wo: Option<&str>, hours: f64) -> NormalizedRecord {
        NormalizedRecord {
            technician: tech.to_string(),
            work_order: wo.map(str::to_string),
            hours,
        }
    }

    #[test]
    fn test_duplicate_work_orders_count_once_but_hours_add_up() {
        let rows = vec![
            row("A", Some("WO1"), 1.0),
            row("A", Some("WO1"), 12.0),
            row("A", Some("WO2"), 0.5),
            row("B", Some("WO2"), 2.0),
        ];

        let totals = aggregate(&rows);

        assert_eq!(totals.len(), 2);
        assert_eq!(
            totals["A"],
            TechnicianTotals {
                distinct_work_orders: 2,
                total_hours: 13.5
            }
        );
        assert_eq!(totals["B"].distinct_work_orders, 1);
        assert_eq!(totals["B"].total_hours, 2.0);
    }

    #[test]
    fn test_missing_work_order_adds_hours_only() {
        let totals = aggregate(&[row("A", None, 3.0), row("A", Some("WO7"), 1.0)]);
        assert_eq!(totals["A"].distinct_work_orders, 1);
        assert_eq!(totals["A"].total_hours, 4.0);
    }

    #[test]
    fn test_incremental_extend_across_datasets() {
        let first = vec![row("KAPIL_25", Some("WO1"), 4.0)];
        let second = vec![
            row("KAPIL_25", Some("WO1"), 4.0),
            row("KAPIL_25", Some("WO3"), 2.0),
        ];

        let mut aggregator = Aggregator::new();
        aggregator.extend(&first);
        aggregator.extend(&second);
        assert_eq!(aggregator.rows_seen(), 3);

        let totals = aggregator.finish();
        assert_eq!(totals["KAPIL_25"].distinct_work_orders, 2);
        assert_eq!(totals["KAPIL_25"].total_hours, 10.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[]).is_empty());
    }
}
