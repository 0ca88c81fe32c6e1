use crate::core::aggregate::TechnicianTotals;
use crate::core::ingest::canonical_technician;
use crate::domain::model::{TechnicianSummary, UnrosteredTechnician};
use std::collections::{HashMap, HashSet};

/// The fixed crew every report must list, in case-insensitive alphabetical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    technicians: Vec<String>,
}

impl Roster {
    /// Canonicalizes, drops blanks and duplicates, then sorts. Canonical names are
    /// upper-cased, so the order is case-insensitive.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut technicians: Vec<String> = names
            .into_iter()
            .map(|name| canonical_technician(name.as_ref()))
            .filter(|name| !name.is_empty())
            .filter(|name| seen.insert(name.clone()))
            .collect();
        technicians.sort();
        Self { technicians }
    }

    pub fn technicians(&self) -> &[String] {
        &self.technicians
    }

    pub fn len(&self) -> usize {
        self.technicians.len()
    }

    pub fn is_empty(&self) -> bool {
        self.technicians.is_empty()
    }

    pub fn contains(&self, technician: &str) -> bool {
        self.technicians.iter().any(|t| t == technician)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub summary: Vec<TechnicianSummary>,
    pub unrostered: Vec<UnrosteredTechnician>,
}

/// Two decimals, halves to even (`0.125` → `0.12`, `0.375` → `0.38`).
pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round_ties_even() / 100.0
}

/// Left join of the aggregated totals onto the roster.
///
/// Every roster entry yields exactly one row (zeros when it has no data).
/// Technicians absent from the roster are left out of the summary and
/// returned separately in `unrostered`.
pub fn merge(
    roster: &Roster,
    aggregated: &HashMap<String, TechnicianTotals>,
    sort_descending: bool,
) -> MergeOutcome {
    let mut summary: Vec<TechnicianSummary> = roster
        .technicians()
        .iter()
        .map(|technician| {
            let totals = aggregated.get(technician).copied().unwrap_or_default();
            TechnicianSummary {
                technician: technician.clone(),
                work_orders_completed: totals.distinct_work_orders,
                total_hours: round_hours(totals.total_hours),
            }
        })
        .collect();

    if sort_descending {
        // stable: ties keep roster order
        summary.sort_by(|a, b| b.total_hours.total_cmp(&a.total_hours));
    }

    let mut unrostered: Vec<UnrosteredTechnician> = aggregated
        .iter()
        .filter(|(technician, _)| !roster.contains(technician))
        .map(|(technician, totals)| UnrosteredTechnician {
            technician: technician.clone(),
            work_orders: totals.distinct_work_orders,
            total_hours: round_hours(totals.total_hours),
        })
        .collect();
    unrostered.sort_by(|a, b| a.technician.cmp(&b.technician));

    for tech in &unrostered {
        tracing::warn!(
            "Technician {} is not on the roster; {:.2}h across {} work orders excluded from the summary",
            tech.technician,
            tech.total_hours,
            tech.work_orders
        );
    }

    MergeOutcome {
        summary,
        unrostered,
    }
}
