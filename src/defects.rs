//! Today-vs-previous defect snapshot comparison.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Category name to defect metric at one point in time.
pub type DefectSnapshot = HashMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub category: String,
    pub today: f64,
    pub previous: f64,
    /// Positive when defects increased.
    pub delta: f64,
}

/// Metric for `category`, or `0.0` when the snapshot does not list it.
pub fn metric_or_zero(snapshot: &DefectSnapshot, category: &str) -> f64 {
    snapshot.get(category).copied().unwrap_or(0.0)
}

/// One row per category seen in either snapshot, sorted by category name.
pub fn defect_comparison(today: &DefectSnapshot, previous: &DefectSnapshot) -> Vec<ComparisonRow> {
    let categories: BTreeSet<&str> = today
        .keys()
        .chain(previous.keys())
        .map(String::as_str)
        .collect();

    categories
        .into_iter()
        .map(|category| {
            let today = metric_or_zero(today, category);
            let previous = metric_or_zero(previous, category);
            ComparisonRow {
                category: category.to_string(),
                today,
                previous,
                delta: today - previous,
            }
        })
        .collect()
}
