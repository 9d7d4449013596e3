//! Cumulative RSP (shipment plan) achievement over a date range.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::models::ShipmentRecord;

/// Headline figures of an RSP aggregation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RspSummary {
    /// Number of contributing rows, not distinct calendar dates.
    pub days: usize,
    pub cum_target: f64,
    pub cum_actual: f64,
    pub achievement_pct: f64,
}

impl RspSummary {
    pub const ZERO: RspSummary = RspSummary {
        days: 0,
        cum_target: 0.0,
        cum_actual: 0.0,
        achievement_pct: 0.0,
    };
}

/// Summary plus the rows that contributed to it, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RspCumulative {
    pub summary: RspSummary,
    pub rows: Vec<ShipmentRecord>,
}

impl RspCumulative {
    pub fn empty() -> Self {
        Self {
            summary: RspSummary::ZERO,
            rows: Vec::new(),
        }
    }
}

/// Achievement as a percentage; a zero target yields `0.0`.
pub fn achievement_pct(cum_actual: f64, cum_target: f64) -> f64 {
    if cum_target == 0.0 {
        0.0
    } else {
        cum_actual / cum_target * 100.0
    }
}

/// Aggregate RSP records with `start <= date <= end`.
///
/// An inverted range simply matches nothing.
pub fn rsp_cumulative(records: &[ShipmentRecord], start: NaiveDate, end: NaiveDate) -> RspCumulative {
    if records.is_empty() {
        debug!("rsp table is empty");
        return RspCumulative::empty();
    }

    let mut rows = Vec::new();
    let mut cum_target = 0.0;
    let mut cum_actual = 0.0;
    for record in records {
        if record.date < start || record.date > end {
            continue;
        }
        cum_target += record.target;
        cum_actual += record.actual;
        rows.push(record.clone());
    }

    debug!(
        %start,
        %end,
        total = records.len(),
        matched = rows.len(),
        "aggregated rsp records"
    );

    RspCumulative {
        summary: RspSummary {
            days: rows.len(),
            cum_target,
            cum_actual,
            achievement_pct: achievement_pct(cum_actual, cum_target),
        },
        rows,
    }
}
