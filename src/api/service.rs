//! Shared business logic for the KPI API
//!
//! Handlers parse request payloads into engine types and call through this
//! service. Nothing here is persisted between calls.

use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::info;

use crate::calendar;
use crate::defects::{self, ComparisonRow, DefectSnapshot};
use crate::dms::{self, DocLink, QualityDoc};
use crate::dpc;
use crate::error::Result;
use crate::import;
use crate::models::{DpcRecord, ShipmentRecord};
use crate::rsp::{self, RspCumulative};

#[derive(Debug, Clone)]
pub struct DefectComparison {
    pub reference_date: NaiveDate,
    pub last_working_day: NaiveDate,
    pub rows: Vec<ComparisonRow>,
}

pub struct KpiService {
    plant_holidays: HashSet<NaiveDate>,
}

impl KpiService {
    pub fn new(plant_holidays: HashSet<NaiveDate>) -> Self {
        Self { plant_holidays }
    }

    /// Holidays observed by the plant on every request.
    pub fn plant_holidays(&self) -> &HashSet<NaiveDate> {
        &self.plant_holidays
    }

    pub fn rsp_cumulative(&self, records: &[ShipmentRecord], start: NaiveDate, end: NaiveDate) -> RspCumulative {
        let result = rsp::rsp_cumulative(records, start, end);
        info!(
            "RSP {}..{}: {} rows, achievement {:.2}%",
            start, end, result.summary.days, result.summary.achievement_pct
        );
        result
    }

    pub fn rsp_from_csv(&self, body: &str, start: NaiveDate, end: NaiveDate) -> Result<RspCumulative> {
        let records = import::read_shipment_records(body.as_bytes())?;
        Ok(self.rsp_cumulative(&records, start, end))
    }

    /// Compare two snapshots and resolve the previous working day.
    ///
    /// Request holidays are merged with the plant calendar.
    pub fn compare_defects(
        &self,
        reference_date: NaiveDate,
        holidays: &HashSet<NaiveDate>,
        today: &DefectSnapshot,
        previous: &DefectSnapshot,
    ) -> Result<DefectComparison> {
        let merged: HashSet<NaiveDate> = self.plant_holidays.union(holidays).copied().collect();
        let last_working_day = calendar::last_working_day(reference_date, &merged)?;
        let rows = defects::defect_comparison(today, previous);
        info!(
            "Compared {} defect categories for {} (previous working day {})",
            rows.len(),
            reference_date,
            last_working_day
        );
        Ok(DefectComparison {
            reference_date,
            last_working_day,
            rows,
        })
    }

    pub fn dpc_monitoring(&self, records: &[DpcRecord], start: NaiveDate, end: NaiveDate) -> Vec<DpcRecord> {
        let data = dpc::dpc_monitoring(records, start, end);
        info!("DPC {}..{}: {} of {} records", start, end, data.len(), records.len());
        data
    }

    /// Validate a DPC upload and return the number of rows it holds.
    pub fn validate_dpc_csv(&self, body: &str) -> Result<usize> {
        Ok(import::read_dpc_records(body.as_bytes())?.len())
    }

    pub fn dpc_export(&self, records: &[DpcRecord]) -> Result<String> {
        dpc::dpc_csv_export(records)
    }

    pub fn search_docs(&self, docs: &[QualityDoc], vin: &str) -> Vec<DocLink> {
        let links = dms::search_docs(docs, vin);
        info!("Found {} documents for VIN {}", links.len(), vin);
        links
    }
}

impl Default for KpiService {
    fn default() -> Self {
        Self::new(HashSet::new())
    }
}
