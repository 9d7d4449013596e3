//! DPC (defect-per-car) monitoring views.

use chrono::NaiveDate;
use csv::WriterBuilder;

use crate::error::Result;
use crate::models::DpcRecord;

pub const EXPORT_HEADER: [&str; 4] = ["VIN", "Model", "DPC Target (%)", "DPC Actual (%)"];

/// Records dated within `start..=end`, in input order.
pub fn dpc_monitoring(records: &[DpcRecord], start: NaiveDate, end: NaiveDate) -> Vec<DpcRecord> {
    records
        .iter()
        .filter(|r| r.date >= start && r.date <= end)
        .cloned()
        .collect()
}

/// Render records as the dashboard CSV, newest first.
pub fn dpc_csv_export(records: &[DpcRecord]) -> Result<String> {
    let mut ordered: Vec<&DpcRecord> = records.iter().collect();
    ordered.sort_by(|a, b| b.date.cmp(&a.date));

    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;
    for r in ordered {
        let target = r.dpc_target.to_string();
        let actual = r.dpc_actual.to_string();
        writer.write_record([r.vin.as_str(), r.model.as_str(), target.as_str(), actual.as_str()])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
