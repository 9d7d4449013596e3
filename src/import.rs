//! CSV table parsing for RSP and DPC data.
//!
//! Readers are supplied by the caller; this module never touches the
//! filesystem itself.

use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::io::Read;
use tracing::{info, warn};

use crate::error::{KpiError, Result};
use crate::models::{DpcCsvRecord, DpcRecord, ShipmentCsvRecord, ShipmentRecord};

pub const RSP_COLUMNS: [&str; 3] = ["date", "target", "actual"];
pub const DPC_COLUMNS: [&str; 5] = ["VIN", "Model", "Date", "DPC Target (%)", "DPC Actual (%)"];

/// Read shipment-plan rows (`date,target,actual[,vin,model]`).
pub fn read_shipment_records<R: Read>(reader: R) -> Result<Vec<ShipmentRecord>> {
    let raw: Vec<ShipmentCsvRecord> = read_table(reader, &RSP_COLUMNS)?;
    let records = raw
        .iter()
        .enumerate()
        .map(|(i, r)| r.to_record().map_err(|e| row_error(i, e)))
        .collect::<Result<Vec<_>>>()?;
    info!("Parsed {} RSP records", records.len());
    Ok(records)
}

/// Read DPC rows using the plant export column names.
pub fn read_dpc_records<R: Read>(reader: R) -> Result<Vec<DpcRecord>> {
    let raw: Vec<DpcCsvRecord> = read_table(reader, &DPC_COLUMNS)?;
    let records = raw
        .iter()
        .enumerate()
        .map(|(i, r)| r.to_record().map_err(|e| row_error(i, e)))
        .collect::<Result<Vec<_>>>()?;
    info!("Parsed {} DPC records", records.len());
    Ok(records)
}

fn read_table<R: Read, T: DeserializeOwned>(reader: R, required: &[&str]) -> Result<Vec<T>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: BTreeSet<String> = reader.headers()?.iter().map(str::to_string).collect();
    if !required.iter().all(|c| headers.contains(*c)) {
        let mut expected: Vec<String> = required.iter().map(|c| c.to_string()).collect();
        expected.sort();
        warn!("CSV header {:?} is missing required columns", headers);
        return Err(KpiError::MissingColumns(expected));
    }

    let mut rows = Vec::new();
    for (i, result) in reader.deserialize().enumerate() {
        let row: T = result.map_err(|e| KpiError::InvalidRow {
            row: i + 1,
            message: e.to_string(),
        })?;
        rows.push(row);
    }
    Ok(rows)
}

fn row_error(index: usize, err: KpiError) -> KpiError {
    KpiError::InvalidRow {
        row: index + 1,
        message: err.to_string(),
    }
}
