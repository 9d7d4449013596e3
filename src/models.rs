use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{KpiError, Result};

/// Raw shipment-plan row from a CSV table
#[derive(Debug, Deserialize)]
pub struct ShipmentCsvRecord {
    pub date: String,
    pub target: f64,
    pub actual: f64,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Raw DPC row, using the column names of the plant export
#[derive(Debug, Deserialize)]
pub struct DpcCsvRecord {
    #[serde(rename = "VIN")]
    pub vin: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "DPC Target (%)")]
    pub dpc_target: f64,
    #[serde(rename = "DPC Actual (%)")]
    pub dpc_actual: f64,
}

/// One RSP target/actual row for a vehicle on a given day.
///
/// `vin` and `model` are carried through the aggregation untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    pub date: NaiveDate,
    pub target: f64,
    pub actual: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ShipmentRecord {
    pub fn new(date: NaiveDate, target: f64, actual: f64) -> Self {
        Self {
            date,
            target,
            actual,
            vin: None,
            model: None,
        }
    }
}

/// Defect-per-car measurement for one vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DpcRecord {
    pub vin: String,
    pub model: String,
    pub date: NaiveDate,
    pub dpc_target: f64,
    pub dpc_actual: f64,
}

/// Parse a calendar date, accepting `YYYY-MM-DD` and `YYYY/MM/DD`.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y/%m/%d"))
        .map_err(|_| KpiError::InvalidDate(raw.to_string()))
}

/// Reject `NaN` and infinities, which `f64` parsing otherwise accepts.
fn finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(KpiError::NonFiniteValue { field, value })
    }
}

impl ShipmentCsvRecord {
    pub fn to_record(&self) -> Result<ShipmentRecord> {
        Ok(ShipmentRecord {
            date: parse_date(&self.date)?,
            target: finite("target", self.target)?,
            actual: finite("actual", self.actual)?,
            vin: self.vin.clone().filter(|v| !v.is_empty()),
            model: self.model.clone().filter(|m| !m.is_empty()),
        })
    }
}

impl DpcCsvRecord {
    pub fn to_record(&self) -> Result<DpcRecord> {
        Ok(DpcRecord {
            vin: self.vin.clone(),
            model: self.model.clone(),
            date: parse_date(&self.date)?,
            dpc_target: finite("DPC Target (%)", self.dpc_target)?,
            dpc_actual: finite("DPC Actual (%)", self.dpc_actual)?,
        })
    }
}
