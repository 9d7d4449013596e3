use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised by the KPI engine and its tabular importers.
#[derive(Error, Debug)]
pub enum KpiError {
    #[error("no working day found within {searched_days} days before {reference}")]
    CalendarExhausted {
        reference: NaiveDate,
        searched_days: u32,
    },

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("{field} must be a finite number, got {value}")]
    NonFiniteValue { field: &'static str, value: f64 },

    #[error("CSV must include columns: {0:?}")]
    MissingColumns(Vec<String>),

    #[error("invalid row {row}: {message}")]
    InvalidRow { row: usize, message: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl KpiError {
    /// Whether the error stems from caller-supplied input rather than the engine.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, KpiError::Csv(e) if e.is_io_error())
    }
}

pub type Result<T> = std::result::Result<T, KpiError>;
