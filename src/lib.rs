//! Quality-KPI engine for vehicle manufacturing dashboards.
//!
//! The engine modules ([`calendar`], [`rsp`], [`defects`], [`dpc`], [`dms`]) are pure
//! functions over caller-supplied data. [`import`] parses CSV tables and
//! [`api`] exposes everything over REST.

pub mod api;
pub mod calendar;
pub mod defects;
pub mod dms;
pub mod dpc;
pub mod error;
pub mod import;
pub mod models;
pub mod rsp;

pub use calendar::last_working_day;
pub use defects::defect_comparison;
pub use error::KpiError;
pub use rsp::rsp_cumulative;
