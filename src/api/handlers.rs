//! REST API handlers for the KPI engine
//!
//! These handlers use the shared KpiService.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

use super::service::{DefectComparison, KpiService};
use crate::defects::{ComparisonRow, DefectSnapshot};
use crate::dms::{DocLink, QualityDoc};
use crate::error::KpiError;
use crate::models::{parse_date, DpcRecord, ShipmentRecord};
use crate::rsp::{RspCumulative, RspSummary};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct RspResponse {
    pub summary: RspSummary,
    pub rows: Vec<ShipmentRecord>,
}

impl From<RspCumulative> for RspResponse {
    fn from(r: RspCumulative) -> Self {
        Self {
            summary: r.summary,
            rows: r.rows,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareResponse {
    pub reference_date: NaiveDate,
    pub last_working_day: NaiveDate,
    pub rows: Vec<ComparisonRow>,
}

impl From<DefectComparison> for CompareResponse {
    fn from(c: DefectComparison) -> Self {
        Self {
            reference_date: c.reference_date,
            last_working_day: c.last_working_day,
            rows: c.rows,
        }
    }
}

#[derive(Serialize)]
pub struct DpcMonitoringResponse {
    pub data: Vec<DpcRecord>,
}

#[derive(Serialize)]
pub struct ImportResponse {
    pub ok: bool,
    pub rows: usize,
}

#[derive(Serialize)]
pub struct DocSearchResponse {
    pub docs: Vec<DocLink>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
pub struct RangeQuery {
    pub from: String,
    pub to: String,
}

#[derive(Deserialize)]
pub struct RspRequest {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub records: Vec<ShipmentRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    pub reference_date: String,
    #[serde(default)]
    pub holidays: Vec<String>,
    #[serde(default)]
    pub today: DefectSnapshot,
    #[serde(default)]
    pub previous: DefectSnapshot,
}

#[derive(Deserialize)]
pub struct DpcMonitoringRequest {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub records: Vec<DpcRecord>,
}

#[derive(Deserialize)]
pub struct DpcExportRequest {
    #[serde(default)]
    pub records: Vec<DpcRecord>,
}

#[derive(Deserialize)]
pub struct DocSearchRequest {
    pub vin: String,
    #[serde(default)]
    pub docs: Vec<QualityDoc>,
}

// ============================================================================
// Handlers
// ============================================================================

pub type AppState = Arc<KpiService>;
type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, error: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse { error: error.into() }))
}

fn kpi_error(e: KpiError) -> ApiError {
    if e.is_client_error() {
        warn!("Rejected request: {}", e);
        error_response(StatusCode::BAD_REQUEST, e.to_string())
    } else {
        error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    }
}

fn parse_range(from: &str, to: &str) -> Result<(NaiveDate, NaiveDate), ApiError> {
    match (parse_date(from), parse_date(to)) {
        (Ok(start), Ok(end)) => Ok((start, end)),
        _ => Err(error_response(StatusCode::BAD_REQUEST, "Invalid dates")),
    }
}

/// GET /api/v1/health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"ok": true}))
}

/// POST /api/v1/rsp
pub async fn rsp_cumulative(
    State(service): State<AppState>,
    Json(req): Json<RspRequest>,
) -> Result<Json<RspResponse>, ApiError> {
    let (start, end) = parse_range(&req.from, &req.to)?;
    Ok(Json(service.rsp_cumulative(&req.records, start, end).into()))
}

/// POST /api/v1/rsp/csv?from=..&to=..
pub async fn rsp_cumulative_csv(
    State(service): State<AppState>,
    range: Option<Query<RangeQuery>>,
    body: String,
) -> Result<Json<RspResponse>, ApiError> {
    let Some(Query(range)) = range else {
        return Err(error_response(StatusCode::BAD_REQUEST, "Invalid dates"));
    };
    let (start, end) = parse_range(&range.from, &range.to)?;
    match service.rsp_from_csv(&body, start, end) {
        Ok(result) => Ok(Json(result.into())),
        Err(e) => Err(kpi_error(e)),
    }
}

/// POST /api/v1/defects/compare
pub async fn compare_defects(
    State(service): State<AppState>,
    Json(req): Json<CompareRequest>,
) -> Result<Json<CompareResponse>, ApiError> {
    let reference = parse_date(&req.reference_date)
        .map_err(|_| error_response(StatusCode::BAD_REQUEST, "Invalid dates"))?;
    let holidays = req
        .holidays
        .iter()
        .map(|h| parse_date(h))
        .collect::<Result<HashSet<_>, _>>()
        .map_err(|_| error_response(StatusCode::BAD_REQUEST, "Invalid dates"))?;

    match service.compare_defects(reference, &holidays, &req.today, &req.previous) {
        Ok(comparison) => Ok(Json(comparison.into())),
        Err(e) => Err(kpi_error(e)),
    }
}

/// POST /api/v1/dpc/monitoring
pub async fn dpc_monitoring(
    State(service): State<AppState>,
    Json(req): Json<DpcMonitoringRequest>,
) -> Result<Json<DpcMonitoringResponse>, ApiError> {
    let (start, end) = parse_range(&req.from, &req.to)?;
    Ok(Json(DpcMonitoringResponse {
        data: service.dpc_monitoring(&req.records, start, end),
    }))
}

/// POST /api/v1/dpc/import
pub async fn dpc_import(
    State(service): State<AppState>,
    body: String,
) -> Result<Json<ImportResponse>, ApiError> {
    match service.validate_dpc_csv(&body) {
        Ok(rows) => Ok(Json(ImportResponse { ok: true, rows })),
        Err(e) => Err(kpi_error(e)),
    }
}

/// POST /api/v1/dpc/export
pub async fn dpc_export(
    State(service): State<AppState>,
    Json(req): Json<DpcExportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    match service.dpc_export(&req.records) {
        Ok(csv) => Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], csv)),
        Err(e) => Err(kpi_error(e)),
    }
}

/// POST /api/v1/dms/search
pub async fn search_docs(
    State(service): State<AppState>,
    Json(req): Json<DocSearchRequest>,
) -> Json<DocSearchResponse> {
    Json(DocSearchResponse {
        docs: service.search_docs(&req.docs, &req.vin),
    })
}
