use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use qics_kpi::api::{create_rest_router, KpiService};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    create_rest_router(Arc::new(KpiService::default()))
}

async fn send(request: Request<Body>) -> (StatusCode, String) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_text(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "text/csv")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let request = Request::builder().uri("/api/v1/health").body(Body::empty()).unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"ok": true}));
}

#[tokio::test]
async fn rsp_summary_and_rows() {
    let (status, body) = send(post_json(
        "/api/v1/rsp",
        json!({
            "from": "2024-03-01",
            "to": "2024-03-31",
            "records": [
                {"date": "2024-03-04", "target": 100.0, "actual": 80.0, "vin": "VIN1"},
                {"date": "2024-04-02", "target": 10.0, "actual": 10.0},
                {"date": "2024-03-05", "target": 50.0, "actual": 50.0}
            ]
        }),
    ))
    .await;
    assert_eq!(status, StatusCode::OK);

    let v: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v["summary"]["days"], 2);
    assert_eq!(v["summary"]["cum_target"], 150.0);
    assert_eq!(v["summary"]["cum_actual"], 130.0);
    let pct = v["summary"]["achievement_pct"].as_f64().unwrap();
    assert!((pct - 86.67).abs() < 0.01);
    assert_eq!(v["rows"][0]["vin"], "VIN1");
    assert_eq!(v["rows"][0]["date"], "2024-03-04");
    assert_eq!(v["rows"][1]["date"], "2024-03-05");
}

#[tokio::test]
async fn rsp_empty_table_is_zero() {
    let (status, body) = send(post_json(
        "/api/v1/rsp",
        json!({"from": "2024-03-01", "to": "2024-03-31", "records": []}),
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        v,
        json!({
            "summary": {"days": 0, "cum_target": 0.0, "cum_actual": 0.0, "achievement_pct": 0.0},
            "rows": []
        })
    );
}

#[tokio::test]
async fn rsp_rejects_unparseable_dates() {
    let (status, body) = send(post_json(
        "/api/v1/rsp",
        json!({"from": "last week", "to": "2024-03-31", "records": []}),
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid dates"));
}

#[tokio::test]
async fn rsp_from_csv_body() {
    let csv = "date,target,actual\n2024-03-04,100,80\n2024-03-05,50,50\n";
    let (status, body) = send(post_text("/api/v1/rsp/csv?from=2024-03-05&to=2024-03-05", csv)).await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v["summary"]["days"], 1);
    assert_eq!(v["summary"]["achievement_pct"], 100.0);
}

#[tokio::test]
async fn rsp_csv_missing_column_is_client_error() {
    let (status, body) = send(post_text(
        "/api/v1/rsp/csv?from=2024-03-01&to=2024-03-31",
        "date,target\n2024-03-04,1\n",
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("CSV must include columns"));
}

#[tokio::test]
async fn rsp_csv_nan_cell_is_client_error() {
    let (status, body) = send(post_text(
        "/api/v1/rsp/csv?from=2024-03-01&to=2024-03-31",
        "date,target,actual\n2024-03-04,NaN,9\n2024-03-05,inf,1\n",
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let v: Value = serde_json::from_str(&body).unwrap();
    let error = v["error"].as_str().unwrap();
    assert!(error.contains("invalid row 1"));
    assert!(error.contains("finite number"));
}

#[tokio::test]
async fn rsp_csv_without_range_query_is_json_error() {
    let (status, body) = send(post_text("/api/v1/rsp/csv", "date,target,actual\n")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"error": "Invalid dates"}));

    let (status, body) = send(post_text("/api/v1/rsp/csv?from=2024-03-01", "date,target,actual\n")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"error": "Invalid dates"}));
}

#[tokio::test]
async fn rsp_rejects_mistyped_records() {
    let (status, _) = send(post_json(
        "/api/v1/rsp",
        json!({
            "from": "2024-03-01",
            "to": "2024-03-31",
            "records": [{"date": "2024-03-04", "target": "lots", "actual": 80.0}]
        }),
    ))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(post_json(
        "/api/v1/rsp",
        json!({
            "from": "2024-03-01",
            "to": "2024-03-31",
            "records": [{"target": 100.0, "actual": 80.0}]
        }),
    ))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn compare_defects_union_and_working_day() {
    let (status, body) = send(post_json(
        "/api/v1/defects/compare",
        json!({
            "referenceDate": "2024-03-12",
            "holidays": ["2024-03-11"],
            "today": {"A": 5, "B": 2},
            "previous": {"B": 3, "C": 1}
        }),
    ))
    .await;
    assert_eq!(status, StatusCode::OK);

    let v: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v["referenceDate"], "2024-03-12");
    assert_eq!(v["lastWorkingDay"], "2024-03-08");
    assert_eq!(
        v["rows"],
        json!([
            {"category": "A", "today": 5.0, "previous": 0.0, "delta": 5.0},
            {"category": "B", "today": 2.0, "previous": 3.0, "delta": -1.0},
            {"category": "C", "today": 0.0, "previous": 1.0, "delta": -1.0}
        ])
    );
}

#[tokio::test]
async fn compare_defects_exhausted_calendar_is_bad_request() {
    let holidays: Vec<String> = (1..=400)
        .map(|n| (chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap() - chrono::Duration::days(n)).to_string())
        .collect();
    let (status, body) = send(post_json(
        "/api/v1/defects/compare",
        json!({"referenceDate": "2024-06-01", "holidays": holidays}),
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("no working day found"));
}

#[tokio::test]
async fn dpc_monitoring_filters_range() {
    let record = |vin: &str, date: &str| {
        json!({"vin": vin, "model": "Sedan", "date": date, "dpc_target": 1.5, "dpc_actual": 1.2})
    };
    let (status, body) = send(post_json(
        "/api/v1/dpc/monitoring",
        json!({
            "from": "2024-03-02",
            "to": "2024-03-03",
            "records": [record("A", "2024-03-01"), record("B", "2024-03-02"), record("C", "2024-03-03")]
        }),
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_str(&body).unwrap();
    let vins: Vec<_> = v["data"].as_array().unwrap().iter().map(|r| r["vin"].clone()).collect();
    assert_eq!(vins, vec![json!("B"), json!("C")]);
}

#[tokio::test]
async fn dpc_import_counts_rows() {
    let csv = "VIN,Model,Date,DPC Target (%),DPC Actual (%)\nV1,Sedan,2024-03-01,1.5,1.0\nV2,SUV,2024-03-02,1.5,2.0\n";
    let (status, body) = send(post_text("/api/v1/dpc/import", csv)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"ok": true, "rows": 2}));
}

#[tokio::test]
async fn dpc_export_renders_csv() {
    let request = post_json(
        "/api/v1/dpc/export",
        json!({"records": [
            {"vin": "OLD", "model": "Sedan", "date": "2024-03-01", "dpc_target": 1.5, "dpc_actual": 1.0},
            {"vin": "NEW", "model": "SUV", "date": "2024-03-09", "dpc_target": 1.5, "dpc_actual": 2.5}
        ]}),
    );
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/csv"));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(
        String::from_utf8(bytes.to_vec()).unwrap(),
        "VIN,Model,DPC Target (%),DPC Actual (%)\nNEW,SUV,1.5,2.5\nOLD,Sedan,1.5,1\n"
    );
}

#[tokio::test]
async fn dms_search_links_documents_for_vin() {
    let (status, body) = send(post_json(
        "/api/v1/dms/search",
        json!({
            "vin": "VIN1",
            "docs": [
                {"vin": "VIN1", "title": "Paint audit", "type": "inspection", "path": "VIN1_1_paint.pdf"},
                {"vin": "VIN2", "title": "Leak test", "type": "test", "path": "VIN2_1_leak.pdf"}
            ]
        }),
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({"docs": [{"title": "Paint audit", "type": "inspection", "url": "/docs/VIN1_1_paint.pdf"}]})
    );
}

#[tokio::test]
async fn dms_search_unknown_vin_is_empty() {
    let (status, body) = send(post_json("/api/v1/dms/search", json!({"vin": "NOPE", "docs": []}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"docs": []}));
}
