//! REST API Server for the QICS KPI engine
//!
//! Usage:
//!   ./target/release/api_server [options]
//!
//! Options:
//!   --host HOST         Address to bind (default: 0.0.0.0, env QICS_HOST)
//!   --port PORT         Port to listen on (default: 8080, env QICS_PORT)
//!   --holiday DATE      Plant holiday applied to every request (repeatable)
//!
//! REST endpoints:
//!   GET  /api/v1/health            - Health check
//!   POST /api/v1/rsp               - RSP cumulative achievement (JSON records)
//!   POST /api/v1/rsp/csv           - RSP cumulative achievement (CSV body, ?from&to)
//!   POST /api/v1/defects/compare   - Defect snapshot comparison
//!   POST /api/v1/dpc/monitoring    - DPC records within a date range
//!   POST /api/v1/dpc/import        - Validate a DPC CSV upload
//!   POST /api/v1/dpc/export        - Render DPC records as CSV
//!   POST /api/v1/dms/search        - Quality documents attached to a VIN

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use qics_kpi::api::{create_rest_router, KpiService};
use qics_kpi::models::parse_date;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "api_server")]
#[command(about = "REST server for quality KPI aggregation")]
struct Args {
    /// Address to bind
    #[arg(long, env = "QICS_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "QICS_PORT", default_value = "8080")]
    port: u16,

    /// Plant holiday (YYYY-MM-DD), may be repeated
    #[arg(long = "holiday")]
    holidays: Vec<String>,
}

fn print_banner(addr: &SocketAddr, holidays: usize) {
    println!("============================================================");
    println!("               QICS KPI API SERVER");
    println!("============================================================");
    println!();
    println!("  REST:     http://{}/api/v1/", addr);
    println!("  Holidays: {} plant day(s)", holidays);
    println!();
    println!("REST Endpoints:");
    println!("  GET  /api/v1/health             Health check");
    println!("  POST /api/v1/rsp                RSP achievement");
    println!("  POST /api/v1/rsp/csv            RSP achievement (CSV)");
    println!("  POST /api/v1/defects/compare    Defect comparison");
    println!("  POST /api/v1/dpc/monitoring     DPC by date range");
    println!("  POST /api/v1/dpc/import         Validate DPC CSV");
    println!("  POST /api/v1/dpc/export         DPC CSV export");
    println!("  POST /api/v1/dms/search         Documents for a VIN");
    println!();
    println!("============================================================");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .init();

    let args = Args::parse();

    let holidays = args
        .holidays
        .iter()
        .map(|h| parse_date(h).with_context(|| format!("invalid --holiday value '{}'", h)))
        .collect::<Result<HashSet<NaiveDate>>>()?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let service = Arc::new(KpiService::new(holidays));
    print_banner(&addr, service.plant_holidays().len());
    let app = create_rest_router(service);

    tracing::info!("Starting REST server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
