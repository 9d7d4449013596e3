//! Command-line KPI reports
//!
//! Usage:
//!   qics_kpi rsp --input data/rsp.csv --from 2024-03-01 --to 2024-03-31
//!   qics_kpi working-day --date 2024-03-12 --holiday 2024-03-11
//!   qics_kpi compare --today today.json --previous previous.json

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use qics_kpi::defects::DefectSnapshot;
use qics_kpi::models::parse_date;
use qics_kpi::{defect_comparison, import, last_working_day, rsp_cumulative};
use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "qics_kpi")]
#[command(about = "Quality KPI reports for vehicle manufacturing")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cumulative RSP achievement over a date range
    Rsp {
        /// CSV with date,target,actual[,vin,model] columns
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Also print contributing rows
        #[arg(long)]
        rows: bool,
    },
    /// Last working day before a reference date
    WorkingDay {
        #[arg(long)]
        date: String,
        /// Holiday (YYYY-MM-DD), may be repeated
        #[arg(long = "holiday")]
        holidays: Vec<String>,
    },
    /// Compare two defect snapshots (JSON objects of category -> count)
    Compare {
        #[arg(long)]
        today: PathBuf,
        #[arg(long)]
        previous: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .init();

    match Args::parse().command {
        Command::Rsp { input, from, to, rows } => report_rsp(&input, &from, &to, rows),
        Command::WorkingDay { date, holidays } => report_working_day(&date, &holidays),
        Command::Compare { today, previous } => report_comparison(&today, &previous),
    }
}

fn report_rsp(input: &Path, from: &str, to: &str, show_rows: bool) -> Result<()> {
    let start = parse_date(from)?;
    let end = parse_date(to)?;

    info!("Reading RSP table from {:?}", input);
    let file = File::open(input).with_context(|| format!("opening {}", input.display()))?;
    let records = import::read_shipment_records(file)?;
    let result = rsp_cumulative(&records, start, end);

    println!("\n{}", "=".repeat(60));
    println!("          RSP CUMULATIVE ACHIEVEMENT  {} .. {}", start, end);
    println!("{}\n", "=".repeat(60));
    println!("  {:20} {:>12}", "Rows", result.summary.days);
    println!("  {:20} {:>12.2}", "Cumulative target", result.summary.cum_target);
    println!("  {:20} {:>12.2}", "Cumulative actual", result.summary.cum_actual);
    println!("  {:20} {:>11.2}%", "Achievement", result.summary.achievement_pct);

    if show_rows && !result.rows.is_empty() {
        println!("\n  {:12} {:18} {:>10} {:>10}", "Date", "VIN", "Target", "Actual");
        println!("  {}", "-".repeat(52));
        for r in &result.rows {
            println!(
                "  {:12} {:18} {:>10.2} {:>10.2}",
                r.date.to_string(),
                r.vin.as_deref().unwrap_or("-"),
                r.target,
                r.actual
            );
        }
    }
    println!();
    Ok(())
}

fn report_working_day(date: &str, holidays: &[String]) -> Result<()> {
    let reference = parse_date(date)?;
    let holidays = holidays
        .iter()
        .map(|h| parse_date(h))
        .collect::<Result<HashSet<_>, _>>()?;

    let day = last_working_day(reference, &holidays)?;
    println!("{} -> last working day {} ({})", reference, day, day.format("%A"));
    Ok(())
}

fn read_snapshot(path: &Path) -> Result<DefectSnapshot> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(file).with_context(|| format!("parsing {}", path.display()))
}

fn report_comparison(today: &Path, previous: &Path) -> Result<()> {
    let rows = defect_comparison(&read_snapshot(today)?, &read_snapshot(previous)?);

    println!("\n  {:24} {:>10} {:>10} {:>10}", "Category", "Today", "Previous", "Delta");
    println!("  {}", "-".repeat(58));
    for r in &rows {
        println!(
            "  {:24} {:>10} {:>10} {:>+10}",
            r.category, r.today, r.previous, r.delta
        );
    }
    println!();
    Ok(())
}
