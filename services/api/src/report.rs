use crate::infra::{load_warehouse, parse_date};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::Args;
use hiring_dashboard::config::AppConfig;
use hiring_dashboard::dashboard::{
    DashboardMetrics, DashboardService, FactFilter, InMemoryWarehouse, Page, ProcessStatus,
    TableRow, VacancyStatus,
};
use hiring_dashboard::error::AppError;
use hiring_dashboard::telemetry;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct MetricsArgs {
    /// Warehouse snapshot (JSON). Defaults to APP_WAREHOUSE_PATH.
    #[arg(long)]
    pub(crate) warehouse: Option<PathBuf>,
    /// Filter body as JSON, e.g. '{"recruiters":[1],"processStatus":[1]}'
    #[arg(long)]
    pub(crate) filter: Option<String>,
    /// Reference date for deadline checks (defaults to now)
    #[arg(long, value_parser = parse_date)]
    pub(crate) now: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct TableArgs {
    /// Warehouse snapshot (JSON). Defaults to APP_WAREHOUSE_PATH.
    #[arg(long)]
    pub(crate) warehouse: Option<PathBuf>,
    /// Filter body as JSON, including optional page and pageSize
    #[arg(long)]
    pub(crate) filter: Option<String>,
}

pub(crate) async fn run_metrics_report(args: MetricsArgs) -> Result<(), AppError> {
    let MetricsArgs {
        warehouse,
        filter,
        now,
    } = args;

    let filter = parse_filter(filter.as_deref())?;
    let now = now.map(start_of_day).unwrap_or_else(Utc::now);
    let service = build_service(warehouse)?;

    let metrics = service.metrics(&filter, now).await?;
    println!("{}", render_metrics(&metrics, now));
    Ok(())
}

pub(crate) async fn run_table_report(args: TableArgs) -> Result<(), AppError> {
    let TableArgs { warehouse, filter } = args;

    let filter = parse_filter(filter.as_deref())?;
    let service = build_service(warehouse)?;

    let page = service.table(&filter).await?;
    println!("{}", render_table(&page, filter.page.page.unwrap_or(1)));
    Ok(())
}

fn build_service(
    warehouse: Option<PathBuf>,
) -> Result<DashboardService<InMemoryWarehouse>, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let warehouse = load_warehouse(&config.storage, warehouse.as_deref())?;
    Ok(DashboardService::new(
        Arc::new(warehouse),
        config.storage.query_timeout,
    ))
}

fn parse_filter(raw: Option<&str>) -> Result<FactFilter, AppError> {
    match raw {
        Some(raw) => serde_json::from_str(raw).map_err(|err| {
            AppError::InvalidInput(format!("--filter is not a filter body: {err}"))
        }),
        None => Ok(FactFilter::default()),
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn render_metrics(metrics: &DashboardMetrics, now: DateTime<Utc>) -> String {
    let cards = &metrics.cards;
    let statuses = &metrics.vacancy_status;
    let mut lines = vec![
        format!("Hiring dashboard as of {}", now.format("%Y-%m-%d")),
        "\nProcesses".to_string(),
        format!("- {}: {}", ProcessStatus::Open.label(), cards.open),
        format!("- {}: {}", ProcessStatus::InProgress.label(), cards.in_progress),
        format!("- {}: {}", ProcessStatus::Closed.label(), cards.closed),
        format!("- Approaching deadline: {}", cards.approaching_deadline),
        format!("- Average hiring time: {} days", cards.average_hiring_time),
        "\nVacancies".to_string(),
        format!("- {}: {}", VacancyStatus::Open.label(), statuses.open),
        format!("- {}: {}", VacancyStatus::InAnalysis.label(), statuses.analyzing),
        format!("- {}: {}", VacancyStatus::Closed.label(), statuses.closed),
        "\nAverage hiring time per month (days)".to_string(),
    ];

    for (month, days) in metrics.average_hiring_time.named() {
        lines.push(format!("  {month:<10} {days:>6.1}"));
    }

    lines.join("\n")
}

fn render_table(page: &Page<TableRow>, current_page: i64) -> String {
    let mut lines = vec![format!(
        "Dashboard table (page {current_page} of {})",
        page.num_max_pages
    )];

    if page.items.is_empty() {
        lines.push("  no rows".to_string());
    }

    for row in &page.items {
        lines.push(format!("- {} / {}", row.process_title, row.vacancy_title));
        lines.push(format!(
            "  positions {} | applied {} | interviewed {} | hired {} | feedback {}",
            row.num_positions,
            row.num_candidates_applied,
            row.num_interviewed,
            row.num_hired,
            row.num_feedback
        ));
        lines.push(format!(
            "  competition {} | avg hiring time {}",
            optional(row.competition_rate, ""),
            optional(row.average_hiring_time, " days")
        ));
    }

    lines.join("\n")
}

fn optional(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(value) => format!("{value:.1}{unit}"),
        None => "n/a".to_string(),
    }
}
