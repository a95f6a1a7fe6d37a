//! CLI entry point for the cohort performance dashboard.
//!
//! Serves the dashboard API, or runs the sheet pipeline once to export or
//! inspect the computed student records.

use actix_web::{App, HttpServer, middleware, web};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cohort_dashboard::analyzers::types::PerformanceLevel;
use cohort_dashboard::api::QueryService;
use cohort_dashboard::api::routes::{configure, not_found};
use cohort_dashboard::config::AppConfig;
use cohort_dashboard::output::{write_csv, write_json};
use cohort_dashboard::pipeline::Pipeline;
use cohort_dashboard::store::{RecordStore, SnapshotStore};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "cohort_dashboard")]
#[command(about = "Student performance dashboard backed by Google Sheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the sheets and serve the dashboard API
    Serve {
        /// Address to bind the HTTP server to
        #[arg(short, long, default_value = "0.0.0.0:5000")]
        bind: String,
    },
    /// Fetch the sheets once and write the computed records to a file
    Export {
        /// File to write
        #[arg(short, long, default_value = "students.csv")]
        output: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },
    /// Fetch the sheets once and log a per-student summary
    Inspect,
    /// Print the effective sheet schema as JSON
    Schema,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/cohort_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("cohort_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    actix_web::rt::System::new().block_on(run(cli.command, config))
}

async fn run(command: Commands, config: AppConfig) -> Result<()> {
    match command {
        Commands::Serve { bind } => serve(&config, &bind).await?,
        Commands::Export { output, format } => {
            let pipeline = build_pipeline(&config)?;
            let snapshot = pipeline.run().await?;

            match format {
                ExportFormat::Csv => write_csv(&output, &snapshot.students, pipeline.schema())?,
                ExportFormat::Json => write_json(&output, &snapshot.students)?,
            }
            info!(output = %output, students = snapshot.len(), "Export written");
        }
        Commands::Inspect => {
            let pipeline = build_pipeline(&config)?;
            let snapshot = pipeline.run().await?;

            for student in &snapshot.students {
                info!(
                    id = %student.id,
                    name = %student.name,
                    status = %student.current_status,
                    average = student.metrics.average_score,
                    completion = student.metrics.completion_rate,
                    level = %student.metrics.performance_level,
                    trend = %student.metrics.trend,
                    "Student"
                );
            }

            let mut by_level: HashMap<PerformanceLevel, usize> = HashMap::new();
            for student in &snapshot.students {
                *by_level
                    .entry(student.metrics.performance_level)
                    .or_default() += 1;
            }
            let count = |level: PerformanceLevel| by_level.get(&level).copied().unwrap_or(0);

            info!(
                total = snapshot.len(),
                tasks = snapshot.tasks.len(),
                excellent = count(PerformanceLevel::Excellent),
                good = count(PerformanceLevel::Good),
                satisfactory = count(PerformanceLevel::Satisfactory),
                needs_improvement = count(PerformanceLevel::NeedsImprovement),
                poor = count(PerformanceLevel::Poor),
                "Cohort summary"
            );
        }
        Commands::Schema => {
            let schema = config.schema()?;
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

fn build_pipeline(config: &AppConfig) -> Result<Pipeline> {
    let schema = config.schema()?;
    let source = config.sheet_source()?;

    Ok(Pipeline::new(source, schema, config.student_sheet.clone())
        .with_task_sheet(config.task_sheet.clone()))
}

/// Loads the initial snapshot and serves the API until shutdown.
///
/// A failed initial load falls back to the persisted snapshot, or to an
/// empty store that `/api/refresh` can fill later.
#[tracing::instrument(skip(config))]
async fn serve(config: &AppConfig, bind: &str) -> Result<()> {
    let store = Arc::new(match &config.snapshot_path {
        Some(path) => SnapshotStore::with_persistence(path),
        None => SnapshotStore::new(),
    });
    let service = web::Data::new(QueryService::new(store.clone(), build_pipeline(config)?));

    info!("Loading student data from Google Sheets");
    if let Err(e) = service.refresh().await {
        error!(error = %e, "Initial load failed");
        match store.restore().await {
            Ok(true) => {}
            Ok(false) => warn!("Starting without student data"),
            Err(e) => warn!(error = %e, "Could not restore persisted snapshot"),
        }
    }

    let students = store.current().await.len();
    info!(bind, students, "Starting HTTP server");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(service.clone())
            .configure(configure)
            .default_service(web::to(not_found))
    })
    .bind(bind)
    .with_context(|| format!("failed to bind {bind}"))?
    .run()
    .await?;

    info!("HTTP server stopped");
    Ok(())
}
