pub mod board;
pub mod catalog;
pub mod controller;
pub mod db;
pub mod errors;
pub mod learn;
pub mod models;
pub mod reconcile;
pub mod report;
pub mod scheduler;
pub mod state;
pub mod stats;
pub mod store;

use crate::catalog::Catalog;
use crate::controller::{start_autoflush, AuditController};
use crate::db::{default_data_dir, Database};
use crate::models::LaunchSummary;
use crate::scheduler::{FlushOutcome, SystemClock};
use crate::store::OVERLAY_KEY;
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;

static LOG_GUARD: std::sync::OnceLock<WorkerGuard> = std::sync::OnceLock::new();

pub async fn run() -> anyhow::Result<()> {
    let data_dir = default_data_dir().context("resolving data directory")?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating {}", data_dir.display()))?;
    init_tracing(&data_dir).map_err(anyhow::Error::msg)?;

    let db = Arc::new(Database::new(&data_dir.join("audit.db")).context("opening audit database")?);
    let settings = db.get_settings().context("reading settings")?;
    tracing::info!(path = %db.path().display(), "opened audit database");
    let last_saved_at = db.blob_updated_at(OVERLAY_KEY).context("reading last save time")?;

    let autoflush_interval = Duration::from_millis(settings.autoflush_interval_ms.max(1));
    let controller = Arc::new(Mutex::new(AuditController::load(
        db,
        Arc::new(Catalog::builtin().clone()),
        settings,
        Arc::new(SystemClock),
    )));
    let autoflush = start_autoflush(controller.clone(), autoflush_interval);

    let mut controller = controller.lock().await;
    let summary = LaunchSummary {
        report: controller.report(chrono::Utc::now()),
        checklist: controller.sections(),
        board: controller.board_view(),
        warnings: controller.warnings().to_vec(),
        last_saved_at,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if controller.is_dirty() {
        if let FlushOutcome::Failed(error) = controller.flush_now() {
            tracing::warn!(error = %error, "final flush failed");
        }
    }
    autoflush.abort();
    Ok(())
}

fn init_tracing(data_dir: &Path) -> Result<(), String> {
    let log_dir = data_dir.join("logs");
    std::fs::create_dir_all(&log_dir).map_err(|error| error.to_string())?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "audit-roadmap.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .with_writer(non_blocking)
        .try_init()
        .map_err(|error| error.to_string())
}
