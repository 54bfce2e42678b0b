//! iqnotifyd - presence-aware notification host
//!
//! Wires together:
//! - Configuration loading
//! - The presence database (read-only)
//! - The notification service
//! - The NDJSON dispatcher on stdout
//!
//! Logs go to stderr so stdout carries only delivery lines (or the plan,
//! with `--dry-run`).

use anyhow::{Context, Result};
use clap::Parser;
use iqnotify_api::NotifyRequest;
use iqnotify_config::load_config;
use iqnotify_core::NotifyService;
use iqnotify_dispatch::LogDispatcher;
use iqnotify_store::{PresenceStore, SqlitePresenceStore};
use iqnotify_util::default_config_path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// iqnotifyd - send a notification to the people presence says should get it
#[derive(Parser, Debug)]
#[command(name = "iqnotifyd")]
#[command(about = "Presence-aware notification router", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/iqnotify/config.toml)
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Presence database override (or set IQNOTIFY_PRESENCE_DB env var)
    #[arg(short, long, env = "IQNOTIFY_PRESENCE_DB")]
    presence_db: Option<PathBuf>,

    /// Message body
    #[arg(short, long, default_value = "")]
    message: String,

    /// Optional title
    #[arg(short, long)]
    title: Option<String>,

    /// Extra data as a JSON object; `mode` and `time` are consumed here
    #[arg(short, long)]
    data: Option<String>,

    /// Print the decisions as JSON instead of delivering
    #[arg(long)]
    dry_run: bool,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

async fn run(args: Args) -> Result<bool> {
    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    info!(
        config_path = %args.config.display(),
        pair_count = config.pairs.len(),
        "Configuration loaded"
    );

    let db_path = args
        .presence_db
        .clone()
        .unwrap_or_else(|| config.service.presence_db.clone());
    let store = SqlitePresenceStore::open_read_only(&db_path)
        .with_context(|| format!("Failed to open presence database {:?}", db_path))?;
    if !store.is_healthy() {
        warn!(db_path = %db_path.display(), "Presence database is not responding");
    }
    info!(db_path = %db_path.display(), "Presence store opened");

    let mut request = NotifyRequest::new(args.message);
    if let Some(title) = args.title {
        request = request.with_title(title);
    }
    if let Some(data) = args.data.as_deref() {
        request = request.with_data_json(data).context("Invalid --data")?;
    }

    let service = NotifyService::new(config, Arc::new(store), Arc::new(LogDispatcher::stdout()));

    if args.dry_run {
        let plan = service.plan(request, iqnotify_util::now());
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(true);
    }

    let report = service.send_message(request).await;
    info!(
        evaluation_id = %report.plan.evaluation_id,
        delivered = report.delivered.len(),
        failed = report.failed.len(),
        "Notification processed"
    );

    Ok(report.is_complete())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "iqnotifyd starting");

    if run(args).await? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}
