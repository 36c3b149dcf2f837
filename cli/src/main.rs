//! CLI entrypoint for steward
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use steward_application::{
    ActivityLogger, AgentStore, AgentSupervisor, ExecutionOrchestrator, ExecutionTimings,
    PlannerPort,
};
use steward_infrastructure::{
    ConfigLoader, FileConfig, FileExportWriter, JsonFileStore, JsonlActivityLogger, MockPlanner,
    RandomOutcomeExecutor,
};
use steward_presentation::{AgentConsole, Cli};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    config.validate()?;

    let log_dir = cli
        .log_dir
        .clone()
        .or_else(|| config.logging.log_dir.as_ref().map(PathBuf::from));
    let _guard = init_logging(cli.verbose, log_dir.as_deref())?;

    info!("Starting steward");

    // === Dependency Injection ===
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.storage.resolve_data_dir());
    let persistence = Arc::new(
        JsonFileStore::open(data_dir.clone())
            .with_context(|| format!("Cannot open data directory {}", data_dir.display()))?,
    );
    let store = if cli.fresh {
        AgentStore::load_fresh(persistence)
    } else {
        AgentStore::load(persistence)
    };
    info!(data_dir = %data_dir.display(), agents = store.agents().len(), "Agent store loaded");

    let (timings, planner): (ExecutionTimings, Arc<dyn PlannerPort>) = if cli.fast {
        (ExecutionTimings::instant(), Arc::new(MockPlanner::instant()))
    } else {
        (
            config.execution.to_timings(),
            Arc::new(MockPlanner::new(
                config.planner.latency(),
                config.planner.replan_latency(),
            )),
        )
    };
    let executor = Arc::new(RandomOutcomeExecutor::new(config.execution.success_rate));
    let orchestrator = ExecutionOrchestrator::new(executor, timings);
    let export_writer = Arc::new(FileExportWriter::new(config.storage.resolve_export_dir()));

    let (tx, rx) = mpsc::unbounded_channel();
    let mut supervisor = AgentSupervisor::new(store, planner, orchestrator, export_writer, tx);
    if let Some(logger) = activity_logger(&config, &data_dir) {
        supervisor = supervisor.with_activity_logger(logger);
    }
    supervisor.resume();

    AgentConsole::new(supervisor, rx)
        .with_history_file(data_dir.join("history.txt"))
        .run()
        .await;

    Ok(())
}

/// Console logging filtered by `RUST_LOG` or `-v`, plus optional daily files.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "steward.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

fn activity_logger(config: &FileConfig, data_dir: &Path) -> Option<Arc<dyn ActivityLogger>> {
    if !config.logging.activity_log {
        return None;
    }
    let path = data_dir.join("activity.jsonl");
    match JsonlActivityLogger::new(&path) {
        Some(logger) => Some(Arc::new(logger)),
        None => {
            warn!(path = %path.display(), "Activity log disabled");
            None
        }
    }
}
