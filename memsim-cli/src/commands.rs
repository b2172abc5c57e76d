use std::io;
use std::path::PathBuf;

use clap::Parser;
use memsim_config::{parse_size, MemsimConfig};
use memsim_core::{Registry, SimulatedHeap};
use memsim_telemetry::{EventLogger, LogFormat, MetricsRecorder};
use tracing::info;

use crate::error::CliError;
use crate::menu::Session;

/// Interactive memory allocation simulator with leak reporting.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// YAML configuration file (replaces config/memsim.yaml lookup)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum number of live blocks
    #[arg(long)]
    pub capacity: Option<usize>,

    /// Simulated heap budget, e.g. 4096 or 64MiB
    #[arg(long, value_parser = parse_size)]
    pub heap_limit: Option<u64>,

    /// Print Prometheus metrics to stderr on exit
    #[arg(long, default_value_t = false)]
    pub metrics: bool,
}

pub fn load_config(cli: &Cli) -> Result<MemsimConfig, CliError> {
    let config = match &cli.config {
        Some(path) => MemsimConfig::load_from_path(path)?,
        None => MemsimConfig::load()?,
    };
    Ok(config.with_overrides(cli.capacity, cli.heap_limit)?)
}

pub fn build_registry(config: &MemsimConfig) -> Registry {
    let heap = SimulatedHeap::new(config.heap.base_address, config.heap.limit)
        .with_zero_size(config.heap.allow_zero_size);
    Registry::new(config.registry.capacity, heap)
}

pub fn run_command(cli: Cli) -> Result<(), CliError> {
    let config = load_config(&cli)?;

    let format: LogFormat = config
        .telemetry
        .log_format
        .parse()
        .map_err(CliError::Telemetry)?;
    EventLogger::init(&config.telemetry.log_level, format)
        .map_err(|err| CliError::Telemetry(err.to_string()))?;
    info!(?config, "configuration loaded");

    let metrics = MetricsRecorder::new().map_err(|err| CliError::Telemetry(err.to_string()))?;

    let registry = build_registry(&config);
    info!(
        heap_limit = registry.source().limit(),
        heap_available = registry.source().available(),
        "simulated heap ready"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session =
        Session::new(registry, stdin.lock(), stdout.lock()).with_metrics(metrics.clone());
    let report = session.run()?;

    let stats = *session.registry().stats();
    EventLogger::log_event(
        "session_end",
        &[
            ("allocations", stats.allocations().to_string()),
            ("frees", stats.frees().to_string()),
            ("failed_allocations", stats.failed_allocations().to_string()),
            ("capacity_rejections", stats.capacity_rejections().to_string()),
            ("peak_bytes", stats.peak_bytes().to_string()),
            ("peak_blocks", stats.peak_blocks().to_string()),
            ("leaked_blocks", report.blocks.len().to_string()),
            ("leaked_bytes", report.total_bytes.to_string()),
        ],
    );

    if cli.metrics {
        let text = metrics
            .gather_metrics()
            .map_err(|err| CliError::Telemetry(err.to_string()))?;
        eprint!("{text}");
    }
    Ok(())
}
