//! WellView - inspect how a well dataset would be charted
//!
//! Loads a JSON array of readings and prints the window, sampling decision
//! and navigation state a chart would start with.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueHint};
use serde::Serialize;

use wellview::events;
use wellview::export::ExportEstimate;
use wellview::fetch::{MemoryStore, WellId};
use wellview::navigation::ResolutionMode;
use wellview::sampling::{format_sampling_description, SamplingRate};
use wellview::session::ChartSession;
use wellview::settings::EngineSettings;
use wellview::state::{DateRange, NavigationState, Reading};
use wellview::stats::ReadingStats;

/// Inspect how a well dataset would be charted
#[derive(Parser, Debug)]
#[command(name = "wellview", version, about, long_about = None)]
struct Args {
    /// JSON array of readings
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Resolution mode to open in (full, 1year, 6months, 1month)
    #[arg(long, value_parser = ResolutionMode::parse)]
    mode: Option<ResolutionMode>,

    /// Well identifier reported in the summary
    #[arg(long, default_value = "well")]
    well: String,

    /// Settings file to use instead of the platform config directory
    #[arg(long, value_hint = ValueHint::FilePath)]
    settings: Option<PathBuf>,
}

#[derive(Serialize)]
struct Summary {
    well: String,
    mode: ResolutionMode,
    range: DateRange,
    rate: SamplingRate,
    rate_description: String,
    upgrade_offer: Option<SamplingRate>,
    high_res_available: bool,
    navigation: NavigationState,
    raw_points: usize,
    displayed_points: usize,
    export: ExportEstimate,
    stats: ReadingStats,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => EngineSettings::load_from(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => EngineSettings::load(),
    };

    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let readings: Vec<Reading> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse readings from {}", args.input.display()))?;

    let stats = ReadingStats::from_readings(&readings);
    let well = WellId::new(args.well);
    let store = MemoryStore::new(well.clone(), readings);
    let available = store
        .available_range()
        .context("Input contains no readings")?;

    let (sink, _queue) = events::channel();
    let mut session = ChartSession::new(well.clone(), available, settings, sink);
    if let Some(mode) = args.mode {
        session.select_mode(mode);
    }

    let displayed_points = session.refresh(&store)?;
    let summary = Summary {
        well: well.to_string(),
        mode: session.mode(),
        range: session.range(),
        rate: session.rate(),
        rate_description: format_sampling_description(session.rate()),
        upgrade_offer: session.pending_upgrade(),
        high_res_available: session.high_res_available(),
        navigation: session.navigation_state(),
        raw_points: store.len(),
        displayed_points,
        export: session.export_estimate(),
        stats,
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
