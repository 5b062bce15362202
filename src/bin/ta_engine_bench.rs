//! Benchmark binary for the feature engine.
//!
//! Usage:
//!     ta_engine_bench --data <ohlcv.json> [--requests <requests.json>]
//!                     [--iterations N] [--workers W] [--dump <matrix.json>]
//!
//! The data file holds `{"ohlcv": {"open": [...], "high": [...], ...}}`; the
//! requests file holds a JSON array of indicator requests. Outputs a JSON
//! timing report to stdout.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ta_pipeline::{FeatureEngine, IndicatorRequest, Layout, PipelineConfig};

#[derive(Parser)]
#[command(name = "ta_engine_bench")]
#[command(about = "Time feature-matrix runs over an OHLCV data file")]
struct Cli {
    /// OHLCV data file (JSON)
    #[arg(short, long)]
    data: PathBuf,

    /// Indicator requests file (JSON array); a standard feature set when absent
    #[arg(short, long)]
    requests: Option<PathBuf>,

    /// Number of timed runs
    #[arg(short, long, default_value = "100")]
    iterations: usize,

    /// Worker threads; sequential execution when absent
    #[arg(short, long)]
    workers: Option<usize>,

    /// Write the last computed matrix to this file
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Memory order of the dumped matrix
    #[arg(long, value_enum, default_value = "column-major")]
    layout: DumpLayout,
}

#[derive(Clone, Copy, ValueEnum)]
enum DumpLayout {
    ColumnMajor,
    RowMajor,
}

impl From<DumpLayout> for Layout {
    fn from(layout: DumpLayout) -> Self {
        match layout {
            DumpLayout::ColumnMajor => Layout::ColumnMajor,
            DumpLayout::RowMajor => Layout::RowMajor,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OhlcvData {
    ohlcv: OhlcvRaw,
}

#[derive(Debug, Deserialize)]
struct OhlcvRaw {
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<f64>,
}

#[derive(Debug, Serialize)]
struct BenchmarkResult {
    execution: String,
    candles: usize,
    columns: usize,
    iterations: usize,
    total_time_ms: f64,
    avg_time_ms: f64,
    min_time_ms: f64,
    max_time_ms: f64,
    throughput_candles_per_sec: f64,
}

fn load_ohlcv(path: &Path) -> Result<OhlcvRaw> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let data: OhlcvData = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse OHLCV data in {}", path.display()))?;
    Ok(data.ohlcv)
}

fn load_requests(path: Option<&Path>) -> Result<Vec<IndicatorRequest>> {
    let Some(path) = path else {
        return Ok(default_requests());
    };
    let json =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    IndicatorRequest::list_from_json(&json)
        .with_context(|| format!("Failed to parse requests in {}", path.display()))
}

fn default_requests() -> Vec<IndicatorRequest> {
    vec![
        IndicatorRequest::new("ema", 12),
        IndicatorRequest::new("ema", 26),
        IndicatorRequest::new("rsi", 14),
        IndicatorRequest::new("sma", 20),
        IndicatorRequest::new("bb_upper", 20).with_multiplier(2.0),
        IndicatorRequest::new("bb_lower", 20).with_multiplier(2.0),
        IndicatorRequest::new("bb_percent_b", 20),
        IndicatorRequest::new("atr", 14),
        IndicatorRequest::new("roc", 10),
        IndicatorRequest::new("log_return", 1),
    ]
}

fn summarize(execution: String, candles: usize, columns: usize, times: &[f64]) -> BenchmarkResult {
    let iterations = times.len();
    let total_time: f64 = times.iter().sum();
    let avg_time = total_time / iterations as f64;
    let min_time = times.iter().copied().fold(f64::INFINITY, f64::min);
    let max_time = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let throughput = if avg_time > 0.0 {
        (candles as f64 / avg_time) * 1000.0
    } else {
        0.0
    };

    BenchmarkResult {
        execution,
        candles,
        columns,
        iterations,
        total_time_ms: total_time,
        avg_time_ms: avg_time,
        min_time_ms: min_time,
        max_time_ms: max_time,
        throughput_candles_per_sec: throughput,
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if cli.iterations == 0 {
        bail!("--iterations must be at least 1");
    }

    let config = match cli.workers {
        Some(workers) => PipelineConfig::parallel(workers),
        None => PipelineConfig::sequential(),
    };
    let engine = FeatureEngine::new(config).context("Invalid pipeline configuration")?;

    info!(path = %cli.data.display(), "loading data");
    let ohlcv = load_ohlcv(&cli.data)?;
    let requests = load_requests(cli.requests.as_deref())?;
    let candles = ohlcv.close.len();
    info!(candles, columns = requests.len(), "loaded");

    let inputs = [
        ohlcv.open.as_slice(),
        ohlcv.high.as_slice(),
        ohlcv.low.as_slice(),
        ohlcv.close.as_slice(),
        ohlcv.volume.as_slice(),
    ];

    let mut times = Vec::with_capacity(cli.iterations);
    let mut last = None;
    for i in 0..cli.iterations {
        let start = Instant::now();
        let matrix = engine
            .compute_ohlcv(inputs, &requests)
            .context("Feature computation failed")?;
        times.push(start.elapsed().as_secs_f64() * 1000.0);
        debug!(iteration = i, "run complete");
        last = Some(matrix);
    }

    let execution = format!("{:?}", engine.pipeline().config().execution);
    let result = summarize(execution, candles, requests.len(), &times);
    println!("{}", serde_json::to_string_pretty(&result)?);

    if let (Some(path), Some(matrix)) = (cli.dump, last) {
        let buffer = FeatureEngine::export(matrix, cli.layout.into());
        let file =
            File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &buffer)
            .with_context(|| format!("Failed to write matrix to {}", path.display()))?;
        writer.flush()?;
        info!(path = %path.display(), rows = buffer.rows, cols = buffer.cols, "matrix written");
    }

    Ok(())
}
