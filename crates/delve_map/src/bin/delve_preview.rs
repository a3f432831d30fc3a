//! Command-line preview that generates DELVE maps and prints them as ASCII.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use delve_map::{
    init_logging, GenerationReport, MapError, MapGenerator, MemorySurface, MemorySurfaceHost,
    StaticAssetLoader, GROUND_SURFACE_TAG,
};
use delve_procedural::{MapConfig, WorldSeed};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "delve-preview")]
#[command(about = "Generate DELVE maps and print them as ASCII", long_about = None)]
struct Cli {
    /// TOML map configuration. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// World seed. A random seed is drawn when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of maps to generate in a row.
    #[arg(long, default_value = "1")]
    count: u32,

    /// Simulated asset load latency in milliseconds.
    #[arg(long, default_value = "0")]
    latency_ms: u64,

    /// Give up on asset loading after this many milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Print each generation report as TOML.
    #[arg(long)]
    report: bool,

    /// Treat the host as not runnable: generation triggers are refused.
    #[arg(long)]
    dry_run: bool,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logging(&cli.log_level) {
        eprintln!("failed to initialize logging: {err}");
    }

    if cli.dry_run {
        warn!("host is not runnable, refusing generation trigger");
        return ExitCode::SUCCESS;
    }

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "preview failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<(), MapError> {
    let config = match &cli.config {
        Some(path) => MapConfig::load(path)?,
        None => MapConfig::default(),
    };
    let seed = cli.seed.map_or_else(WorldSeed::from_entropy, WorldSeed::new);
    info!(seed = seed.value(), "starting preview");

    let surface = MemorySurface::new();
    let host = MemorySurfaceHost::new().with_surface(GROUND_SURFACE_TAG, surface.clone());
    let loader = StaticAssetLoader::standard().with_latency(Duration::from_millis(cli.latency_ms));

    let cancel = CancellationToken::new();
    if let Some(timeout) = cli.timeout_ms {
        let deadline = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(timeout)).await;
            deadline.cancel();
        });
    }

    let mut generator = MapGenerator::new(config, seed)?;
    let registry = generator.initialize(&host, &loader, &cancel).await?;

    for index in 0..cli.count {
        let report = generator.generate_map(&registry)?;
        println!("map {} of {}", index + 1, cli.count);
        print!("{}", render(&surface, &report));
        if cli.report {
            match toml::to_string(&report) {
                Ok(text) => println!("{text}"),
                Err(err) => warn!(%err, "failed to serialize report"),
            }
        }
    }

    generator.clear_map()
}

/// Surface contents with `S` on the entrance and `E` on the exit.
fn render(surface: &MemorySurface, report: &GenerationReport) -> String {
    let mut rows: Vec<Vec<char>> = surface
        .to_ascii(report.bounds)
        .lines()
        .map(|line| line.chars().collect())
        .collect();

    for (slot, glyph) in report.anchors.iter().zip(['S', 'E']) {
        if let Some((i, j)) = report.bounds.to_local(slot.coord) {
            rows[j][i] = glyph;
        }
    }

    let mut out = String::new();
    for row in rows {
        out.extend(row);
        out.push('\n');
    }
    out
}
