// SPDX-License-Identifier: GPL-3.0-or-later
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use s2am_application::{
    count_by_result, count_by_search_method, failure_entries, format_counts,
    playlist_display_name, read_track_queries, write_failure_log, write_json_results,
    ConversionError, ImportError, PlaylistConverter, CSV_FORMAT_HINT,
};
use s2am_config::{load as load_config, load_credentials, AppConfig, TelemetryConfig};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod files;
mod table;

/// Convert Exportify playlist CSV files into Apple Music library playlists.
#[derive(Debug, Parser)]
#[command(name = "s2am", version, about)]
struct Cli {
    /// A .csv file, or a directory scanned recursively for .csv files.
    path: PathBuf,

    /// TOML configuration file.
    #[arg(long, env = "S2AM_CONFIG")]
    config: Option<PathBuf>,

    /// Seconds to wait before every request to Apple Music.
    #[arg(long)]
    delay: Option<f64>,

    /// Do not write the JSON results file.
    #[arg(long)]
    no_results: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(delay) = self.delay {
            config.run.delay_secs = delay;
        }
        if self.no_results {
            config.run.write_results = false;
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!(target: "cli", error = %e, "conversion aborted");
        eprintln!("\nERROR: {e:#}");
        if let Some(hint) = e.downcast_ref::<ConversionError>().and_then(|c| c.remediation()) {
            eprintln!("{hint}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    init_tracing(&config.telemetry)?;

    info!(target: "cli", version = env!("CARGO_PKG_VERSION"), "s2am started");
    info!(target: "cli", delay_secs = config.run.delay_secs, "rate limit delay");

    let csv_files = files::discover_csv_files(&cli.path)?;
    if cli.path.is_dir() {
        println!("\nProcessing {} CSV files from {}.", csv_files.len(), cli.path.display());
    }

    let credentials = load_credentials(
        &config.credentials.dir,
        &mut io::stdin().lock(),
        &mut io::stdout(),
    )?;
    let converter = PlaylistConverter::from_config(&config, &credentials)
        .context("failed to set up Apple Music clients")?;

    for csv_file in &csv_files {
        convert_file(&converter, &config, csv_file).await?;
    }

    info!(target: "cli", files = csv_files.len(), "finished processing all CSV files");
    Ok(())
}

async fn convert_file(converter: &PlaylistConverter, config: &AppConfig, csv_file: &Path) -> Result<()> {
    if !csv_file.exists() {
        anyhow::bail!("playlist file not found: {}", csv_file.display());
    }
    info!(target: "cli", file = %csv_file.display(), "processing");

    let display_name = playlist_display_name(csv_file);
    let tracks = match read_track_queries(csv_file) {
        Ok(tracks) => tracks,
        Err(ImportError::InvalidFormat(header)) => {
            warn!(target: "cli", file = %csv_file.display(), %header, "not an Exportify CSV, skipping");
            println!("\n{CSV_FORMAT_HINT}\n");
            return Ok(());
        }
        Err(e) => {
            return Err(anyhow::Error::new(e).context(format!("failed to read {}", csv_file.display())))
        }
    };
    info!(target: "cli", tracks = tracks.len(), playlist = %display_name, "tracks found");

    println!("\n{}", table::format_header(&display_name, tracks.len()));
    let run = converter
        .convert(&display_name, tracks, |_, record| {
            println!("{}", table::format_row(record));
        })
        .await?;

    let search_results = format_counts(count_by_search_method(run.records()).as_ref());
    let playlist_results = format_counts(count_by_result(run.records()).as_ref());
    println!("{}\n", table::format_footer(&search_results, &playlist_results));
    info!(target: "cli", %search_results, "tracks found by search method");
    info!(target: "cli", %playlist_results, "tracks added by result");

    let now = chrono::Local::now().naive_local();
    if config.run.write_results {
        write_json_results(&run, csv_file, &config.run.results_dir, now)?;
    }
    write_failure_log(&failure_entries(&run), csv_file, now)?;

    info!(target: "cli", file = %csv_file.display(), "finished processing");
    Ok(())
}

/// Log to the configured file only; the console belongs to the table.
fn init_tracing(telemetry: &TelemetryConfig) -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&telemetry.log_file)
        .with_context(|| format!("cannot open log file {}", telemetry.log_file.display()))?;

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file));
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&telemetry.log_level)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

fn default_filter(level: &str) -> String {
    format!("{level},hyper=info,hyper_util=info,reqwest=info,rustls=info")
}
