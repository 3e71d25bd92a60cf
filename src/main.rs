//! CLI entry point for the telemetry-to-GeoJSON converter.
//!
//! Provides one subcommand per conversion mode: a single-participant export
//! with per-step distances, a day-of-week/time-of-day bucket export, and a
//! proximity-filtered trip export.

use anyhow::Result;
use chrono::NaiveTime;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use telemetry_geojson::convert::daytime::export_day_time_buckets;
use telemetry_geojson::convert::participant::export_participant;
use telemetry_geojson::convert::proximity::{ProximityFilter, export_proximity};
use telemetry_geojson::record::load_records;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "telemetry_geojson")]
#[command(about = "Converts study telemetry logs into GeoJSON feature collections", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export one participant's records with per-step point distances
    Participant {
        /// Telemetry log to read
        #[arg(short, long, default_value = "boschdataset.txt")]
        input: String,

        /// GeoJSON file to write
        #[arg(short, long, default_value = "boschdataset_onlyparticipant1.geojson")]
        output: String,

        /// Participant id to keep
        #[arg(short, long, default_value_t = 1)]
        participant: i64,
    },
    /// Export all records into 28 day-of-week × time-of-day bucket files
    Buckets {
        /// Telemetry log to read
        #[arg(short, long, default_value = "boschdataset.txt")]
        input: String,

        /// Directory receiving the <day>_<slot>.geojson files
        #[arg(short, long, default_value = "data")]
        output_dir: String,
    },
    /// Export trips that pass near a reference point during a time window
    Proximity {
        /// Telemetry log to read
        #[arg(short, long, default_value = "boschdataset.txt")]
        input: String,

        /// GeoJSON file to write
        #[arg(short, long, default_value = "boschdataset_filtered.geojson")]
        output: String,

        /// Inclusive distance cutoff in meters
        #[arg(long, default_value_t = 2000.0)]
        radius: f64,

        /// Reference longitude
        #[arg(long, default_value_t = 10.538761725)]
        ref_lon: f64,

        /// Reference latitude
        #[arg(long, default_value_t = 52.252495764)]
        ref_lat: f64,

        /// Inclusive window start (HH:MM:SS)
        #[arg(long, default_value = "06:30:00")]
        window_start: NaiveTime,

        /// Inclusive window end (HH:MM:SS)
        #[arg(long, default_value = "08:00:00")]
        window_end: NaiveTime,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/telemetry_geojson.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("telemetry_geojson.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Participant {
            input,
            output,
            participant,
        } => {
            let (records, _) = load_records(Path::new(&input))?;
            export_participant(&records, participant, Path::new(&output))?;
        }
        Commands::Buckets { input, output_dir } => {
            let (records, _) = load_records(Path::new(&input))?;
            export_day_time_buckets(&records, Path::new(&output_dir))?;
        }
        Commands::Proximity {
            input,
            output,
            radius,
            ref_lon,
            ref_lat,
            window_start,
            window_end,
        } => {
            let (records, _) = load_records(Path::new(&input))?;
            let filter = ProximityFilter {
                reference: (ref_lon, ref_lat),
                radius_m: radius,
                window_start,
                window_end,
            };
            export_proximity(&records, &filter, Path::new(&output))?;
        }
    }

    Ok(())
}
