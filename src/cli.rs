//! CLI commands for paddock-api.
//!
//! Supports the API server mode and batch ingestion of one race's telemetry.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::ingest;
use crate::storage::RaceRepository;

#[derive(Parser)]
#[command(name = "paddock-api")]
#[command(version, about = "Racing telemetry ingestion and lap-time reporting API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value_t = 8080)]
        port: u16,

        /// SQLite database path override
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Ingest one race's telemetry files into the database
    Ingest {
        /// Abbreviation table (CODE_FullName_TeamName per line)
        #[arg(value_name = "ABBREVIATIONS")]
        abbreviations: PathBuf,

        /// Race data file with the year/location/race-name header
        #[arg(value_name = "RACE_DATA")]
        race_data: PathBuf,

        /// Lap start timestamp log
        #[arg(value_name = "START_LOG")]
        start_log: PathBuf,

        /// Lap end timestamp log
        #[arg(value_name = "END_LOG")]
        end_log: PathBuf,

        /// SQLite database path override
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
}

/// Run the full ingestion pipeline for one race.
pub fn run_ingest(
    abbreviations: PathBuf,
    race_data: PathBuf,
    start_log: PathBuf,
    end_log: PathBuf,
    database: Option<PathBuf>,
) -> anyhow::Result<()> {
    // Load configuration
    let mut config = AppConfig::load()?;

    // Override database path if provided
    if let Some(path) = database {
        config.database.path = path.to_string_lossy().to_string();
    }

    eprintln!("Opening database: {}", config.database.path);
    let repo = RaceRepository::open(Path::new(&config.database.path))?;

    let racer_count = ingest::ingest_racers(&repo, &abbreviations)?;
    eprintln!("Racers ingested: {}", racer_count);

    let race = ingest::ingest_race(&repo, &race_data)?;
    eprintln!("Race: {} {} ({})", race.year, race.race_name, race.location);

    let lap_count = ingest::ingest_lap_times(&repo, &start_log, &end_log, &abbreviations, &race)?;
    eprintln!("Lap times created: {}", lap_count);

    Ok(())
}
