//! SQLite storage module for race telemetry.
//!
//! Provides persistent storage for ingested races, racers and lap times,
//! and the read queries the reporting layer is built on.

pub mod repository;
pub mod schema;

pub use repository::{LapTime, Race, RaceRepository, Racer, RacerStats};
pub use schema::create_tables;
