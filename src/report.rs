//! Read-only report projections over persisted race data.

use crate::error::{Error, Result};
use crate::storage::{RaceRepository, RacerStats};
use crate::types::{DriverResponse, RacerSummary, ReportResponse};

/// Every racer with lap count and best lap, fastest first.
pub fn all_racers_report(repo: &RaceRepository) -> Result<ReportResponse> {
    let racers = repo
        .racer_summaries()?
        .into_iter()
        .map(summarize)
        .collect();
    Ok(ReportResponse { racers })
}

/// One racer by abbreviation code, or `NotFound`.
pub fn driver_detail(repo: &RaceRepository, code: &str) -> Result<DriverResponse> {
    match repo.racer_stats_by_code(code)? {
        Some(stats) => Ok(DriverResponse {
            racer: summarize(stats),
        }),
        None => Err(Error::NotFound(format!("no racer with code {code:?}"))),
    }
}

fn summarize(stats: RacerStats) -> RacerSummary {
    RacerSummary {
        code: stats.racer.code,
        name: stats.racer.name,
        team: stats.racer.team,
        laps: stats.laps,
        best_lap: stats.best_lap_ms.map(format_duration),
        best_lap_ms: stats.best_lap_ms,
    }
}

/// Format a millisecond duration as `M:SS.mmm`
fn format_duration(ms: i64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;
    format!("{}:{:02}.{:03}", minutes, seconds, millis)
}
