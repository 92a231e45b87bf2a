//! File-to-storage ingestion pipeline for one race's telemetry.
//!
//! Ingestion is one-directional: files are parsed into records, codes are
//! resolved against the abbreviation table, start/end events are paired into
//! lap durations, and the results land in the repository. Any error aborts
//! the current ingestion call; rows persisted before the failure remain.

pub mod parsers;

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::error::{Error, Result};
use crate::storage::{Race, RaceRepository, Racer};
use parsers::{abbreviations, lap_log, race_header};
use parsers::{AbbreviationRecord, LapEvent};

/// Per-run resolver from abbreviation codes to persisted racers.
///
/// Built once per ingestion run from the parsed abbreviation table.
/// Re-resolving a code within the run returns the cached racer, so one run
/// can never create duplicates.
pub struct AbbreviationResolver {
    table: HashMap<String, AbbreviationRecord>,
    resolved: HashMap<String, Racer>,
}

impl AbbreviationResolver {
    pub fn new(records: Vec<AbbreviationRecord>) -> Self {
        let table = records
            .into_iter()
            .map(|record| (record.code.clone(), record))
            .collect();
        Self {
            table,
            resolved: HashMap::new(),
        }
    }

    /// Resolve a code to its persisted racer, creating it on first encounter.
    pub fn resolve(&mut self, repo: &RaceRepository, code: &str) -> Result<Racer> {
        if let Some(racer) = self.resolved.get(code) {
            return Ok(racer.clone());
        }

        let record = self
            .table
            .get(code)
            .ok_or_else(|| Error::UnknownAbbreviation(code.to_string()))?;
        let racer = repo.create_racer(&record.code, &record.name, &record.team)?;
        self.resolved.insert(code.to_string(), racer.clone());
        Ok(racer)
    }

    /// Number of distinct codes resolved so far in this run
    pub fn resolved_count(&self) -> usize {
        self.resolved.len()
    }
}

/// Pair start and end events into (code, duration in milliseconds).
///
/// Policy, deliberately asymmetric and silent:
/// - an end event with no matching start is skipped (incomplete lap)
/// - a start event that never sees an end is never emitted
/// - duplicate codes within one log keep the last line's timestamp
/// - negative durations pass through; the repository rejects them
pub fn assemble_laps(starts: &[LapEvent], ends: &[LapEvent]) -> Vec<(String, i64)> {
    let mut start_by_code: HashMap<&str, NaiveDateTime> = HashMap::new();
    for event in starts {
        start_by_code.insert(&event.code, event.timestamp);
    }

    let mut end_by_code: HashMap<&str, NaiveDateTime> = HashMap::new();
    for event in ends {
        end_by_code.insert(&event.code, event.timestamp);
    }

    // Emit in end-log order, one lap per code
    let mut seen: HashSet<&str> = HashSet::new();
    let mut laps = Vec::new();
    for event in ends {
        if !seen.insert(&event.code) {
            continue;
        }
        let Some(start) = start_by_code.get(event.code.as_str()) else {
            continue;
        };
        let end = end_by_code[event.code.as_str()];
        laps.push((event.code.clone(), (end - *start).num_milliseconds()));
    }
    laps
}

/// Read the abbreviation table and persist every racer.
/// Returns the number of distinct racers.
pub fn ingest_racers(repo: &RaceRepository, path: &Path) -> Result<usize> {
    let input = fs::read_to_string(path)?;
    let records = abbreviations::parse(&input).collect::<Result<Vec<_>>>()?;

    let codes: Vec<String> = records.iter().map(|r| r.code.clone()).collect();
    let mut resolver = AbbreviationResolver::new(records);
    for code in &codes {
        resolver.resolve(repo, code)?;
    }

    Ok(resolver.resolved_count())
}

/// Read the race-data header and create the race record.
pub fn ingest_race(repo: &RaceRepository, path: &Path) -> Result<Race> {
    let input = fs::read_to_string(path)?;
    let header = race_header::parse(&input)?;
    repo.create_race(&header.year, &header.location, &header.race_name)
}

/// Pair the start/end logs and persist one lap time per completed lap.
/// Returns the number of lap times created.
pub fn ingest_lap_times(
    repo: &RaceRepository,
    start_log: &Path,
    end_log: &Path,
    abbreviations_path: &Path,
    race: &Race,
) -> Result<usize> {
    let table_input = fs::read_to_string(abbreviations_path)?;
    let records = abbreviations::parse(&table_input).collect::<Result<Vec<_>>>()?;
    let mut resolver = AbbreviationResolver::new(records);

    let start_input = fs::read_to_string(start_log)?;
    let starts = lap_log::parse(&start_input).collect::<Result<Vec<_>>>()?;
    let end_input = fs::read_to_string(end_log)?;
    let ends = lap_log::parse(&end_input).collect::<Result<Vec<_>>>()?;

    let mut created = 0;
    for (code, duration_ms) in assemble_laps(&starts, &ends) {
        let racer = resolver.resolve(repo, &code)?;
        repo.create_lap_time(&racer, race, duration_ms)?;
        created += 1;
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use std::path::PathBuf;

    fn testdata(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("testdata")
            .join(name)
    }

    fn event(code: &str, h: u32, m: u32, s: u32, ms: u32) -> LapEvent {
        LapEvent {
            code: code.to_string(),
            timestamp: NaiveDate::from_ymd_opt(2018, 5, 24)
                .unwrap()
                .and_time(NaiveTime::from_hms_milli_opt(h, m, s, ms).unwrap()),
        }
    }

    #[test]
    fn test_assemble_matching_pair() {
        let starts = vec![event("SVF", 12, 2, 58, 0)];
        let ends = vec![event("SVF", 12, 4, 2, 415)];

        let laps = assemble_laps(&starts, &ends);
        assert_eq!(laps, vec![("SVF".to_string(), 64_415)]);
    }

    #[test]
    fn test_end_without_start_skipped_silently() {
        let starts = vec![event("SVF", 12, 2, 58, 0)];
        let ends = vec![event("SVF", 12, 4, 2, 415), event("LHM", 12, 5, 0, 0)];

        // LHM has no start, so only SVF's lap comes out
        let laps = assemble_laps(&starts, &ends);
        assert_eq!(laps.len(), 1);
        assert_eq!(laps[0].0, "SVF");
    }

    #[test]
    fn test_start_without_end_never_emitted() {
        let starts = vec![event("SVF", 12, 2, 58, 0), event("LHM", 12, 3, 0, 0)];
        let ends = vec![event("SVF", 12, 4, 2, 415)];

        let laps = assemble_laps(&starts, &ends);
        assert_eq!(laps.len(), 1);
        assert_eq!(laps[0].0, "SVF");
    }

    #[test]
    fn test_duplicate_codes_last_line_wins() {
        let starts = vec![event("SVF", 12, 0, 0, 0), event("SVF", 12, 2, 58, 0)];
        let ends = vec![event("SVF", 12, 4, 0, 0), event("SVF", 12, 4, 2, 415)];

        let laps = assemble_laps(&starts, &ends);
        assert_eq!(laps, vec![("SVF".to_string(), 64_415)]);
    }

    #[test]
    fn test_negative_duration_passes_through() {
        // End before start; the repository is the one that rejects this
        let starts = vec![event("SVF", 12, 4, 0, 0)];
        let ends = vec![event("SVF", 12, 3, 0, 0)];

        let laps = assemble_laps(&starts, &ends);
        assert_eq!(laps, vec![("SVF".to_string(), -60_000)]);
    }

    #[test]
    fn test_resolver_is_idempotent_within_run() {
        let repo = RaceRepository::in_memory().unwrap();
        let mut resolver = AbbreviationResolver::new(vec![AbbreviationRecord {
            code: "RAI".to_string(),
            name: "Kimi Raikkonen".to_string(),
            team: "FERRARI".to_string(),
        }]);

        let first = resolver.resolve(&repo, "RAI").unwrap();
        let second = resolver.resolve(&repo, "RAI").unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(repo.racer_count().unwrap(), 1);
    }

    #[test]
    fn test_resolver_rejects_unknown_code() {
        let repo = RaceRepository::in_memory().unwrap();
        let mut resolver = AbbreviationResolver::new(Vec::new());

        let err = resolver.resolve(&repo, "ZZZ").unwrap_err();
        assert!(matches!(err, Error::UnknownAbbreviation(code) if code == "ZZZ"));
    }

    #[test]
    fn test_ingest_racers_from_fixture() {
        let repo = RaceRepository::in_memory().unwrap();
        let count = ingest_racers(&repo, &testdata("abbreviations.txt")).unwrap();
        assert_eq!(count, 20);
        assert_eq!(repo.racer_count().unwrap(), 20);
    }

    #[test]
    fn test_ingest_race_from_fixture() {
        let repo = RaceRepository::in_memory().unwrap();
        let race = ingest_race(&repo, &testdata("race_data.txt")).unwrap();
        assert_eq!(race.year, "2018");
        assert_eq!(race.location, "Monaco");
        assert_eq!(race.race_name, "Monaco Grand Prix");
    }

    #[test]
    fn test_ingest_lap_times_from_fixtures() {
        let repo = RaceRepository::in_memory().unwrap();
        ingest_racers(&repo, &testdata("abbreviations.txt")).unwrap();
        let race = ingest_race(&repo, &testdata("race_data.txt")).unwrap();

        let created = ingest_lap_times(
            &repo,
            &testdata("start.log"),
            &testdata("end.log"),
            &testdata("abbreviations.txt"),
            &race,
        )
        .unwrap();

        assert_eq!(created, 20);
        assert_eq!(repo.lap_time_count().unwrap(), 20);

        // Re-running the lap-time step never duplicates racers
        assert_eq!(repo.racer_count().unwrap(), 20);
    }
}
