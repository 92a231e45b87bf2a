//! SQLite repository for racers, races and lap times

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::schema::create_tables;
use crate::error::{Error, Result};

/// A racer identity, created once per abbreviation code
#[derive(Debug, Clone)]
pub struct Racer {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub team: String,
}

/// Race metadata from one ingestion run
#[derive(Debug, Clone)]
pub struct Race {
    pub id: i64,
    pub year: String,
    pub location: String,
    pub race_name: String,
}

/// One completed lap for a racer in a race
#[derive(Debug, Clone)]
pub struct LapTime {
    pub id: i64,
    pub racer_id: i64,
    pub race_id: i64,
    pub duration_ms: i64,
}

/// A racer joined with its lap aggregates, as the report queries see it
#[derive(Debug, Clone)]
pub struct RacerStats {
    pub racer: Racer,
    pub laps: i64,
    pub best_lap_ms: Option<i64>,
}

/// Repository for race telemetry data
pub struct RaceRepository {
    conn: Connection,
}

impl RaceRepository {
    /// Open a repository, initializing the database if needed
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)?;

        // Enable foreign keys
        conn.execute("PRAGMA foreign_keys = ON", [])?;

        // Create tables if they don't exist
        create_tables(&conn)?;

        Ok(Self { conn })
    }

    /// Create an in-memory repository (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        create_tables(&conn)?;
        Ok(Self { conn })
    }

    // ==================== Insert Operations ====================

    /// Create-or-fetch a racer by its unique abbreviation code.
    ///
    /// The unique constraint on `code` guards the upsert: a second call with
    /// the same code returns the existing row unchanged.
    pub fn create_racer(&self, code: &str, name: &str, team: &str) -> Result<Racer> {
        self.conn.execute(
            "INSERT OR IGNORE INTO racers (code, name, team) VALUES (?1, ?2, ?3)",
            params![code, name, team],
        )?;

        let racer = self.conn.query_row(
            "SELECT id, code, name, team FROM racers WHERE code = ?1",
            [code],
            |row| {
                Ok(Racer {
                    id: row.get(0)?,
                    code: row.get(1)?,
                    name: row.get(2)?,
                    team: row.get(3)?,
                })
            },
        )?;

        Ok(racer)
    }

    /// Insert a race. Every ingestion run records a fresh row, no dedup.
    pub fn create_race(&self, year: &str, location: &str, race_name: &str) -> Result<Race> {
        self.conn.execute(
            "INSERT INTO races (year, location, race_name) VALUES (?1, ?2, ?3)",
            params![year, location, race_name],
        )?;

        Ok(Race {
            id: self.conn.last_insert_rowid(),
            year: year.to_string(),
            location: location.to_string(),
            race_name: race_name.to_string(),
        })
    }

    /// Insert a lap time. Negative durations are rejected, not clamped.
    pub fn create_lap_time(&self, racer: &Racer, race: &Race, duration_ms: i64) -> Result<LapTime> {
        if duration_ms < 0 {
            return Err(Error::InvariantViolation(format!(
                "negative lap duration {}ms for racer {}",
                duration_ms, racer.code
            )));
        }

        self.conn.execute(
            "INSERT INTO lap_times (racer_id, race_id, duration_ms) VALUES (?1, ?2, ?3)",
            params![racer.id, race.id, duration_ms],
        )?;

        Ok(LapTime {
            id: self.conn.last_insert_rowid(),
            racer_id: racer.id,
            race_id: race.id,
            duration_ms,
        })
    }

    // ==================== Query Operations ====================

    /// Get every racer with lap count and best lap, best lap first.
    /// Racers without any laps sort last, by code.
    pub fn racer_summaries(&self) -> Result<Vec<RacerStats>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT r.id, r.code, r.name, r.team,
                   COUNT(l.id), MIN(l.duration_ms)
            FROM racers r
            LEFT JOIN lap_times l ON l.racer_id = r.id
            GROUP BY r.id
            ORDER BY MIN(l.duration_ms) IS NULL, MIN(l.duration_ms), r.code
            "#,
        )?;

        let stats = stmt
            .query_map([], |row| {
                Ok(RacerStats {
                    racer: Racer {
                        id: row.get(0)?,
                        code: row.get(1)?,
                        name: row.get(2)?,
                        team: row.get(3)?,
                    },
                    laps: row.get(4)?,
                    best_lap_ms: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(stats)
    }

    /// Get one racer with its lap aggregates, if the code exists
    pub fn racer_stats_by_code(&self, code: &str) -> Result<Option<RacerStats>> {
        let stats = self
            .conn
            .query_row(
                r#"
                SELECT r.id, r.code, r.name, r.team,
                       COUNT(l.id), MIN(l.duration_ms)
                FROM racers r
                LEFT JOIN lap_times l ON l.racer_id = r.id
                WHERE r.code = ?1
                GROUP BY r.id
                "#,
                [code],
                |row| {
                    Ok(RacerStats {
                        racer: Racer {
                            id: row.get(0)?,
                            code: row.get(1)?,
                            name: row.get(2)?,
                            team: row.get(3)?,
                        },
                        laps: row.get(4)?,
                        best_lap_ms: row.get(5)?,
                    })
                },
            )
            .optional()?;

        Ok(stats)
    }

    /// Get racer count
    pub fn racer_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM racers", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get race count
    pub fn race_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM races", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get lap time count
    pub fn lap_time_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM lap_times", [], |row| row.get(0))?;
        Ok(count)
    }
}
