//! SQLite schema definitions for race telemetry
//!
//! Tables:
//! - racers: One row per abbreviation code (unique)
//! - races: One row per ingestion run of a race-header file
//! - lap_times: One completed lap per racer per race

use rusqlite::{Connection, Result};

/// Create all tables in the database
pub fn create_tables(conn: &Connection) -> Result<()> {
    // Racer identities, keyed by their unique 3-letter code
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS racers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            team TEXT NOT NULL
        )
        "#,
        [],
    )?;

    // Race metadata; a new row is inserted on every ingestion run
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS races (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            year TEXT NOT NULL,
            location TEXT NOT NULL,
            race_name TEXT NOT NULL,
            created_at TEXT DEFAULT (datetime('now'))
        )
        "#,
        [],
    )?;

    // Completed laps; duration is end minus start in milliseconds
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS lap_times (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            racer_id INTEGER NOT NULL REFERENCES racers(id),
            race_id INTEGER NOT NULL REFERENCES races(id),
            duration_ms INTEGER NOT NULL CHECK (duration_ms >= 0)
        )
        "#,
        [],
    )?;

    // Create indexes for common queries
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_lap_times_racer ON lap_times(racer_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_lap_times_race ON lap_times(race_id)",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_create_tables() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        // Verify tables exist
        let count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN
                 ('racers', 'races', 'lap_times')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_create_tables_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        // Should not fail on second call
        create_tables(&conn).unwrap();
    }
}
