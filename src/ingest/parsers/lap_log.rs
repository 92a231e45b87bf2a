//! Lap telemetry log parser (3-letter code + millisecond timestamp).

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::error::{Error, Result};

/// One start or end event from a telemetry log
#[derive(Debug, Clone)]
pub struct LapEvent {
    pub code: String,
    pub timestamp: NaiveDateTime,
}

/// Parse a start or end log, one event per line.
///
/// Lines look like `SVF2018-05-24_12:02:58.917`. The date segment is
/// optional; some loggers emit only the time of day, in which case events
/// are anchored to a common placeholder date so durations still subtract.
pub fn parse(input: &str) -> impl Iterator<Item = Result<LapEvent>> + '_ {
    let re = Regex::new(r"^([A-Z]{3})(?:(\d{4}-\d{2}-\d{2})_)?(\d{2}:\d{2}:\d{2}\.\d{3})$").unwrap();
    input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(move |line| parse_line(&re, line))
}

fn parse_line(re: &Regex, line: &str) -> Result<LapEvent> {
    let trimmed = line.trim();
    let caps = re
        .captures(trimmed)
        .ok_or_else(|| Error::parse(line, "expected CODE[YYYY-MM-DD_]HH:MM:SS.mmm"))?;

    let time = NaiveTime::parse_from_str(&caps[3], "%H:%M:%S%.3f")
        .map_err(|e| Error::parse(line, format!("malformed timestamp: {e}")))?;

    let date = match caps.get(2) {
        Some(date) => NaiveDate::parse_from_str(date.as_str(), "%Y-%m-%d")
            .map_err(|e| Error::parse(line, format!("malformed date: {e}")))?,
        None => NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
    };

    Ok(LapEvent {
        code: caps[1].to_string(),
        timestamp: date.and_time(time),
    })
}
