//! Race header parser (`Year Location RaceName` on one descriptive line).

use regex::Regex;

use crate::error::{Error, Result};

/// Race metadata extracted from the header line
#[derive(Debug, Clone)]
pub struct RaceHeader {
    pub year: String,
    pub location: String,
    pub race_name: String,
}

/// Parse the first non-empty line of a race-data file.
///
/// Token split convention: the first token is the 4-digit year, the second
/// is the location, everything after that is the race name.
/// "2018 Monaco Monaco Grand Prix" therefore becomes year "2018",
/// location "Monaco", race name "Monaco Grand Prix".
pub fn parse(input: &str) -> Result<RaceHeader> {
    let line = input
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| Error::parse("", "race data file has no header line"))?;

    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(Error::parse(line, "expected year, location and race name"));
    }

    let year_re = Regex::new(r"^\d{4}$").unwrap();
    if !year_re.is_match(tokens[0]) {
        return Err(Error::parse(line, "first token must be a 4-digit year"));
    }

    Ok(RaceHeader {
        year: tokens[0].to_string(),
        location: tokens[1].to_string(),
        race_name: tokens[2..].join(" "),
    })
}
