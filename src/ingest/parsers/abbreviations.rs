//! Abbreviation table parser (`CODE_FullName_TeamName`).

use crate::error::{Error, Result};

/// One row of the abbreviation table
#[derive(Debug, Clone)]
pub struct AbbreviationRecord {
    pub code: String,
    pub name: String,
    pub team: String,
}

/// Parse the abbreviation table, one racer per line.
///
/// Blank lines are skipped. Underscores inside the team name are kept
/// intact, only the first two delimit fields.
pub fn parse(input: &str) -> impl Iterator<Item = Result<AbbreviationRecord>> + '_ {
    input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
}

fn parse_line(line: &str) -> Result<AbbreviationRecord> {
    let fields: Vec<&str> = line.trim().splitn(3, '_').collect();
    if fields.len() < 3 {
        return Err(Error::parse(line, "expected CODE_FullName_TeamName"));
    }

    let (code, name, team) = (fields[0].trim(), fields[1].trim(), fields[2].trim());
    if code.len() != 3 {
        return Err(Error::parse(line, "abbreviation code must be 3 characters"));
    }
    if name.is_empty() || team.is_empty() {
        return Err(Error::parse(line, "racer name and team must not be empty"));
    }

    Ok(AbbreviationRecord {
        code: code.to_string(),
        name: name.to_string(),
        team: team.to_string(),
    })
}
