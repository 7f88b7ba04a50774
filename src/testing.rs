//! Testing helpers.

use std::fs::File;
use std::io;
use std::path::Path;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;

use crate::data::GameRecord;

pub const HEADER: &str = "gameDate,hometeamName,awayteamName,homeScore,awayScore";

pub fn game(date: &str, home_team: &str, away_team: &str, home_score: u32, away_score: u32) -> GameRecord {
    GameRecord {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        home_team: home_team.to_string(),
        away_team: away_team.to_string(),
        home_score,
        away_score,
    }
}

/// Renders games as CSV rows under [HEADER].
pub fn to_csv(games: &[GameRecord]) -> String {
    let mut csv = String::from(HEADER);
    csv.push('\n');
    for game in games {
        csv.push_str(&format!(
            "{},{},{},{},{}\n",
            game.date.format("%Y-%m-%d"),
            game.home_team,
            game.away_team,
            game.home_score,
            game.away_score
        ));
    }
    csv
}

/// Reads a JSON-encoded type from a given file `path`.
pub fn read_json<D: DeserializeOwned>(path: impl AsRef<Path>) -> Result<D, io::Error> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}
