//! Loading of historical game results into [GameRecord]s.

use std::io;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use ordinalizer::Ordinal;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{Display, EnumCount, EnumIter};
use thiserror::Error;
use tracing::{debug, info};

use crate::csv::{CsvReader, Record};

/// Spellings treated as an absent value in a score cell.
const NULL_MARKERS: [&str; 10] = [
    "", "NA", "N/A", "NaN", "nan", "null", "NULL", "None", "#N/A", "<NA>",
];

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// The columns read from the source, named by their header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Ordinal, EnumCount, EnumIter, Display)]
pub enum Column {
    #[strum(serialize = "gameDate")]
    GameDate,
    #[strum(serialize = "hometeamName")]
    HomeTeam,
    #[strum(serialize = "awayteamName")]
    AwayTeam,
    #[strum(serialize = "homeScore")]
    HomeScore,
    #[strum(serialize = "awayScore")]
    AwayScore,
}

impl From<Column> for usize {
    fn from(column: Column) -> Self {
        column.ordinal()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("cannot read row {row}: {source}")]
    Read { row: usize, source: csv::Error },

    #[error("missing column {0}")]
    MissingColumn(Column),

    #[error("invalid {column} '{value}' in row {row}")]
    InvalidScore {
        row: usize,
        column: Column,
        value: String,
    },

    #[error("invalid gameDate '{value}' in row {row}")]
    InvalidDate { row: usize, value: String },
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadStats {
    pub rows_read: usize,
    pub missing_score: usize,
    pub negative_score: usize,
}
impl LoadStats {
    pub fn rows_dropped(&self) -> usize {
        self.missing_score + self.negative_score
    }
}

#[derive(Debug)]
pub struct Dataset {
    pub games: Vec<GameRecord>,
    pub stats: LoadStats,
}

pub fn load_games(path: impl AsRef<Path>) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    debug!("loading games from {}", path.display());
    let csv = CsvReader::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_games(csv)
}

pub fn read_games<R: Read>(mut csv: CsvReader<R>) -> Result<Dataset, LoadError> {
    let mut positions = Vec::with_capacity(Column::COUNT);
    for column in Column::iter() {
        let position = csv
            .position(&column.to_string())
            .map_err(|source| LoadError::Read { row: 0, source })?;
        positions.push(position.ok_or(LoadError::MissingColumn(column))?);
    }

    let mut games = vec![];
    let mut stats = LoadStats::default();
    while let Some(row) = csv.read() {
        stats.rows_read += 1;
        let row_number = stats.rows_read;
        let row = row.map_err(|source| LoadError::Read {
            row: row_number,
            source,
        })?;
        let record = Record::project(&row, &positions);

        let (home_score, away_score) = match (
            parse_score(&record, Column::HomeScore, row_number)?,
            parse_score(&record, Column::AwayScore, row_number)?,
        ) {
            (Some(home_score), Some(away_score)) => (home_score, away_score),
            _ => {
                debug!("dropping row {row_number}: missing score");
                stats.missing_score += 1;
                continue;
            }
        };
        let (Some(home_score), Some(away_score)) = (coerce_score(home_score), coerce_score(away_score)) else {
            debug!("dropping row {row_number}: negative score {home_score}-{away_score}");
            stats.negative_score += 1;
            continue;
        };

        let date = parse_date(&record[Column::GameDate]).ok_or_else(|| LoadError::InvalidDate {
            row: row_number,
            value: record[Column::GameDate].to_string(),
        })?;
        games.push(GameRecord {
            date,
            home_team: record[Column::HomeTeam].trim().to_string(),
            away_team: record[Column::AwayTeam].trim().to_string(),
            home_score,
            away_score,
        });
    }

    info!(
        "loaded {} games from {} rows ({} dropped)",
        games.len(),
        stats.rows_read,
        stats.rows_dropped()
    );
    Ok(Dataset { games, stats })
}

/// Parses a score cell, yielding `None` for an absent value. Values that cannot be held as a score once
/// truncated are rejected.
fn parse_score(record: &Record, column: Column, row: usize) -> Result<Option<f64>, LoadError> {
    let raw = record[column].trim();
    if NULL_MARKERS.contains(&raw) {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_nan() => Ok(None),
        Ok(value) if value.is_finite() && value.trunc() <= u32::MAX as f64 => Ok(Some(value)),
        _ => Err(LoadError::InvalidScore {
            row,
            column,
            value: raw.to_string(),
        }),
    }
}

/// Truncates a score towards zero, rejecting anything that remains negative. Values beyond `u32::MAX`
/// saturate.
pub fn coerce_score(value: f64) -> Option<u32> {
    let truncated = value.trunc();
    if truncated < 0.0 {
        None
    } else {
        Some(truncated as u32)
    }
}

/// Parses the calendar date of a game, ignoring any time of day. Timestamps carrying an offset keep the
/// date as written.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|datetime| datetime.date())
        .or_else(|| NaiveDate::parse_from_str(raw, DATE_FORMAT).ok())
}
