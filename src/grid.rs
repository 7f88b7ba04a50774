//! The scorigami grid: every (winning score, losing score) combination from a fixed floor up to the
//! highest observed score, with the games that produced each one.
//!
//! Aggregation runs in two phases. [ScoreGroups] attributes each game to its cell key in input order;
//! [expand] then walks [GridBounds] and emits exactly one [ScoreCellEntry] per key, moving observed
//! entries across and synthesising vacant ones for the rest.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, NaiveDate, Utc};
use rustc_hash::FxHashMap;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::debug;

use crate::data::GameRecord;

/// The lowest score represented in the grid, on either side.
pub const SCORE_FLOOR: u32 = 50;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridConfig {
    pub floor: u32,
}
impl Default for GridConfig {
    fn default() -> Self {
        Self { floor: SCORE_FLOOR }
    }
}

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("no valid game records to aggregate")]
    NoValidData,

    #[error("grid up to max score {max_score} is too large to allocate")]
    GridTooLarge { max_score: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScoreCellKey {
    pub winning_score: u32,
    pub losing_score: u32,
}
impl ScoreCellKey {
    pub fn new(winning_score: u32, losing_score: u32) -> Self {
        Self {
            winning_score,
            losing_score,
        }
    }
}

impl Display for ScoreCellKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.winning_score, self.losing_score)
    }
}

/// A single game seen from the winner's side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreOutcome {
    pub winning_score: u32,
    pub losing_score: u32,
    pub winning_team: String,
    pub losing_team: String,
    pub winner: Side,
    pub game_date: NaiveDate,
}
impl ScoreOutcome {
    pub fn key(&self) -> ScoreCellKey {
        ScoreCellKey::new(self.winning_score, self.losing_score)
    }
}

impl From<&GameRecord> for ScoreOutcome {
    /// The home side wins only on a strictly higher score; a tie is credited to the away side.
    fn from(game: &GameRecord) -> Self {
        if game.home_score > game.away_score {
            Self {
                winning_score: game.home_score,
                losing_score: game.away_score,
                winning_team: game.home_team.clone(),
                losing_team: game.away_team.clone(),
                winner: Side::Home,
                game_date: game.date,
            }
        } else {
            Self {
                winning_score: game.away_score,
                losing_score: game.home_score,
                winning_team: game.away_team.clone(),
                losing_team: game.home_team.clone(),
                winner: Side::Away,
                game_date: game.date,
            }
        }
    }
}

impl Serialize for ScoreOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ScoreOutcome", 4)?;
        state.serialize_field("date", &self.game_date.format(DATE_FORMAT).to_string())?;
        state.serialize_field("winning_team", &self.winning_team)?;
        state.serialize_field("losing_team", &self.losing_team)?;
        state.serialize_field("score", &self.key().to_string())?;
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreCellEntry {
    pub winning_score: u32,
    pub losing_score: u32,
    pub occurred: bool,
    pub games: Vec<ScoreOutcome>,
}
impl ScoreCellEntry {
    pub fn observed(first: ScoreOutcome) -> Self {
        Self {
            winning_score: first.winning_score,
            losing_score: first.losing_score,
            occurred: true,
            games: vec![first],
        }
    }

    pub fn vacant(key: ScoreCellKey) -> Self {
        Self {
            winning_score: key.winning_score,
            losing_score: key.losing_score,
            occurred: false,
            games: vec![],
        }
    }

    pub fn key(&self) -> ScoreCellKey {
        ScoreCellKey::new(self.winning_score, self.losing_score)
    }
}

/// Observed cells in the order their keys were first encountered.
#[derive(Debug, Default)]
pub struct ScoreGroups {
    index: FxHashMap<ScoreCellKey, usize>,
    entries: Vec<ScoreCellEntry>,
}
impl ScoreGroups {
    pub fn from_games<'a>(games: impl IntoIterator<Item = &'a GameRecord>) -> Self {
        let mut groups = Self::default();
        for game in games {
            groups.push(ScoreOutcome::from(game));
        }
        groups
    }

    fn push(&mut self, outcome: ScoreOutcome) {
        let key = outcome.key();
        match self.index.get(&key) {
            Some(&position) => self.entries[position].games.push(outcome),
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(ScoreCellEntry::observed(outcome));
            }
        }
    }

    pub fn get(&self, key: &ScoreCellKey) -> Option<&ScoreCellEntry> {
        self.index.get(key).map(|&position| &self.entries[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoreCellEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for ScoreGroups {
    type Item = ScoreCellEntry;
    type IntoIter = std::vec::IntoIter<ScoreCellEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// The triangular key space `floor <= losing_score < winning_score <= max_score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    pub floor: u32,
    pub max_score: u32,
}
impl GridBounds {
    pub fn from_games(games: &[GameRecord], config: &GridConfig) -> Result<Self, AggregateError> {
        let max_score = games
            .iter()
            .flat_map(|game| [game.home_score, game.away_score])
            .max()
            .ok_or(AggregateError::NoValidData)?;
        Ok(Self {
            floor: config.floor,
            max_score,
        })
    }

    pub fn contains(&self, key: &ScoreCellKey) -> bool {
        self.floor <= key.losing_score
            && key.losing_score < key.winning_score
            && key.winning_score <= self.max_score
    }

    /// Keys in emission order: winning score ascending, then losing score ascending.
    pub fn keys(&self) -> impl Iterator<Item = ScoreCellKey> {
        let floor = self.floor;
        (floor..=self.max_score).flat_map(move |winning_score| {
            (floor..winning_score).map(move |losing_score| ScoreCellKey::new(winning_score, losing_score))
        })
    }

    /// Number of keys in the grid, or `None` if it does not fit in a `usize`.
    pub fn cell_count(&self) -> Option<usize> {
        let span = usize::try_from(self.max_score.saturating_sub(self.floor)).ok()?;
        span.checked_mul(span.checked_add(1)?).map(|product| product / 2)
    }
}

/// Lays the observed groups over the full grid. Groups whose keys fall outside `bounds` are left out.
pub fn expand(groups: ScoreGroups, bounds: &GridBounds) -> Result<Vec<ScoreCellEntry>, AggregateError> {
    let too_large = || AggregateError::GridTooLarge {
        max_score: bounds.max_score,
    };
    let cell_count = bounds.cell_count().ok_or_else(too_large)?;
    let mut cells = Vec::new();
    cells.try_reserve_exact(cell_count).map_err(|_| too_large())?;

    let mut observed: FxHashMap<_, _> = groups
        .into_iter()
        .filter(|entry| bounds.contains(&entry.key()))
        .map(|entry| (entry.key(), entry))
        .collect();
    for key in bounds.keys() {
        cells.push(
            observed
                .remove(&key)
                .unwrap_or_else(|| ScoreCellEntry::vacant(key)),
        );
    }
    debug_assert!(observed.is_empty());
    Ok(cells)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScorigamiReport {
    pub last_updated: DateTime<Utc>,
    pub max_score: u32,
    pub total_games: usize,
    pub unique_scores: usize,
    pub scores: Vec<ScoreCellEntry>,
}
impl ScorigamiReport {
    pub fn cell(&self, winning_score: u32, losing_score: u32) -> Option<&ScoreCellEntry> {
        self.scores
            .iter()
            .find(|entry| entry.winning_score == winning_score && entry.losing_score == losing_score)
    }

    pub fn occurred_cells(&self) -> usize {
        self.scores.iter().filter(|entry| entry.occurred).count()
    }
}

pub fn aggregate(games: &[GameRecord], config: &GridConfig) -> Result<ScorigamiReport, AggregateError> {
    let bounds = GridBounds::from_games(games, config)?;
    let groups = ScoreGroups::from_games(games);
    let unique_scores = groups.len();
    debug!(
        "grouped {} games into {unique_scores} score combinations, max score {}",
        games.len(),
        bounds.max_score
    );

    let scores = expand(groups, &bounds)?;
    debug!("expanded grid to {} cells", scores.len());
    Ok(ScorigamiReport {
        last_updated: Utc::now(),
        max_score: bounds.max_score,
        total_games: games.len(),
        unique_scores,
        scores,
    })
}
