//! End-to-end processing: load the games, aggregate them into a report and write it out.

use std::path::Path;
use std::time::Instant;

use thiserror::Error;
use tracing::info;

use crate::data::{load_games, LoadError};
use crate::file::{WriteError, WriteJsonFile};
use crate::grid::{aggregate, AggregateError, GridConfig, ScorigamiReport};

/// Default location of the games dataset.
pub const DEFAULT_INPUT: &str = "data/Games.csv";

/// Default location of the generated grid.
pub const DEFAULT_OUTPUT: &str = "public/nba_scorigami.json";

#[derive(Debug, Error)]
pub enum ScorigamiError {
    #[error("load failed: {0}")]
    Load(#[from] LoadError),

    #[error("aggregate failed: {0}")]
    Aggregate(#[from] AggregateError),

    #[error("write failed: {0}")]
    Write(#[from] WriteError),
}

/// Builds the report from the dataset at `input` and saves it to `output`. Nothing is written unless
/// every stage succeeds.
pub fn process(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &GridConfig,
) -> Result<ScorigamiReport, ScorigamiError> {
    let (input, output) = (input.as_ref(), output.as_ref());

    let start_time = Instant::now();
    let dataset = load_games(input)?;
    info!(
        "read {} in {}s",
        input.display(),
        start_time.elapsed().as_millis() as f64 / 1_000.
    );

    let start_time = Instant::now();
    let report = aggregate(&dataset.games, config)?;
    info!(
        "aggregated {} games into {} score combinations in {}s",
        report.total_games,
        report.unique_scores,
        start_time.elapsed().as_millis() as f64 / 1_000.
    );

    report.write_json_file(output)?;
    info!(
        "saved {} score combinations to {}",
        report.scores.len(),
        output.display()
    );
    Ok(report)
}

#[cfg(test)]
mod tests;
