use stanza::style::{HAlign, Header, MinWidth, Styles};
use stanza::table::{Col, Row, Table};

use crate::grid::ScorigamiReport;

/// Fraction of grid cells that have occurred; zero for an empty grid.
pub fn coverage(report: &ScorigamiReport) -> f64 {
    if report.scores.is_empty() {
        0.
    } else {
        report.occurred_cells() as f64 / report.scores.len() as f64
    }
}

pub fn tabulate_summary(report: &ScorigamiReport) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(16)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec!["Measure".into(), "Value".into()],
        ));
    let rows = [
        ("Max score", report.max_score.to_string()),
        ("Total games", report.total_games.to_string()),
        ("Unique scores", report.unique_scores.to_string()),
        ("Grid cells", report.scores.len().to_string()),
        ("Occurred cells", report.occurred_cells().to_string()),
        ("Coverage", format!("{:.2}%", coverage(report) * 100.)),
    ];
    for (measure, value) in rows {
        table.push_row(Row::new(Styles::default(), vec![measure.into(), value.into()]));
    }
    table
}
