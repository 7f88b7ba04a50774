use std::fs;

use serde_json::Value;

use super::*;
use crate::testing::{game, read_json, to_csv, HEADER};

#[test]
fn process_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Games.csv");
    let output = dir.path().join("public").join("scorigami.json");
    let mut contents = to_csv(&[
        game("2001-01-01", "Kings", "Suns", 150, 120),
        game("2001-01-02", "Jazz", "Nets", 120, 150),
        game("2001-01-03", "Heat", "Magic", 151, 90),
    ]);
    contents.push_str("2001-01-04,Bucks,Hawks,,\n");
    fs::write(&input, contents).unwrap();

    let report = process(&input, &output, &GridConfig::default()).unwrap();
    assert_eq!(3, report.total_games);
    assert_eq!(2, report.unique_scores);
    assert_eq!(151, report.max_score);

    let json: Value = read_json(&output).unwrap();
    assert_eq!(151, json["max_score"]);
    assert_eq!(3, json["total_games"]);
    assert_eq!(2, json["unique_scores"]);
    assert!(json["last_updated"].is_string());

    let scores = json["scores"].as_array().unwrap();
    assert_eq!(report.scores.len(), scores.len());
    assert_eq!((50..=151u64).map(|winning_score| winning_score - 50).sum::<u64>() as usize, scores.len());
    let cell = scores
        .iter()
        .find(|cell| cell["winning_score"] == 150 && cell["losing_score"] == 120)
        .unwrap();
    assert_eq!(true, cell["occurred"]);
    assert_eq!(
        serde_json::json!([
            {"date": "2001-01-01", "winning_team": "Kings", "losing_team": "Suns", "score": "150-120"},
            {"date": "2001-01-02", "winning_team": "Nets", "losing_team": "Jazz", "score": "150-120"}
        ]),
        cell["games"]
    );
    assert_eq!(serde_json::json!({"winning_score": 51, "losing_score": 50, "occurred": false, "games": []}), scores[0]);
}

#[test]
fn no_valid_data_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Games.csv");
    let output = dir.path().join("scorigami.json");
    fs::write(&input, format!("{HEADER}\n2001-01-01,Bucks,Hawks,,\n")).unwrap();

    let err = process(&input, &output, &GridConfig::default()).unwrap_err();
    assert!(matches!(err, ScorigamiError::Aggregate(AggregateError::NoValidData)), "{err:?}");
    assert!(err.to_string().starts_with("aggregate failed"), "{err}");
    assert!(!output.exists());
}

#[test]
fn load_failure_leaves_output_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("scorigami.json");
    fs::write(&output, "previous").unwrap();

    let err = process(dir.path().join("missing.csv"), &output, &GridConfig::default()).unwrap_err();
    assert!(matches!(err, ScorigamiError::Load(LoadError::Open { .. })), "{err:?}");
    assert!(err.to_string().starts_with("load failed"), "{err}");
    assert_eq!("previous", fs::read_to_string(&output).unwrap());
}

#[test]
fn write_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Games.csv");
    fs::write(&input, to_csv(&[game("2001-01-01", "Kings", "Suns", 101, 99)])).unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();

    let err = process(&input, blocker.join("scorigami.json"), &GridConfig::default()).unwrap_err();
    assert!(matches!(err, ScorigamiError::Write(WriteError::CreateDir { .. })), "{err:?}");
    assert!(err.to_string().starts_with("write failed"), "{err}");
}
