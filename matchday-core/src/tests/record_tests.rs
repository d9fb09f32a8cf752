use chrono::{NaiveDate, NaiveTime};

use super::*;
use crate::stats::StatSection;

#[test]
fn parse_kickoff_source_format() {
    let parsed = parse_kickoff("21.07.2023 20:30").unwrap();
    assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2023, 7, 21).unwrap());
    assert_eq!(parsed.time(), NaiveTime::from_hms_opt(20, 30, 0).unwrap());
}

#[test]
fn parse_kickoff_rejects_garbage() {
    assert_eq!(parse_kickoff("jutro"), None);
    assert_eq!(parse_kickoff(""), None);
}

#[test]
fn has_teams_requires_both_names() {
    let mut record = MatchRecord::new("abc", "https://example.test/mecz/abc");
    assert!(!record.has_teams());

    record.home_team = Some("Legia Warszawa".to_string());
    assert!(!record.has_teams());

    record.away_team = Some("  ".to_string());
    assert!(!record.has_teams());

    record.away_team = Some("Lech Poznań".to_string());
    assert!(record.has_teams());
}

#[test]
fn missing_score_is_not_zero() {
    let record = MatchRecord::new("abc", "u");
    assert_eq!(record.home_score, None);
    assert_ne!(record.home_score, Some(0));
}

#[test]
fn statistic_row_merges_both_sources() {
    let mut record = MatchRecord::new("abc", "u");
    record.basic_stats = vec![StatLine::new("Faule", "10", "11")];
    record.detailed_stats = vec![StatSection {
        title: "Obrona".to_string(),
        lines: vec![
            StatLine::new("Faule", "99", "99"),
            StatLine::new("Wybicia", "20", "14"),
        ],
    }];

    let row = record.statistic_row();
    assert_eq!(row.get("fouls").map(|p| p.home.as_str()), Some("10"));
    assert_eq!(row.get("clearances").map(|p| p.away.as_str()), Some("14"));
}

#[test]
fn display_name_uses_placeholders() {
    let mut record = MatchRecord::new("abc", "u");
    record.home_team = Some("Cracovia".to_string());
    assert_eq!(record.display_name(), "Cracovia vs Unknown");
}
