use std::cell::RefCell;

use chrono::NaiveDate;
use matchday_core::{MatchRecord, Season, StatLine};
use matchday_db::*;
use matchday_import::*;

fn season() -> Season {
    Season::from_label(
        "PKO BP Ekstraklasa 2023/2024",
        "https://www.flashscore.pl/pilka-nozna/polska/pko-bp-ekstraklasa-2023-2024/wyniki/",
    )
}

fn record(id: &str, home: &str, away: &str) -> MatchRecord {
    let mut record = MatchRecord::new(id, format!("https://www.flashscore.pl/mecz/{id}/"));
    record.season = "PKO BP Ekstraklasa 2023/2024".to_string();
    record.home_team = Some(home.to_string());
    record.away_team = Some(away.to_string());
    record.home_score = Some(1);
    record.away_score = Some(0);
    record.kickoff = NaiveDate::from_ymd_opt(2023, 8, 5)
        .unwrap()
        .and_hms_opt(17, 30, 0);
    record.referee_name = Some("Daniel Stefański".to_string());
    record.referee_nationality = Some("Polska".to_string());
    record.stadium_name = Some("Stadion Miejski".to_string());
    record.stadium_city = Some("Wrocław".to_string());
    record.attendance = Some(18_204);
    record.basic_stats = vec![StatLine::new("Rzuty rożne", "6", "2")];
    record
}

fn count(conn: &rusqlite::Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
        .unwrap()
}

#[test]
fn imports_every_complete_record() {
    let conn = open_memory().unwrap();
    let records = vec![
        record("a1", "Śląsk Wrocław", "Legia Warszawa"),
        record("a2", "Lech Poznań", "Śląsk Wrocław"),
    ];

    let stats = import_season(&conn, &season(), &records, None).unwrap();
    assert_eq!(stats.saved, 2);
    assert_eq!(stats.total, 2);
    assert_eq!(stats.failed, 0);

    let counts = store_counts(&conn).unwrap();
    assert_eq!(counts.matches, 2);
    assert_eq!(counts.teams, 3);
    assert_eq!(counts.referees, 1);
    assert_eq!(counts.stadiums, 1);
    assert_eq!(counts.statistics, 2);

    let corners: String = conn
        .query_row(
            "SELECT home_corner_kicks FROM match_statistics WHERE match_id = 'a1'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(corners, "6");
}

#[test]
fn failed_match_rolls_back_alone() {
    let conn = open_memory().unwrap();
    // Same team on both sides violates the matches check constraint
    let records = vec![
        record("b1", "Raków Częstochowa", "Pogoń Szczecin"),
        record("b2", "Górnik Zabrze", "Górnik Zabrze"),
        record("b3", "Pogoń Szczecin", "Cracovia"),
    ];

    let stats = import_season(&conn, &season(), &records, None).unwrap();
    assert_eq!(stats.saved, 2);
    assert_eq!(stats.failed, 1);

    assert_eq!(count(&conn, "matches"), 2);
    assert!(!match_exists(&conn, "b2").unwrap());
    // The team resolved for the failed match was rolled back with it
    let gornik: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM teams WHERE name = 'Górnik Zabrze'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(gornik, 0);
}

#[test]
fn already_stored_matches_are_counted_not_rewritten() {
    let conn = open_memory().unwrap();
    let first = vec![record("c1", "Jagiellonia Białystok", "Widzew Łódź")];
    import_season(&conn, &season(), &first, None).unwrap();

    let second = vec![
        record("c1", "Jagiellonia Białystok", "Widzew Łódź"),
        record("c2", "Widzew Łódź", "Jagiellonia Białystok"),
    ];
    let stats = import_season(&conn, &season(), &second, None).unwrap();
    assert_eq!(stats.saved, 1);
    assert_eq!(stats.already_stored, 1);
    assert_eq!(stats.failed, 0);
    assert_eq!(count(&conn, "matches"), 2);
}

#[test]
fn incomplete_records_are_never_written() {
    let conn = open_memory().unwrap();
    let mut no_away = record("d1", "Korona Kielce", "x");
    no_away.away_team = None;
    let mut blank_home = record("d2", "  ", "Zagłębie Lubin");
    blank_home.home_team = Some("  ".to_string());

    let stats = import_season(
        &conn,
        &season(),
        &[no_away, blank_home, record("d3", "Korona Kielce", "Zagłębie Lubin")],
        None,
    )
    .unwrap();
    assert_eq!(stats.skipped_incomplete, 2);
    assert_eq!(stats.saved, 1);
    assert_eq!(count(&conn, "matches"), 1);
    assert!(!match_exists(&conn, "d1").unwrap());
}

#[test]
fn missing_attendance_is_stored_as_null() {
    let conn = open_memory().unwrap();
    let mut rec = record("e1", "Stal Mielec", "Puszcza Niepołomice");
    rec.attendance = None;
    rec.referee_name = None;
    rec.basic_stats.clear();

    let stats = import_season(&conn, &season(), &[rec], None).unwrap();
    assert_eq!(stats.saved, 1);

    let (attendance, referee): (Option<i64>, Option<i64>) = conn
        .query_row(
            "SELECT attendance, referee_id FROM matches WHERE match_id = 'e1'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(attendance, None);
    assert_eq!(referee, None);
    // No statistics shown still leaves a bare statistics row
    assert_eq!(count(&conn, "match_statistics"), 1);
    let shown: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM match_statistics WHERE match_id = 'e1'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(shown, 1);
}

#[test]
fn unreadable_matches_table_fails_each_match_not_the_season() {
    let conn = open_memory().unwrap();
    conn.execute_batch("DROP TABLE match_statistics; DROP TABLE matches;")
        .unwrap();
    let records = vec![
        record("g1", "Korona Kielce", "Motor Lublin"),
        record("g2", "Motor Lublin", "Korona Kielce"),
    ];

    let stats = import_season(&conn, &season(), &records, None).unwrap();
    assert_eq!(stats.failed, 2);
    assert_eq!(stats.saved, 0);
    assert_eq!(stats.already_stored, 0);
    // The season still commits, with nothing written for either match
    assert_eq!(count(&conn, "teams"), 0);
}

#[test]
fn reports_progress_per_record() {
    struct Recorder(RefCell<Vec<(usize, usize, String)>>);

    impl HarvestProgress for Recorder {
        fn on_phase(&self, _message: &str) {}
        fn on_season_start(&self, _index: usize, _total: usize, _season: &Season) {}
        fn on_matches_found(&self, _season: &Season, _count: usize) {}
        fn on_extracted(&self, _done: usize, _total: usize) {}
        fn on_match(&self, current: usize, total: usize, name: &str) {
            self.0.borrow_mut().push((current, total, name.to_string()));
        }
        fn on_season_complete(&self, _report: &SeasonReport) {}
        fn on_complete(&self, _message: &str) {}
    }

    let conn = open_memory().unwrap();
    let recorder = Recorder(RefCell::new(Vec::new()));
    let records = vec![
        record("f1", "Radomiak Radom", "Warta Poznań"),
        record("f2", "Warta Poznań", "Radomiak Radom"),
    ];
    import_season(&conn, &season(), &records, Some(&recorder)).unwrap();

    let seen = recorder.0.into_inner();
    assert_eq!(
        seen,
        vec![
            (1, 2, "Radomiak Radom vs Warta Poznań".to_string()),
            (2, 2, "Warta Poznań vs Radomiak Radom".to_string()),
        ]
    );
}
