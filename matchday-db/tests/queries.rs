use chrono::NaiveDate;
use matchday_core::{MatchRecord, StatLine};
use matchday_db::*;

fn store(conn: &rusqlite::Connection, id: &str, home: &str, away: &str, day: u32, stats: Vec<StatLine>) {
    let mut record = MatchRecord::new(id, format!("https://www.flashscore.pl/mecz/{id}/"));
    record.home_team = Some(home.to_string());
    record.away_team = Some(away.to_string());
    record.kickoff = NaiveDate::from_ymd_opt(2023, 8, day)
        .unwrap()
        .and_hms_opt(18, 0, 0);
    record.basic_stats = stats;
    let refs = resolve_match_refs(conn, &record).unwrap();
    insert_match(conn, &record, &refs).unwrap();
    if !record.basic_stats.is_empty() {
        insert_statistics(conn, id, &record.statistic_row()).unwrap();
    }
}

#[test]
fn load_match_data_orders_by_date() {
    let conn = open_memory().unwrap();
    store(&conn, "late", "Raków", "Pogoń", 20, vec![]);
    store(&conn, "early", "Legia", "Lech", 5, vec![StatLine::new("Faule", "10", "12")]);

    let rows = load_match_data(&conn).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].match_id, "early");
    assert_eq!(rows[0].home_team, "Legia");
    assert_eq!(rows[0].away_team, "Lech");
    assert_eq!(rows[0].date_time.as_deref(), Some("2023-08-05 18:00:00"));
    assert_eq!(rows[1].match_id, "late");
}

#[test]
fn load_match_data_statistics_are_sparse() {
    let conn = open_memory().unwrap();
    store(&conn, "a", "Legia", "Lech", 1, vec![StatLine::new("Faule", "10", "12")]);
    store(&conn, "b", "Raków", "Pogoń", 2, vec![StatLine::new("Spalone", "3", "1")]);
    store(&conn, "c", "Górnik", "Piast", 3, vec![]);

    let rows = load_match_data(&conn).unwrap();
    assert_eq!(rows[0].statistics.get("home_fouls").map(String::as_str), Some("10"));
    assert!(!rows[0].statistics.contains_key("home_offsides"));
    assert_eq!(rows[1].statistics.get("away_offsides").map(String::as_str), Some("1"));
    assert!(rows[2].statistics.is_empty());
}

#[test]
fn store_counts_reflect_inserts() {
    let conn = open_memory().unwrap();
    store(&conn, "a", "Legia", "Lech", 1, vec![StatLine::new("Faule", "10", "12")]);
    store(&conn, "b", "Lech", "Legia", 2, vec![]);

    let counts = store_counts(&conn).unwrap();
    assert_eq!(counts.teams, 2);
    assert_eq!(counts.matches, 2);
    assert_eq!(counts.statistics, 1);
    assert_eq!(counts.referees, 0);
}

#[test]
fn empty_store_loads_nothing() {
    let conn = open_memory().unwrap();
    assert!(load_match_data(&conn).unwrap().is_empty());
}
