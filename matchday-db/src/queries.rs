//! Read queries for the match database.
//!
//! Provides the flat match dataset consumed by analytics, plus store counts.

use std::collections::BTreeMap;

use rusqlite::Connection;

use crate::operations::OperationError;
use crate::schema::quote_ident;

// ── Match Data ──────────────────────────────────────────────────────────────

/// One match joined with its team names and statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchDataRow {
    pub match_id: String,
    pub date_time: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub status: Option<String>,
    pub referee: Option<String>,
    pub stadium: Option<String>,
    pub attendance: Option<u32>,
    pub url: String,
    /// Non-NULL statistic columns only (`home_<key>` / `away_<key>`)
    pub statistics: BTreeMap<String, String>,
}

/// Load every stored match, oldest first.
///
/// Matches without a statistics row are still returned, with an empty map.
pub fn load_match_data(conn: &Connection) -> Result<Vec<MatchDataRow>, OperationError> {
    let stat_columns = statistic_columns(conn)?;
    let mut select = String::from(
        "SELECT m.match_id, m.date_time, th.name, ta.name, m.home_score, m.away_score,
                m.status, r.name, s.name, m.attendance, m.url",
    );
    for column in &stat_columns {
        select.push_str(", ms.");
        select.push_str(&quote_ident(column));
    }
    select.push_str(
        "
         FROM matches m
         JOIN teams th ON th.team_id = m.home_team_id
         JOIN teams ta ON ta.team_id = m.away_team_id
         LEFT JOIN referees r ON r.referee_id = m.referee_id
         LEFT JOIN stadiums s ON s.stadium_id = m.stadium_id
         LEFT JOIN match_statistics ms ON ms.match_id = m.match_id
         ORDER BY m.date_time, m.match_id",
    );

    const FIXED: usize = 11;
    let mut stmt = conn.prepare(&select)?;
    let rows = stmt.query_map([], |row| {
        let mut statistics = BTreeMap::new();
        for (i, column) in stat_columns.iter().enumerate() {
            if let Some(value) = row.get::<_, Option<String>>(FIXED + i)? {
                statistics.insert(column.clone(), value);
            }
        }
        Ok(MatchDataRow {
            match_id: row.get(0)?,
            date_time: row.get(1)?,
            home_team: row.get(2)?,
            away_team: row.get(3)?,
            home_score: row.get(4)?,
            away_score: row.get(5)?,
            status: row.get(6)?,
            referee: row.get(7)?,
            stadium: row.get(8)?,
            attendance: row.get(9)?,
            url: row.get(10)?,
            statistics,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Statistic columns currently present on `match_statistics`, in table order.
pub fn statistic_columns(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("PRAGMA table_info(match_statistics)")?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
    let mut columns = Vec::new();
    for name in names {
        let name = name?;
        if name != "match_id" {
            columns.push(name);
        }
    }
    Ok(columns)
}

// ── Statistics ──────────────────────────────────────────────────────────────

/// Row counts across the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreCounts {
    pub teams: i64,
    pub referees: i64,
    pub stadiums: i64,
    pub matches: i64,
    pub statistics: i64,
}

/// Count the rows in every table.
pub fn store_counts(conn: &Connection) -> Result<StoreCounts, OperationError> {
    let count = |table: &str| -> rusqlite::Result<i64> {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
    };

    Ok(StoreCounts {
        teams: count("teams")?,
        referees: count("referees")?,
        stadiums: count("stadiums")?,
        matches: count("matches")?,
        statistics: count("match_statistics")?,
    })
}
