//! Entity resolution and match inserts.

use matchday_core::{MatchRecord, StatisticRow};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use thiserror::Error;

use crate::schema::{SchemaError, ensure_statistic_columns, quote_ident};

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("Could not resolve {kind} '{name}'")]
    Unresolved { kind: EntityKind, name: String },
    #[error("Match '{0}' is missing a team name")]
    MissingTeam(String),
}

/// Shared entities deduplicated by natural key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Keyed by name alone.
    Team,
    /// Keyed by (name, nationality).
    Referee,
    /// Keyed by (name, city).
    Stadium,
}

impl EntityKind {
    fn table(self) -> &'static str {
        match self {
            EntityKind::Team => "teams",
            EntityKind::Referee => "referees",
            EntityKind::Stadium => "stadiums",
        }
    }

    fn id_column(self) -> &'static str {
        match self {
            EntityKind::Team => "team_id",
            EntityKind::Referee => "referee_id",
            EntityKind::Stadium => "stadium_id",
        }
    }

    fn qualifier_column(self) -> Option<&'static str> {
        match self {
            EntityKind::Team => None,
            EntityKind::Referee => Some("nationality"),
            EntityKind::Stadium => Some("city"),
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Team => write!(f, "team"),
            EntityKind::Referee => write!(f, "referee"),
            EntityKind::Stadium => write!(f, "stadium"),
        }
    }
}

// ── Entity Resolution ───────────────────────────────────────────────────────

/// Return the id of the entity with this natural key, creating it if needed.
///
/// A blank or absent name resolves to `None` without touching the database.
/// A blank qualifier is stored as NULL. The insert is a single conditional
/// write; if it yields no row (another writer got there first) or fails, the
/// lookup is retried once before giving up.
pub fn resolve_entity(
    conn: &Connection,
    kind: EntityKind,
    name: Option<&str>,
    qualifier: Option<&str>,
) -> Result<Option<i64>, OperationError> {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };
    let qualifier = match kind.qualifier_column() {
        Some(_) => qualifier.map(str::trim).filter(|q| !q.is_empty()),
        None => None,
    };

    if let Some(id) = lookup_entity(conn, kind, name, qualifier)? {
        return Ok(Some(id));
    }

    match insert_entity(conn, kind, name, qualifier) {
        Ok(Some(id)) => {
            log::debug!("Created {} '{}' (id {})", kind, name, id);
            Ok(Some(id))
        }
        Ok(None) => match lookup_entity(conn, kind, name, qualifier)? {
            Some(id) => Ok(Some(id)),
            None => Err(OperationError::Unresolved {
                kind,
                name: name.to_string(),
            }),
        },
        Err(e) => {
            log::debug!("Insert of {} '{}' failed, re-querying: {}", kind, name, e);
            match lookup_entity(conn, kind, name, qualifier)? {
                Some(id) => Ok(Some(id)),
                None => Err(e),
            }
        }
    }
}

pub fn resolve_team(conn: &Connection, name: Option<&str>) -> Result<Option<i64>, OperationError> {
    resolve_entity(conn, EntityKind::Team, name, None)
}

pub fn resolve_referee(
    conn: &Connection,
    name: Option<&str>,
    nationality: Option<&str>,
) -> Result<Option<i64>, OperationError> {
    resolve_entity(conn, EntityKind::Referee, name, nationality)
}

pub fn resolve_stadium(
    conn: &Connection,
    name: Option<&str>,
    city: Option<&str>,
) -> Result<Option<i64>, OperationError> {
    resolve_entity(conn, EntityKind::Stadium, name, city)
}

fn lookup_entity(
    conn: &Connection,
    kind: EntityKind,
    name: &str,
    qualifier: Option<&str>,
) -> Result<Option<i64>, OperationError> {
    let id = match kind.qualifier_column() {
        Some(column) => conn
            .query_row(
                &format!(
                    "SELECT {} FROM {} WHERE name = ?1 AND {} IS ?2",
                    kind.id_column(),
                    kind.table(),
                    column
                ),
                params![name, qualifier],
                |row| row.get(0),
            )
            .optional()?,
        None => conn
            .query_row(
                &format!(
                    "SELECT {} FROM {} WHERE name = ?1",
                    kind.id_column(),
                    kind.table()
                ),
                params![name],
                |row| row.get(0),
            )
            .optional()?,
    };
    Ok(id)
}

fn insert_entity(
    conn: &Connection,
    kind: EntityKind,
    name: &str,
    qualifier: Option<&str>,
) -> Result<Option<i64>, OperationError> {
    let id = match kind.qualifier_column() {
        Some(column) => conn
            .query_row(
                &format!(
                    "INSERT INTO {} (name, {}) VALUES (?1, ?2)
                     ON CONFLICT DO NOTHING
                     RETURNING {}",
                    kind.table(),
                    column,
                    kind.id_column()
                ),
                params![name, qualifier],
                |row| row.get(0),
            )
            .optional()?,
        None => conn
            .query_row(
                &format!(
                    "INSERT INTO {} (name) VALUES (?1)
                     ON CONFLICT DO NOTHING
                     RETURNING {}",
                    kind.table(),
                    kind.id_column()
                ),
                params![name],
                |row| row.get(0),
            )
            .optional()?,
    };
    Ok(id)
}

// ── Match Operations ────────────────────────────────────────────────────────

/// Resolved foreign keys for one match row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRefs {
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub referee_id: Option<i64>,
    pub stadium_id: Option<i64>,
}

/// Resolve every shared entity a record references.
///
/// Fails with `MissingTeam` if either team name is absent; referee and
/// stadium are optional.
pub fn resolve_match_refs(
    conn: &Connection,
    record: &MatchRecord,
) -> Result<MatchRefs, OperationError> {
    let missing = || OperationError::MissingTeam(record.match_id.clone());
    let home_team_id = resolve_team(conn, record.home_team.as_deref())?.ok_or_else(missing)?;
    let away_team_id = resolve_team(conn, record.away_team.as_deref())?.ok_or_else(missing)?;
    let referee_id = resolve_referee(
        conn,
        record.referee_name.as_deref(),
        record.referee_nationality.as_deref(),
    )?;
    let stadium_id = resolve_stadium(
        conn,
        record.stadium_name.as_deref(),
        record.stadium_city.as_deref(),
    )?;

    Ok(MatchRefs {
        home_team_id,
        away_team_id,
        referee_id,
        stadium_id,
    })
}

/// Whether a match with this id is already stored.
pub fn match_exists(conn: &Connection, match_id: &str) -> Result<bool, OperationError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM matches WHERE match_id = ?1)",
        params![match_id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Insert the `matches` row for a record. Missing values are stored as NULL.
pub fn insert_match(
    conn: &Connection,
    record: &MatchRecord,
    refs: &MatchRefs,
) -> Result<(), OperationError> {
    let date_time = record
        .kickoff
        .map(|k| k.format("%Y-%m-%d %H:%M:%S").to_string());

    conn.execute(
        "INSERT INTO matches (match_id, home_team_id, away_team_id, home_score, away_score,
                              date_time, status, referee_id, stadium_id, attendance, url)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            record.match_id,
            refs.home_team_id,
            refs.away_team_id,
            record.home_score,
            record.away_score,
            date_time,
            record.status,
            refs.referee_id,
            refs.stadium_id,
            record.attendance,
            record.url,
        ],
    )?;
    Ok(())
}

/// Insert the statistics row for a match, adding any new columns first.
///
/// Only keys present in `row` are written; every other column stays NULL.
/// Returns the number of statistic columns written.
pub fn insert_statistics(
    conn: &Connection,
    match_id: &str,
    row: &StatisticRow,
) -> Result<usize, OperationError> {
    let columns = row.columns();
    let names: Vec<&str> = columns.iter().map(|(name, _)| name.as_str()).collect();
    ensure_statistic_columns(conn, &names)?;

    let mut column_list = String::from("match_id");
    let mut placeholders = String::from("?1");
    for (i, name) in names.iter().enumerate() {
        column_list.push_str(", ");
        column_list.push_str(&quote_ident(name));
        placeholders.push_str(&format!(", ?{}", i + 2));
    }

    let values = std::iter::once(match_id).chain(columns.iter().map(|(_, value)| *value));
    conn.execute(
        &format!("INSERT INTO match_statistics ({column_list}) VALUES ({placeholders})"),
        params_from_iter(values),
    )?;
    Ok(names.len())
}
