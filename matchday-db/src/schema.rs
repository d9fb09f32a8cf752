//! SQLite schema creation and migration.

use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Migration error: expected version {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },
    #[error("Invalid statistic column name: '{0}'")]
    InvalidColumn(String),
}

/// Current schema version. Increment when adding migrations.
pub const CURRENT_VERSION: i32 = 1;

/// Create all tables and indexes if they don't exist.
///
/// Idempotent; safe to call on an existing database.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SCHEMA_SQL)?;
    if get_schema_version(conn)? < CURRENT_VERSION {
        set_schema_version(conn, CURRENT_VERSION)?;
    }
    Ok(())
}

/// Open or create a match database at the given path.
pub fn open_database(path: &std::path::Path) -> Result<Connection, SchemaError> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

    let version = get_schema_version(&conn)?;
    if version == 0 {
        create_schema(&conn)?;
    } else if version < CURRENT_VERSION {
        migrate(&conn, version)?;
    } else if version > CURRENT_VERSION {
        return Err(SchemaError::VersionMismatch {
            expected: CURRENT_VERSION,
            found: version,
        });
    }

    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Add any of `columns` missing from `match_statistics` as nullable TEXT.
///
/// Statistic columns are not known up front: each match brings whatever
/// categories the source showed for it. Returns how many were added.
pub fn ensure_statistic_columns<S: AsRef<str>>(
    conn: &Connection,
    columns: &[S],
) -> Result<usize, SchemaError> {
    let existing = crate::queries::statistic_columns(conn)?;
    let mut added = 0;
    for column in columns {
        let column = column.as_ref();
        if !is_valid_column(column) {
            return Err(SchemaError::InvalidColumn(column.to_string()));
        }
        if existing.iter().any(|c| c.eq_ignore_ascii_case(column)) {
            continue;
        }
        conn.execute_batch(&format!(
            "ALTER TABLE match_statistics ADD COLUMN {} TEXT",
            quote_ident(column)
        ))?;
        log::debug!("Added statistic column {}", column);
        added += 1;
    }
    Ok(added)
}

/// Quote an identifier for interpolation into SQL.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Statistic columns must carry a side prefix and no control characters.
fn is_valid_column(name: &str) -> bool {
    (name.starts_with("home_") || name.starts_with("away_"))
        && name.len() > 5
        && !name.chars().any(char::is_control)
}

/// Get the current schema version, or 0 if no schema exists.
fn get_schema_version(conn: &Connection) -> Result<i32, SchemaError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Record a schema version.
fn set_schema_version(conn: &Connection, version: i32) -> Result<(), SchemaError> {
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Run migrations from `from_version` up to `CURRENT_VERSION`.
fn migrate(conn: &Connection, from_version: i32) -> Result<(), SchemaError> {
    if from_version > CURRENT_VERSION {
        return Err(SchemaError::VersionMismatch {
            expected: CURRENT_VERSION,
            found: from_version,
        });
    }

    // No incremental migrations yet; the base schema is idempotent.
    conn.execute_batch(SCHEMA_SQL)?;
    set_schema_version(conn, CURRENT_VERSION)?;
    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS teams (
    team_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS referees (
    referee_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    nationality TEXT
);
-- NULL qualifiers must still collide, so key on IFNULL rather than UNIQUE()
CREATE UNIQUE INDEX IF NOT EXISTS idx_referees_key ON referees(name, IFNULL(nationality, ''));

CREATE TABLE IF NOT EXISTS stadiums (
    stadium_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    city TEXT
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_stadiums_key ON stadiums(name, IFNULL(city, ''));

-- One row per harvested match, keyed by the source's match id
CREATE TABLE IF NOT EXISTS matches (
    match_id TEXT PRIMARY KEY,
    home_team_id INTEGER NOT NULL REFERENCES teams(team_id),
    away_team_id INTEGER NOT NULL REFERENCES teams(team_id),
    home_score INTEGER,
    away_score INTEGER,
    date_time TEXT,
    status TEXT,
    referee_id INTEGER REFERENCES referees(referee_id),
    stadium_id INTEGER REFERENCES stadiums(stadium_id),
    attendance INTEGER,
    url TEXT NOT NULL,
    CHECK (home_team_id <> away_team_id)
);
CREATE INDEX IF NOT EXISTS idx_matches_date ON matches(date_time);

-- Wide statistics row; home_<key>/away_<key> columns are added on demand
CREATE TABLE IF NOT EXISTS match_statistics (
    match_id TEXT PRIMARY KEY REFERENCES matches(match_id)
);
"#;
