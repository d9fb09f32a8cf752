//! Commit one season's extracted matches to the store.
//!
//! The season is a single transaction. Each match gets its own savepoint
//! inside it, so a match that fails to write is rolled back alone and the
//! rest of the season still commits.

use matchday_core::{MatchRecord, Season};
use matchday_db::operations::{self, OperationError};
use rusqlite::{Connection, Transaction};
use thiserror::Error;

use crate::progress::HarvestProgress;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Database error: {0}")]
    Db(#[from] OperationError),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Statistics from a single season import.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeasonImportStats {
    /// Records handed to the writer
    pub total: usize,
    pub saved: usize,
    /// Matches whose id was already in the store
    pub already_stored: usize,
    /// Matches rolled back after a write error
    pub failed: usize,
    /// Records refused for lacking a team name
    pub skipped_incomplete: usize,
}

/// Write a season's records in one transaction.
///
/// A record missing either team name is never written. A record whose
/// existence check or write fails is rolled back to its savepoint and
/// counted in `failed`.
/// Only errors opening or committing the season transaction are returned.
pub fn import_season(
    conn: &Connection,
    season: &Season,
    records: &[MatchRecord],
    progress: Option<&dyn HarvestProgress>,
) -> Result<SeasonImportStats, ImportError> {
    let mut stats = SeasonImportStats {
        total: records.len(),
        ..SeasonImportStats::default()
    };

    let mut tx = conn.unchecked_transaction()?;

    for (i, record) in records.iter().enumerate() {
        if !record.has_teams() {
            log::warn!("Not saving {}: missing team name", record.url);
            stats.skipped_incomplete += 1;
        } else {
            match import_match(&mut tx, record) {
                Ok(Stored::Saved) => stats.saved += 1,
                Ok(Stored::AlreadyStored) => {
                    log::debug!("Match {} already stored", record.match_id);
                    stats.already_stored += 1;
                }
                Err(e) => {
                    log::error!(
                        "Error saving match {} ({}): {}",
                        record.match_id,
                        record.display_name(),
                        e
                    );
                    stats.failed += 1;
                }
            }
        }

        if let Some(p) = progress {
            p.on_match(i + 1, records.len(), &record.display_name());
        }
    }

    tx.commit()?;

    log::info!(
        "Season {}: saved {}/{} ({} already stored, {} failed)",
        season.label,
        stats.saved,
        stats.total,
        stats.already_stored,
        stats.failed
    );
    Ok(stats)
}

enum Stored {
    Saved,
    AlreadyStored,
}

/// Write one match under its own savepoint.
///
/// Any error, including from the existence check, leaves the savepoint
/// uncommitted and dropping it rolls the match back.
fn import_match(tx: &mut Transaction<'_>, record: &MatchRecord) -> Result<Stored, ImportError> {
    let sp = tx.savepoint()?;
    if operations::match_exists(&sp, &record.match_id)? {
        return Ok(Stored::AlreadyStored);
    }
    store_match(&sp, record)?;
    sp.commit()?;
    Ok(Stored::Saved)
}

/// Resolve shared entities and insert the match with its statistics row.
///
/// The statistics row is written even when no statistic was shown, leaving
/// every category NULL.
fn store_match(conn: &Connection, record: &MatchRecord) -> Result<(), OperationError> {
    let refs = operations::resolve_match_refs(conn, record)?;
    operations::insert_match(conn, record, &refs)?;
    operations::insert_statistics(conn, &record.match_id, &record.statistic_row())?;
    Ok(())
}
