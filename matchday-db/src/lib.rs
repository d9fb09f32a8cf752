//! SQLite persistence layer for harvested matches.
//!
//! Provides schema creation, the entity resolver for teams, referees and
//! stadiums, match and statistics inserts, and the read query consumed by
//! the analytics layer. Backed by SQLite (via rusqlite with bundled feature).

pub mod operations;
pub mod queries;
pub mod schema;

pub use operations::{
    EntityKind, MatchRefs, OperationError, insert_match, insert_statistics, match_exists,
    resolve_entity, resolve_match_refs, resolve_referee, resolve_stadium, resolve_team,
};
pub use queries::{MatchDataRow, StoreCounts, load_match_data, statistic_columns, store_counts};
pub use schema::{SchemaError, ensure_statistic_columns, open_database, open_memory};
