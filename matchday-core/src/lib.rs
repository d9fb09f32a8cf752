//! Shared data model for the matchday harvester.
//!
//! Holds the season descriptors, the per-match record produced by the
//! extractor, and the statistic normalizer that turns raw source-language
//! statistics into the canonical column set stored in the database.

pub mod record;
pub mod season;
pub mod stats;
pub mod util;

pub use record::{DetailedStatsOutcome, MatchRecord, parse_kickoff};
pub use season::{Season, filter_seasons, parse_season_year};
pub use stats::{
    StatLine, StatPair, StatSection, StatisticRow, merge_statistics, translate_statistic_name,
};
