//! The per-match record produced by the extractor.

use chrono::NaiveDateTime;

use crate::stats::{StatLine, StatSection, StatisticRow, merge_statistics};

/// Formats the source uses for the kick-off timestamp.
const KICKOFF_FORMATS: &[&str] = &["%d.%m.%Y %H:%M", "%d.%m.%Y %H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// How the detailed statistics view resolved for a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailedStatsOutcome {
    /// At least one section yielded data.
    Success,
    /// The view loaded but had no sections (or retries ran out).
    Empty,
    /// The statistics marker never appeared within the timeout.
    Timeout,
    /// The view could not be reached (unexpected URL, navigation failure).
    #[default]
    Unavailable,
}

impl std::fmt::Display for DetailedStatsOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetailedStatsOutcome::Success => write!(f, "success"),
            DetailedStatsOutcome::Empty => write!(f, "empty"),
            DetailedStatsOutcome::Timeout => write!(f, "timeout"),
            DetailedStatsOutcome::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Best-effort data extracted for one match.
///
/// Every field is optional on its own: a gap in one never prevents the
/// others from being filled. Scores are `None` when the score block was not
/// found, which is different from a 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchRecord {
    /// Source-assigned match identifier
    pub match_id: String,
    /// Match page URL the record was extracted from
    pub url: String,
    /// Label of the season the match was harvested under
    pub season: String,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub kickoff: Option<NaiveDateTime>,
    pub status: Option<String>,
    pub referee_name: Option<String>,
    pub referee_nationality: Option<String>,
    pub stadium_name: Option<String>,
    pub stadium_city: Option<String>,
    pub capacity: Option<u32>,
    pub attendance: Option<u32>,
    /// Statistics shown inline on the match page
    pub basic_stats: Vec<StatLine>,
    /// Sectioned statistics from the statistics view
    pub detailed_stats: Vec<StatSection>,
    pub detailed_outcome: DetailedStatsOutcome,
}

impl MatchRecord {
    pub fn new(match_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            match_id: match_id.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    /// Both team names are present. Records failing this are never persisted.
    pub fn has_teams(&self) -> bool {
        let present = |name: &Option<String>| name.as_deref().is_some_and(|n| !n.trim().is_empty());
        present(&self.home_team) && present(&self.away_team)
    }

    /// Canonical statistics row (basic first, detailed filling gaps).
    pub fn statistic_row(&self) -> StatisticRow {
        merge_statistics(&self.basic_stats, &self.detailed_stats)
    }

    /// "Home vs Away" for log lines, with placeholders for missing names.
    pub fn display_name(&self) -> String {
        format!(
            "{} vs {}",
            self.home_team.as_deref().unwrap_or("Unknown"),
            self.away_team.as_deref().unwrap_or("Unknown")
        )
    }
}

/// Parse the kick-off text shown on a match page ("21.07.2023 20:30").
pub fn parse_kickoff(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    KICKOFF_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}

#[cfg(test)]
#[path = "tests/record_tests.rs"]
mod tests;
