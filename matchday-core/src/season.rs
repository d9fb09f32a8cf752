//! Season descriptors discovered on the results archive.

use serde::{Deserialize, Serialize};

/// One competition cycle listed on the archive page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    /// Label as shown on the archive (e.g., "PKO BP Ekstraklasa 2023/2024")
    pub label: String,
    /// Absolute URL of the season's results view
    pub href: String,
    /// Trailing token of the label the year was parsed from
    pub year_token: String,
    /// Numeric start year, `None` when the token is not a year
    pub start_year: Option<u32>,
}

impl Season {
    /// Build a season from its archive label, parsing the start year out of
    /// the label's trailing token.
    pub fn from_label(label: &str, href: impl Into<String>) -> Self {
        let label = label.trim();
        let year_token = label.split_whitespace().last().unwrap_or("").to_string();
        let start_year = parse_season_year(&year_token);
        Self {
            label: label.to_string(),
            href: href.into(),
            year_token,
            start_year,
        }
    }

    /// Whether this season starts in or after `min_year`.
    pub fn starts_from(&self, min_year: u32) -> bool {
        self.start_year.is_some_and(|y| y >= min_year)
    }
}

/// Parse the start year out of a season token.
///
/// Cross-year tokens ("2011/2012") use the part before the slash. The result
/// is `None` unless that part is made of ASCII digits only.
pub fn parse_season_year(token: &str) -> Option<u32> {
    let head = token.trim().split('/').next().unwrap_or("");
    if head.is_empty() || !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    head.parse().ok()
}

/// Keep the seasons starting in or after `min_year`, preserving order.
pub fn filter_seasons(seasons: Vec<Season>, min_year: u32) -> Vec<Season> {
    seasons
        .into_iter()
        .filter(|s| s.starts_from(min_year))
        .collect()
}

#[cfg(test)]
#[path = "tests/season_tests.rs"]
mod tests;
