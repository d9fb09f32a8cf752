//! Match statistics and their normalization into canonical columns.
//!
//! The source publishes statistics under Polish labels, in two places: a
//! "basic" block on the match page and "detailed" sections behind a second
//! navigation. [`merge_statistics`] folds both into a [`StatisticRow`] keyed
//! by canonical snake-case names, which the database layer materializes as
//! `home_<key>` / `away_<key>` columns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Source label to canonical column key. Append-only: existing keys are
/// column names in stored databases.
const STATISTIC_NAMES: &[(&str, &str)] = &[
    ("Oczekiwane gole (xG)", "xg"),
    ("Posiadanie piłki", "ball_possession"),
    ("Strzały łącznie", "total_shots"),
    ("Strzały na bramkę", "shots_on_target"),
    ("Wielkie szanse", "big_chances"),
    ("Rzuty rożne", "corner_kicks"),
    ("Podania", "passes"),
    ("Żółte kartki", "yellow_cards"),
    ("Czerwone kartki", "red_cards"),
    // Shots
    ("xG na bramkę (xGOT)", "xgot"),
    ("Strzały niecelne", "shots_off_target"),
    ("Strzały zablokowane", "blocked_shots"),
    ("Strzały z pola karnego", "shots_inside_box"),
    ("Strzały spoza pola karnego", "shots_outside_box"),
    ("Strzał w poprzeczkę", "hit_woodwork"),
    ("Bramki strzelone głową", "headed_goals"),
    // Attack
    ("Kontakty w polu karnym przeciwnika", "touches_in_opponent_box"),
    ("Celne podania prostopadłe", "accurate_through_balls"),
    ("Spalone", "offsides"),
    ("Rzuty wolne", "free_kicks"),
    // Passes
    ("Długie podania", "long_balls"),
    ("Podania w strefę obrony przeciwnika", "passes_into_final_third"),
    ("Dośrodkowania", "crosses"),
    ("Oczekiwane asysty (xA)", "xa"),
    ("Wrzuty z autu", "throw_ins"),
    // Defence
    ("Faule", "fouls"),
    ("Próby odbioru piłki", "tackle_success"),
    ("Wygrane pojedynki", "duels_won"),
    ("Wybicia", "clearances"),
    ("Przechwyty", "interceptions"),
    ("Błędy skutkujące strzałem", "errors_leading_to_shot"),
    ("Błędy skutkujące golem", "errors_leading_to_goal"),
    // Goalkeeping
    ("Obrony bramkarza", "goalkeeper_saves"),
    ("xGot przeciw", "xgot_faced"),
    ("Zapobiegnięcia utracie gola", "prevented_goals"),
];

/// Home and away values of one statistic, as displayed by the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatPair {
    pub home: String,
    pub away: String,
}

impl StatPair {
    pub fn new(home: impl Into<String>, away: impl Into<String>) -> Self {
        Self {
            home: home.into(),
            away: away.into(),
        }
    }
}

/// One statistic row: the raw category label and its values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    pub category: String,
    pub values: StatPair,
}

impl StatLine {
    pub fn new(category: impl Into<String>, home: impl Into<String>, away: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            values: StatPair::new(home, away),
        }
    }
}

/// A titled group of detailed statistics ("Strzały", "Podania", ...).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatSection {
    pub title: String,
    pub lines: Vec<StatLine>,
}

/// Canonical statistics of one match, keyed by column key.
///
/// Sparse: each match carries only the keys the source showed for it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatisticRow {
    entries: BTreeMap<String, StatPair>,
}

impl StatisticRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the key is already present. Returns whether it was added.
    pub fn insert_first(&mut self, key: String, values: StatPair) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, values);
        true
    }

    pub fn get(&self, key: &str) -> Option<&StatPair> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Column name/value pairs in key order: `home_<key>` then `away_<key>`.
    pub fn columns(&self) -> Vec<(String, &str)> {
        let mut columns = Vec::with_capacity(self.entries.len() * 2);
        for (key, values) in &self.entries {
            columns.push((format!("home_{key}"), values.home.as_str()));
            columns.push((format!("away_{key}"), values.away.as_str()));
        }
        columns
    }
}

/// Translate a source statistic label into its canonical column key.
///
/// Unknown labels fall back to a lowercase, underscore-separated form of
/// the label itself, so every observed label maps to one stable key.
pub fn translate_statistic_name(label: &str) -> String {
    let label = label.trim();
    if let Some((_, key)) = STATISTIC_NAMES.iter().find(|(name, _)| *name == label) {
        return (*key).to_string();
    }
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// Merge basic and detailed statistics into one canonical row.
///
/// First writer wins: basic categories are taken as-is, then each detailed
/// section in order contributes only categories not seen before. Conflicts
/// are decided on the raw category label, and again on the translated key.
pub fn merge_statistics(basic: &[StatLine], detailed: &[StatSection]) -> StatisticRow {
    let mut seen: Vec<&str> = Vec::new();
    let mut row = StatisticRow::new();

    let detailed_lines = detailed.iter().flat_map(|section| {
        section.lines.iter().map(move |line| (Some(section.title.as_str()), line))
    });

    for (section, line) in basic.iter().map(|line| (None, line)).chain(detailed_lines) {
        let category = line.category.trim();
        if seen.contains(&category) {
            if let Some(section) = section {
                log::debug!(
                    "Skipping duplicate category '{}' from section '{}'",
                    category,
                    section
                );
            }
            continue;
        }
        seen.push(category);

        let key = translate_statistic_name(category);
        if !row.insert_first(key.clone(), line.values.clone()) {
            log::debug!("Category '{}' collides with existing key '{}'", category, key);
        }
    }

    row
}

#[cfg(test)]
#[path = "tests/stats_tests.rs"]
mod tests;
