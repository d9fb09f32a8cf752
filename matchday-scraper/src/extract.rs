//! Match page extraction.
//!
//! Field parsing works on a parsed document snapshot so it can run against
//! fixture HTML. [`extract_match`] drives a live page through the two
//! navigations (match page, statistics view) and never fails: anything that
//! goes wrong after the first load degrades the record instead.

use std::time::Duration;

use chrono::NaiveDateTime;
use matchday_core::util::{non_empty, parse_count, strip_parens};
use matchday_core::{DetailedStatsOutcome, MatchRecord, StatLine, StatSection, parse_kickoff};
use scraper::{ElementRef, Html};

use crate::locator::{Locator, element_text, select_all, select_first};
use crate::page::{Page, goto_within};
use crate::site;

/// Timing knobs for extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// How long each wait for the statistics marker may take
    pub marker_timeout: Duration,
    /// How many times the marker is awaited before giving up
    pub marker_attempts: usize,
    /// Pause between marker waits: `marker_pause + attempt * marker_pause_step`
    pub marker_pause: Duration,
    pub marker_pause_step: Duration,
    /// Pause after navigating to the statistics view
    pub settle_pause: Duration,
    /// Attempts at reading the sectioned statistics
    pub detail_attempts: usize,
    /// Pause before each attempt: `detail_pause + attempt * detail_pause_step`
    pub detail_pause: Duration,
    pub detail_pause_step: Duration,
    /// Pause after each completed match, to stay polite with the source
    pub throttle: Duration,
    /// Longest a page load may take
    pub navigation_timeout: Duration,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            marker_timeout: Duration::from_secs(8),
            marker_attempts: 5,
            marker_pause: Duration::from_secs(2),
            marker_pause_step: Duration::from_secs(1),
            settle_pause: Duration::from_secs(2),
            detail_attempts: 3,
            detail_pause: Duration::from_secs(1),
            detail_pause_step: Duration::from_millis(500),
            throttle: Duration::from_millis(500),
            navigation_timeout: Duration::from_secs(30),
        }
    }
}

/// Referee, venue and crowd details from the match info block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchInfo {
    pub referee_name: Option<String>,
    pub referee_nationality: Option<String>,
    pub stadium_name: Option<String>,
    pub stadium_city: Option<String>,
    pub capacity: Option<u32>,
    pub attendance: Option<u32>,
}

/// What the statistics view showed on one read.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionsProbe {
    /// Neither the sections container nor any statistic row is there yet.
    Missing,
    /// Statistic rows are shown without a sectioned breakdown.
    NoBreakdown,
    /// The sections container is present (possibly still empty).
    Sections(Vec<StatSection>),
}

// ── Live extraction ─────────────────────────────────────────────────────────

/// Extract one match from an already opened page.
///
/// Returns `None` only if the match page itself cannot be loaded.
pub async fn extract_match<P: Page>(
    page: &mut P,
    url: &str,
    season: &str,
    options: &ExtractOptions,
) -> Option<MatchRecord> {
    if let Err(e) = goto_within(page, url, options.navigation_timeout).await {
        log::warn!("Could not load match page {}: {}", url, e);
        return None;
    }
    let html = match page.content().await {
        Ok(html) => html,
        Err(e) => {
            log::warn!("Could not read match page {}: {}", url, e);
            return None;
        }
    };

    let match_id = site::match_id_from_url(url).unwrap_or_else(|| url.to_string());
    let mut record = MatchRecord::new(match_id, url);
    record.season = season.to_string();
    parse_match_page(&Html::parse_document(&html), &mut record);

    let current = match page.current_url().await {
        Ok(current) => current,
        Err(e) => {
            log::debug!("Could not read current URL, using requested one: {}", e);
            url.to_string()
        }
    };
    let (sections, outcome) = match site::statistics_url(&current) {
        Some(stats_url) => fetch_detailed_stats(page, &stats_url, options).await,
        None => {
            log::warn!("Unexpected match URL format: {}", current);
            (Vec::new(), DetailedStatsOutcome::Unavailable)
        }
    };
    record.detailed_stats = sections;
    record.detailed_outcome = outcome;

    log::info!(
        "Extracted {} ({} basic stats, detailed: {})",
        record.display_name(),
        record.basic_stats.len(),
        record.detailed_outcome
    );
    Some(record)
}

async fn fetch_detailed_stats<P: Page>(
    page: &mut P,
    stats_url: &str,
    options: &ExtractOptions,
) -> (Vec<StatSection>, DetailedStatsOutcome) {
    log::debug!("Navigating to statistics: {}", stats_url);
    if let Err(e) = goto_within(page, stats_url, options.navigation_timeout).await {
        log::warn!("Could not open statistics view: {}", e);
        return (Vec::new(), DetailedStatsOutcome::Unavailable);
    }
    tokio::time::sleep(options.settle_pause).await;

    if !wait_for_marker(page, options).await {
        log::warn!("Statistics did not appear for {}", stats_url);
        return (Vec::new(), DetailedStatsOutcome::Timeout);
    }

    for attempt in 0..options.detail_attempts {
        tokio::time::sleep(options.detail_pause + options.detail_pause_step * attempt as u32).await;

        let html = match page.content().await {
            Ok(html) => html,
            Err(e) => {
                log::debug!("Attempt {}: could not read statistics view: {}", attempt + 1, e);
                continue;
            }
        };
        match parse_detailed_sections(&Html::parse_document(&html)) {
            SectionsProbe::NoBreakdown => {
                log::debug!("No sectioned statistics on {}", stats_url);
                return (Vec::new(), DetailedStatsOutcome::Empty);
            }
            SectionsProbe::Missing => {
                log::debug!("Attempt {}: statistics sections not found", attempt + 1);
            }
            SectionsProbe::Sections(sections) => {
                if sections.iter().any(|s| !s.lines.is_empty()) {
                    log::debug!("Extracted {} statistics sections", sections.len());
                    return (sections, DetailedStatsOutcome::Success);
                }
                log::debug!("Attempt {}: statistics sections still empty", attempt + 1);
            }
        }
    }

    (Vec::new(), DetailedStatsOutcome::Empty)
}

/// Wait for the statistics marker with bounded retries.
async fn wait_for_marker<P: Page>(page: &mut P, options: &ExtractOptions) -> bool {
    for attempt in 0..options.marker_attempts {
        match page.wait_for(site::STAT_ROW, options.marker_timeout).await {
            Ok(true) => return true,
            Ok(false) => {}
            Err(e) => {
                log::debug!("Waiting for statistics failed: {}", e);
                return false;
            }
        }
        if attempt + 1 < options.marker_attempts {
            let pause = options.marker_pause + options.marker_pause_step * attempt as u32;
            log::debug!(
                "Statistics not loaded yet, retry {}/{} in {:?}",
                attempt + 1,
                options.marker_attempts - 1,
                pause
            );
            tokio::time::sleep(pause).await;
        }
    }
    false
}

// ── Field parsing ───────────────────────────────────────────────────────────

/// Fill every match-page field of `record` from the document.
pub fn parse_match_page(doc: &Html, record: &mut MatchRecord) {
    let (home, away) = extract_teams(doc);
    if home.is_none() {
        log::warn!("Failed to extract home team from {}", record.url);
    }
    if away.is_none() {
        log::warn!("Failed to extract away team from {}", record.url);
    }
    record.home_team = home;
    record.away_team = away;

    if let Some((home, away)) = extract_score(doc) {
        record.home_score = Some(home);
        record.away_score = Some(away);
    }
    record.kickoff = extract_kickoff(doc);
    record.status = extract_status(doc);
    record.basic_stats = extract_stat_lines(doc.root_element());

    let info = extract_info(doc);
    record.referee_name = info.referee_name;
    record.referee_nationality = info.referee_nationality;
    record.stadium_name = info.stadium_name;
    record.stadium_city = info.stadium_city;
    record.capacity = info.capacity;
    record.attendance = info.attendance;
}

/// Home and away team names.
pub fn extract_teams(doc: &Html) -> (Option<String>, Option<String>) {
    (
        site::home_team_chain().find_text(doc),
        site::away_team_chain().find_text(doc),
    )
}

/// Final score. The wrapper holds home, separator and away spans; anything
/// shorter or non-numeric is treated as no score.
pub fn extract_score(doc: &Html) -> Option<(u32, u32)> {
    let wrapper = select_first(doc.root_element(), site::SCORE_WRAPPER)?;
    let spans: Vec<String> = select_all(wrapper, "span").into_iter().map(element_text).collect();
    if spans.len() < 3 {
        return None;
    }
    let home = spans[0].parse().ok()?;
    let away = spans[2].parse().ok()?;
    Some((home, away))
}

pub fn extract_kickoff(doc: &Html) -> Option<NaiveDateTime> {
    let text = select_first(doc.root_element(), site::START_TIME).map(element_text)?;
    let parsed = parse_kickoff(&text);
    if parsed.is_none() {
        log::debug!("Unparseable kick-off time '{}'", text);
    }
    parsed
}

pub fn extract_status(doc: &Html) -> Option<String> {
    select_first(doc.root_element(), site::STATUS)
        .map(element_text)
        .and_then(|t| non_empty(&t))
}

/// Statistic rows under `scope`. Rows without a category or with fewer than
/// two values are skipped.
pub fn extract_stat_lines(scope: ElementRef<'_>) -> Vec<StatLine> {
    select_all(scope, site::STAT_ROW)
        .into_iter()
        .filter_map(|row| {
            let category = select_first(row, site::STAT_CATEGORY).map(element_text)?;
            let values: Vec<String> = select_all(row, site::STAT_VALUE)
                .into_iter()
                .map(element_text)
                .collect();
            if category.is_empty() || values.len() < 2 {
                return None;
            }
            Some(StatLine::new(category, values[0].clone(), values[1].clone()))
        })
        .collect()
}

/// Referee, stadium, capacity and attendance from the info block.
///
/// Labels and values are paired by position.
pub fn extract_info(doc: &Html) -> MatchInfo {
    let mut info = MatchInfo::default();
    let Some(block) = select_first(doc.root_element(), site::INFO_BLOCK) else {
        log::debug!("Match info block not found");
        return info;
    };

    let labels = select_all(block, site::INFO_LABEL);
    let values = select_all(block, site::INFO_VALUE);
    for (label, value) in labels.into_iter().zip(values) {
        let label = element_text(label).to_lowercase();
        if label.contains("sędzia") || label.contains("sedzia") {
            let (name, nationality) = named_value(value);
            info.referee_name = name;
            info.referee_nationality = nationality;
        } else if label.contains("stadion") {
            let (name, city) = named_value(value);
            info.stadium_name = name;
            info.stadium_city = city;
        } else if label.contains("pojemność") || label.contains("pojemnosc") {
            info.capacity = parse_count(&element_text(value));
        } else if label.contains("frekwencja") {
            info.attendance = parse_count(&element_text(value));
        }
    }
    info
}

/// A value shown as a name span followed by a "(qualifier)" span.
fn named_value(value: ElementRef<'_>) -> (Option<String>, Option<String>) {
    let spans = select_all(value, "span");
    let name = spans.first().and_then(|s| non_empty(&element_text(*s)));
    let qualifier = spans
        .get(1)
        .and_then(|s| non_empty(&strip_parens(&element_text(*s))));
    (name, qualifier)
}

/// Read the sectioned statistics view.
pub fn parse_detailed_sections(doc: &Html) -> SectionsProbe {
    let root = doc.root_element();
    let Some(wrapper) = select_first(root, site::SECTIONS_WRAPPER) else {
        return if select_first(root, site::STAT_ROW).is_some() {
            SectionsProbe::NoBreakdown
        } else {
            SectionsProbe::Missing
        };
    };

    let sections = select_all(wrapper, site::SECTION)
        .into_iter()
        .filter_map(|section| {
            let title = select_first(section, site::SECTION_TITLE).map(element_text)?;
            let title = non_empty(&title)?;
            Some(StatSection {
                title,
                lines: extract_stat_lines(section),
            })
        })
        .collect();
    SectionsProbe::Sections(sections)
}

#[cfg(test)]
#[path = "tests/extract_tests.rs"]
mod tests;
