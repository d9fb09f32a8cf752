//! Selectors and URL shapes of the results site.

use url::Url;

use crate::error::ScrapeError;
use crate::locator::FallbackChain;

/// Archive of past seasons for the league being harvested.
pub const DEFAULT_ARCHIVE_URL: &str =
    "https://www.flashscore.pl/pilka-nozna/polska/pko-bp-ekstraklasa/archiwum/";

// ── Archive and results views ───────────────────────────────────────────────

pub const SEASON_ENTRY: &str = ".archiveLatte__season";
pub const SEASON_LINK: &str = "a.archiveLatte__text.archiveLatte__text--clickable";
/// The "show more" link sits three levels into the first child of the
/// results table. Match rows also carry links, so the depth is exact.
pub const LOAD_MORE: &str = "#live-table > div:nth-of-type(1) > div > div > a";
pub const MATCH_LINK: &str = ".eventRowLink";

// ── Match page ──────────────────────────────────────────────────────────────

pub const HOME_TEAM: &[&str] = &[
    ".duelParticipant__home .participant__participantName a",
    ".duelParticipant__home .participant__participantName",
    "[class*=\"duelParticipant__home\"] [class*=\"participantName\"]",
    "[class*=\"participant__home\"] [class*=\"participantName\"]",
];
pub const AWAY_TEAM: &[&str] = &[
    ".duelParticipant__away .participant__participantName a",
    ".duelParticipant__away .participant__participantName",
    "[class*=\"duelParticipant__away\"] [class*=\"participantName\"]",
    "[class*=\"participant__away\"] [class*=\"participantName\"]",
];
pub const SCORE_WRAPPER: &str = ".detailScore__wrapper";
pub const START_TIME: &str = ".duelParticipant__startTime";
pub const STATUS: &str = ".fixedHeaderDuel__detailStatus";

pub const INFO_BLOCK: &str = ".wcl-content_Vkmj9";
pub const INFO_LABEL: &str = ".wcl-infoLabelWrapper_DXbvw";
pub const INFO_VALUE: &str = ".wcl-infoValue_grawU";

pub const STAT_ROW: &str = "[data-testid=\"wcl-statistics\"]";
pub const STAT_CATEGORY: &str = "[data-testid=\"wcl-statistics-category\"]";
pub const STAT_VALUE: &str = "[data-testid=\"wcl-statistics-value\"]";

// ── Statistics view ─────────────────────────────────────────────────────────

pub const SECTIONS_WRAPPER: &str = "div[class*=\"sectionsWrapper\"]";
pub const SECTION: &str = ".section";
pub const SECTION_TITLE: &str = ".section__title";

/// Path appended to a match URL to reach its general statistics view.
const STATISTICS_PATH: &str = "/szczegoly/statystyki/ogolnie/";

pub fn home_team_chain() -> FallbackChain {
    FallbackChain::css(HOME_TEAM)
}

pub fn away_team_chain() -> FallbackChain {
    FallbackChain::css(AWAY_TEAM)
}

/// Parse a URL, attaching the offending text to the error.
pub fn parse_url(url: &str) -> Result<Url, ScrapeError> {
    Url::parse(url).map_err(|source| ScrapeError::Url {
        url: url.to_string(),
        source,
    })
}

/// Results view for a season link found on the archive page.
///
/// `href` is resolved against the archive URL and `wyniki/` is appended to
/// its path.
pub fn season_results_url(archive: &Url, href: &str) -> Result<String, ScrapeError> {
    let mut url = archive.join(href).map_err(|source| ScrapeError::Url {
        url: href.to_string(),
        source,
    })?;
    let mut path = url.path().to_string();
    if !path.ends_with('/') {
        path.push('/');
    }
    path.push_str("wyniki/");
    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url.to_string())
}

/// Statistics view for a match page URL.
///
/// Only match pages (`/mecz/` in the URL) have one. The query string, which
/// carries the match id, is kept.
pub fn statistics_url(match_url: &str) -> Option<String> {
    if !match_url.contains("/mecz/") {
        return None;
    }
    let (base, query) = match match_url.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (match_url, None),
    };
    let base = base.split('#').next().unwrap_or(base);
    let mut stats = format!("{}{}", base.trim_end_matches('/'), STATISTICS_PATH);
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        stats.push('?');
        stats.push_str(query);
    }
    Some(stats)
}

/// Source match id: the `mid` query parameter, else the last path segment.
pub fn match_id_from_url(match_url: &str) -> Option<String> {
    let url = Url::parse(match_url).ok()?;
    if let Some((_, mid)) = url.query_pairs().find(|(k, _)| k == "mid") {
        if !mid.is_empty() {
            return Some(mid.into_owned());
        }
    }
    url.path_segments()?
        .filter(|s| !s.is_empty())
        .last()
        .map(str::to_string)
}

#[cfg(test)]
#[path = "tests/site_tests.rs"]
mod tests;
