//! Season discovery and match link collection.

use std::collections::HashSet;
use std::time::Duration;

use matchday_core::Season;
use scraper::Html;
use url::Url;

use crate::error::ScrapeError;
use crate::locator::{element_text, select_all, select_first};
use crate::page::{Browser, Page, goto_within};
use crate::site;

/// Options for walking a season's results view.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Upper bound on "show more" clicks per season
    pub max_load_more_clicks: usize,
    /// CSS selector of the "show more" affordance
    pub load_more_selector: String,
    /// Pause after loading a page before touching it
    pub settle_pause: Duration,
    /// Pause after each "show more" click
    pub click_pause: Duration,
    /// Longest a page load may take
    pub navigation_timeout: Duration,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_load_more_clicks: 200,
            load_more_selector: site::LOAD_MORE.to_string(),
            settle_pause: Duration::from_secs(1),
            click_pause: Duration::from_millis(1500),
            navigation_timeout: Duration::from_secs(30),
        }
    }
}

/// Load the archive root and list its seasons in page order.
///
/// Failing to load the archive, or finding no season on it, is an error:
/// nothing else can run without it.
pub async fn discover_seasons<P: Page>(
    page: &mut P,
    archive_url: &str,
    options: &CrawlOptions,
) -> Result<Vec<Season>, ScrapeError> {
    let archive = site::parse_url(archive_url)?;
    log::info!("Navigating to archive: {}", archive_url);
    goto_within(page, archive_url, options.navigation_timeout).await?;
    tokio::time::sleep(options.settle_pause).await;

    let html = page.content().await?;
    let seasons = parse_seasons(&Html::parse_document(&html), &archive);
    if seasons.is_empty() {
        return Err(ScrapeError::NoSeasons(archive_url.to_string()));
    }
    log::info!("Found {} seasons", seasons.len());
    Ok(seasons)
}

/// Season links listed on an archive page.
///
/// Entries without a link or with an unusable href are skipped.
pub fn parse_seasons(doc: &Html, archive: &Url) -> Vec<Season> {
    let mut seasons = Vec::new();
    for entry in select_all(doc.root_element(), site::SEASON_ENTRY) {
        let Some(link) = select_first(entry, site::SEASON_LINK) else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let label = element_text(link);
        match site::season_results_url(archive, href) {
            Ok(url) => {
                let season = Season::from_label(&label, url);
                log::debug!("{} -> {}", season.label, season.href);
                seasons.push(season);
            }
            Err(e) => log::warn!("Skipping season '{}': {}", label, e),
        }
    }
    seasons
}

/// Click "show more" until it disappears, closing popups along the way.
///
/// Stops at `max_load_more_clicks` even if the button is still there.
/// Returns the number of clicks made.
pub async fn expand_results<P: Page>(page: &mut P, options: &CrawlOptions) -> usize {
    let mut clicks = 0;
    loop {
        match page.close_popups().await {
            Ok(0) => {}
            Ok(n) => log::debug!("Closed {} popup window(s)", n),
            Err(e) => log::debug!("Could not close popups: {}", e),
        }

        if clicks >= options.max_load_more_clicks {
            log::warn!(
                "Stopped expanding results after {} clicks; the list may be incomplete",
                clicks
            );
            break;
        }

        match page.click(&options.load_more_selector).await {
            Ok(true) => {
                clicks += 1;
                log::debug!("Clicked show more ({})", clicks);
                tokio::time::sleep(options.click_pause).await;
            }
            Ok(false) => {
                log::debug!("All matches loaded after {} clicks", clicks);
                break;
            }
            Err(e) => {
                log::warn!("Error clicking show more: {}", e);
                break;
            }
        }
    }
    clicks
}

/// Match page URLs in source order, absolute, without duplicates.
pub fn collect_match_links(doc: &Html, base: &Url) -> Vec<String> {
    let mut seen = HashSet::new();
    select_all(doc.root_element(), site::MATCH_LINK)
        .into_iter()
        .filter_map(|link| link.value().attr("href"))
        .filter_map(|href| match base.join(href) {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                log::debug!("Skipping match link '{}': {}", href, e);
                None
            }
        })
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Collect every match URL of one season using a single page.
pub async fn crawl_season<B: Browser>(
    browser: &B,
    season: &Season,
    options: &CrawlOptions,
) -> Result<Vec<String>, ScrapeError> {
    let mut page = browser.new_page().await?;
    let result = crawl_results_page(&mut page, &season.href, options).await;
    if let Err(e) = page.close().await {
        log::debug!("Failed to close season page: {}", e);
    }
    result
}

async fn crawl_results_page<P: Page>(
    page: &mut P,
    results_url: &str,
    options: &CrawlOptions,
) -> Result<Vec<String>, ScrapeError> {
    let base = site::parse_url(results_url)?;
    goto_within(page, results_url, options.navigation_timeout).await?;
    tokio::time::sleep(options.settle_pause).await;

    expand_results(page, options).await;

    let html = page.content().await?;
    let links = collect_match_links(&Html::parse_document(&html), &base);
    log::info!("Found {} matches on {}", links.len(), results_url);
    Ok(links)
}

#[cfg(test)]
#[path = "tests/crawl_tests.rs"]
mod tests;
