//! End-to-end harvest: discover seasons, then crawl, extract and store each.
//!
//! Each season gets a fresh browser that is closed before its matches are
//! written. A season that cannot be crawled or stored is recorded in the
//! report and the run moves on; only the archive root is essential.

use std::path::PathBuf;

use matchday_core::{MatchRecord, Season, filter_seasons};
use matchday_db::SchemaError;
use matchday_scraper::{
    Browser, CrawlOptions, DEFAULT_ARCHIVE_URL, ExtractOptions, Launcher, Page, ScrapeError,
    WebDriverLauncher, crawl_season, discover_seasons, extract_batches,
};
use rusqlite::Connection;
use thiserror::Error;

use crate::progress::{HarvestProgress, LogProgress};
use crate::report::{HarvestReport, SeasonReport, SeasonStatus};
use crate::season_import::import_season;
use crate::settings::{Settings, SettingsError, SettingsOverrides};

/// Matches extracted concurrently per batch.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Earliest season start year harvested by default.
pub const DEFAULT_START_YEAR: u32 = 2010;

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Could not read the season archive: {0}")]
    Archive(#[from] ScrapeError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("Could not create store directory {path}: {source}")]
    StoreDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct HarvestOptions {
    pub archive_url: String,
    /// Seasons starting before this year are skipped
    pub start_season_year: u32,
    pub batch_size: usize,
    pub crawl: CrawlOptions,
    pub extract: ExtractOptions,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            start_season_year: DEFAULT_START_YEAR,
            batch_size: DEFAULT_BATCH_SIZE,
            crawl: CrawlOptions::default(),
            extract: ExtractOptions::default(),
        }
    }
}

/// Opens a store connection for one season's writes.
pub trait StoreOpener {
    fn open(&self) -> Result<Connection, SchemaError>;
}

impl<F> StoreOpener for F
where
    F: Fn() -> Result<Connection, SchemaError>,
{
    fn open(&self) -> Result<Connection, SchemaError> {
        self()
    }
}

/// SQLite database file on disk.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pub path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StoreOpener for SqliteStore {
    fn open(&self) -> Result<Connection, SchemaError> {
        log::debug!("Opening store at {}", self.path.display());
        matchday_db::open_database(&self.path)
    }
}

/// Run a full harvest.
///
/// Returns an error only when the archive root cannot be loaded or lists
/// no season. Every other failure is confined to its season or match.
pub async fn harvest<L: Launcher, S: StoreOpener>(
    launcher: &L,
    store: &S,
    options: &HarvestOptions,
    progress: &dyn HarvestProgress,
) -> Result<HarvestReport, HarvestError> {
    progress.on_phase("Discovering seasons");
    let seasons = discover(launcher, options).await?;

    let mut report = HarvestReport::new();
    report.seasons_discovered = seasons.len();

    let selected = filter_seasons(seasons, options.start_season_year);
    log::info!(
        "{} of {} seasons start in {} or later",
        selected.len(),
        report.seasons_discovered,
        options.start_season_year
    );

    for (i, season) in selected.iter().enumerate() {
        progress.on_season_start(i + 1, selected.len(), season);
        let season_report = harvest_season(launcher, store, season, options, progress).await;
        progress.on_season_complete(&season_report);
        report.add(season_report);
    }

    progress.on_complete(&format!(
        "Harvest complete: {} matches saved across {} seasons",
        report.total_saved(),
        selected.len()
    ));
    Ok(report)
}

/// List the archive's seasons with a short-lived browser.
async fn discover<L: Launcher>(
    launcher: &L,
    options: &HarvestOptions,
) -> Result<Vec<Season>, ScrapeError> {
    let browser = launcher.launch().await?;
    let result = match browser.new_page().await {
        Ok(mut page) => {
            let seasons = discover_seasons(&mut page, &options.archive_url, &options.crawl).await;
            if let Err(e) = page.close().await {
                log::debug!("Failed to close archive page: {}", e);
            }
            seasons
        }
        Err(e) => Err(e),
    };
    if let Err(e) = browser.close().await {
        log::debug!("Failed to close discovery browser: {}", e);
    }
    result
}

async fn harvest_season<L: Launcher, S: StoreOpener>(
    launcher: &L,
    store: &S,
    season: &Season,
    options: &HarvestOptions,
    progress: &dyn HarvestProgress,
) -> SeasonReport {
    let mut report = SeasonReport::new(season);

    let browser = match launcher.launch().await {
        Ok(browser) => browser,
        Err(e) => {
            log::error!("Could not start a browser for {}: {}", season.label, e);
            report.fail(SeasonStatus::BrowserFailed, e);
            return report;
        }
    };

    let records = match crawl_season(&browser, season, &options.crawl).await {
        Ok(urls) => {
            report.references_found = urls.len();
            progress.on_matches_found(season, urls.len());
            extract_batches(
                &browser,
                &urls,
                &season.label,
                options.batch_size,
                &options.extract,
                |done, total| progress.on_extracted(done, total),
            )
            .await
        }
        Err(e) => {
            log::error!("Could not crawl {}: {}", season.label, e);
            report.fail(SeasonStatus::CrawlFailed, e);
            Vec::new()
        }
    };

    if let Err(e) = browser.close().await {
        log::debug!("Failed to close browser for {}: {}", season.label, e);
    }
    if report.status != SeasonStatus::Completed {
        return report;
    }

    report.extracted = records.len();
    report.count_outcomes(&records);

    let (complete, incomplete): (Vec<MatchRecord>, Vec<MatchRecord>) =
        records.into_iter().partition(MatchRecord::has_teams);
    for record in &incomplete {
        log::warn!("Dropping {}: missing team name", record.url);
    }
    report.incomplete = incomplete.len();

    let conn = match store.open() {
        Ok(conn) => conn,
        Err(e) => {
            log::error!("Could not open the store for {}: {}", season.label, e);
            report.fail(SeasonStatus::StoreFailed, e);
            return report;
        }
    };

    match import_season(&conn, season, &complete, Some(progress)) {
        Ok(stats) => report.apply_import(&stats),
        Err(e) => {
            log::error!("Could not save {}: {}", season.label, e);
            report.fail(SeasonStatus::StoreFailed, e);
        }
    }
    report
}

/// Harvest with the WebDriver launcher and SQLite store named by `settings`.
pub async fn harvest_with_settings(
    settings: &Settings,
    batch_size: usize,
    start_season_year: u32,
    progress: &dyn HarvestProgress,
) -> Result<HarvestReport, HarvestError> {
    if let Some(dir) = settings.db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| HarvestError::StoreDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let launcher = WebDriverLauncher::new(&settings.webdriver_url, settings.headless);
    let store = SqliteStore::new(settings.db_path.clone());
    let options = HarvestOptions {
        archive_url: settings.archive_url.clone(),
        start_season_year,
        batch_size,
        ..HarvestOptions::default()
    };

    log::info!(
        "Harvesting from {} (batch size {}, seasons from {}) into {}",
        options.archive_url,
        batch_size,
        start_season_year,
        settings.db_path.display()
    );
    harvest(&launcher, &store, &options, progress).await
}

/// Harvest using settings from the environment and settings file.
///
/// Returns the number of matches saved.
pub async fn run_harvest(batch_size: usize, start_season_year: u32) -> Result<usize, HarvestError> {
    let settings = Settings::load(&SettingsOverrides::default())?;
    let report = harvest_with_settings(&settings, batch_size, start_season_year, &LogProgress).await?;
    Ok(report.total_saved())
}
