use std::path::Path;

use matchday_core::{DetailedStatsOutcome, MatchRecord, Season};

use crate::season_import::SeasonImportStats;

/// How a season's harvest ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeasonStatus {
    #[default]
    Completed,
    /// No browser could be started for the season.
    BrowserFailed,
    /// The season's results list could not be loaded.
    CrawlFailed,
    /// The store could not be opened or the season could not be committed.
    StoreFailed,
}

impl std::fmt::Display for SeasonStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::BrowserFailed => write!(f, "browser failed"),
            Self::CrawlFailed => write!(f, "crawl failed"),
            Self::StoreFailed => write!(f, "store failed"),
        }
    }
}

/// What happened to one season.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonReport {
    pub label: String,
    pub year_token: String,
    /// Match links found on the results list
    pub references_found: usize,
    /// Match pages that loaded
    pub extracted: usize,
    /// Extracted records dropped for lacking a team name
    pub incomplete: usize,
    pub saved: usize,
    pub failed: usize,
    pub already_stored: usize,
    pub detailed_success: usize,
    pub detailed_empty: usize,
    pub detailed_timeout: usize,
    pub detailed_unavailable: usize,
    pub status: SeasonStatus,
    /// Error text when the season did not complete
    pub error: Option<String>,
}

impl SeasonReport {
    pub fn new(season: &Season) -> Self {
        Self {
            label: season.label.clone(),
            year_token: season.year_token.clone(),
            ..Self::default()
        }
    }

    /// Mark the season as ended early.
    pub fn fail(&mut self, status: SeasonStatus, error: impl ToString) {
        self.status = status;
        self.error = Some(error.to_string());
    }

    /// Tally how the detailed statistics view resolved for each record.
    pub fn count_outcomes(&mut self, records: &[MatchRecord]) {
        for record in records {
            match record.detailed_outcome {
                DetailedStatsOutcome::Success => self.detailed_success += 1,
                DetailedStatsOutcome::Empty => self.detailed_empty += 1,
                DetailedStatsOutcome::Timeout => self.detailed_timeout += 1,
                DetailedStatsOutcome::Unavailable => self.detailed_unavailable += 1,
            }
        }
    }

    pub fn apply_import(&mut self, stats: &SeasonImportStats) {
        self.saved = stats.saved;
        self.failed = stats.failed;
        self.already_stored = stats.already_stored;
        self.incomplete += stats.skipped_incomplete;
    }
}

/// Collects season reports and writes a report file.
#[derive(Debug, Default)]
pub struct HarvestReport {
    /// Seasons listed on the archive
    pub seasons_discovered: usize,
    seasons: Vec<SeasonReport>,
}

impl HarvestReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, season: SeasonReport) {
        self.seasons.push(season);
    }

    pub fn seasons(&self) -> &[SeasonReport] {
        &self.seasons
    }

    /// Matches saved across every season.
    pub fn total_saved(&self) -> usize {
        self.seasons.iter().map(|s| s.saved).sum()
    }

    pub fn summary(&self) -> HarvestSummary {
        let mut summary = HarvestSummary {
            seasons_discovered: self.seasons_discovered,
            seasons_harvested: self.seasons.len(),
            ..HarvestSummary::default()
        };
        for season in &self.seasons {
            if season.status != SeasonStatus::Completed {
                summary.seasons_failed += 1;
            }
            summary.references_found += season.references_found;
            summary.extracted += season.extracted;
            summary.incomplete += season.incomplete;
            summary.saved += season.saved;
            summary.failed += season.failed;
            summary.already_stored += season.already_stored;
        }
        summary
    }

    /// Write the report to a file.
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        use std::io::Write;

        let mut file = std::fs::File::create(path)?;
        let summary = self.summary();

        writeln!(file, "=== Harvest Report ===")?;
        writeln!(
            file,
            "Date: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(file)?;
        writeln!(file, "--- Summary ---")?;
        writeln!(
            file,
            "Seasons: {} harvested of {} discovered ({} failed)",
            summary.seasons_harvested, summary.seasons_discovered, summary.seasons_failed
        )?;
        writeln!(file, "Matches listed: {}", summary.references_found)?;
        writeln!(file, "Extracted: {}", summary.extracted)?;
        writeln!(file, "Incomplete: {}", summary.incomplete)?;
        writeln!(file, "Saved: {}", summary.saved)?;
        writeln!(file, "Already stored: {}", summary.already_stored)?;
        writeln!(file, "Failed: {}", summary.failed)?;
        writeln!(file)?;
        writeln!(file, "--- Seasons ---")?;
        writeln!(file)?;

        for season in &self.seasons {
            let tag = match season.status {
                SeasonStatus::Completed => "OK",
                _ => "FAILED",
            };
            writeln!(
                file,
                "[{}] {}: saved {}/{} (listed {}, incomplete {}, failed {}, already stored {})",
                tag,
                season.label,
                season.saved,
                season.extracted,
                season.references_found,
                season.incomplete,
                season.failed,
                season.already_stored
            )?;
            writeln!(
                file,
                "     Detailed stats: {} success, {} empty, {} timeout, {} unavailable",
                season.detailed_success,
                season.detailed_empty,
                season.detailed_timeout,
                season.detailed_unavailable
            )?;
            if let Some(error) = &season.error {
                writeln!(file, "     Error ({}): {}", season.status, error)?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HarvestSummary {
    pub seasons_discovered: usize,
    pub seasons_harvested: usize,
    pub seasons_failed: usize,
    pub references_found: usize,
    pub extracted: usize,
    pub incomplete: usize,
    pub saved: usize,
    pub failed: usize,
    pub already_stored: usize,
}
