//! Harvest progress reporting.

use matchday_core::Season;

use crate::report::SeasonReport;

/// Trait for receiving harvest progress updates.
pub trait HarvestProgress {
    /// Called when a phase starts (e.g., "Discovering seasons").
    fn on_phase(&self, message: &str);

    /// Called before a season is crawled.
    fn on_season_start(&self, index: usize, total: usize, season: &Season);

    /// Called once a season's match list has been collected.
    fn on_matches_found(&self, season: &Season, count: usize);

    /// Called after each extraction batch.
    fn on_extracted(&self, done: usize, total: usize);

    /// Called after each match is written (or skipped) during import.
    fn on_match(&self, current: usize, total: usize, name: &str);

    /// Called when a season is finished, whatever its outcome.
    fn on_season_complete(&self, report: &SeasonReport);

    /// Called when the harvest is complete.
    fn on_complete(&self, message: &str);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl HarvestProgress for SilentProgress {
    fn on_phase(&self, _message: &str) {}
    fn on_season_start(&self, _index: usize, _total: usize, _season: &Season) {}
    fn on_matches_found(&self, _season: &Season, _count: usize) {}
    fn on_extracted(&self, _done: usize, _total: usize) {}
    fn on_match(&self, _current: usize, _total: usize, _name: &str) {}
    fn on_season_complete(&self, _report: &SeasonReport) {}
    fn on_complete(&self, _message: &str) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl HarvestProgress for LogProgress {
    fn on_phase(&self, message: &str) {
        log::info!("{}", message);
    }

    fn on_season_start(&self, index: usize, total: usize, season: &Season) {
        log::info!("[{}/{}] Season {}", index, total, season.label);
    }

    fn on_matches_found(&self, season: &Season, count: usize) {
        log::info!("  {} matches listed for {}", count, season.year_token);
    }

    fn on_extracted(&self, done: usize, total: usize) {
        log::info!("  extracted {}/{}", done, total);
    }

    fn on_match(&self, current: usize, total: usize, name: &str) {
        if current.is_multiple_of(50) || current == total {
            log::info!("  [{}/{}] {}", current, total, name);
        }
    }

    fn on_season_complete(&self, report: &SeasonReport) {
        log::info!(
            "  {}: saved {}/{} ({})",
            report.label,
            report.saved,
            report.extracted,
            report.status
        );
    }

    fn on_complete(&self, message: &str) {
        log::info!("{}", message);
    }
}
