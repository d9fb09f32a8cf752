//! Terminal progress for a harvest run.

use std::cell::RefCell;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use matchday_core::Season;
use matchday_import::{HarvestProgress, HarvestReport, SeasonReport, SeasonStatus};

/// Single spinner line showing the season and step in progress.
pub(crate) struct SpinnerProgress {
    pb: ProgressBar,
    season: RefCell<String>,
}

impl SpinnerProgress {
    /// When `quiet` is true the spinner is hidden.
    pub(crate) fn new(quiet: bool) -> Self {
        let pb = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("  {spinner:.cyan} {msg}") {
                pb.set_style(style.tick_chars("/-\\|"));
            }
            pb.enable_steady_tick(std::time::Duration::from_millis(100));
            pb
        };
        Self {
            pb,
            season: RefCell::new(String::new()),
        }
    }

    pub(crate) fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

impl HarvestProgress for SpinnerProgress {
    fn on_phase(&self, message: &str) {
        self.pb.set_message(format!("{}...", message));
    }

    fn on_season_start(&self, index: usize, total: usize, season: &Season) {
        let prefix = format!("[{}/{}] {}", index, total, season.year_token);
        self.pb.set_message(format!("{}: collecting matches", prefix));
        *self.season.borrow_mut() = prefix;
    }

    fn on_matches_found(&self, _season: &Season, count: usize) {
        self.pb
            .set_message(format!("{}: {} matches listed", self.season.borrow(), count));
    }

    fn on_extracted(&self, done: usize, total: usize) {
        self.pb.set_message(format!(
            "{}: extracted {}/{}",
            self.season.borrow(),
            done,
            total
        ));
    }

    fn on_match(&self, current: usize, total: usize, name: &str) {
        self.pb.set_message(format!(
            "{}: saving {}/{} {}",
            self.season.borrow(),
            current,
            total,
            name
        ));
    }

    fn on_season_complete(&self, report: &SeasonReport) {
        self.pb.suspend(|| print_season(report));
    }

    fn on_complete(&self, _message: &str) {
        self.pb.finish_and_clear();
    }
}

fn print_season(report: &SeasonReport) {
    match report.status {
        SeasonStatus::Completed => println!(
            "  {} {}: saved {}/{}{}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            report.label.if_supports_color(Stdout, |t| t.bold()),
            report.saved,
            report.extracted,
            season_notes(report),
        ),
        status => println!(
            "  {} {}: {} ({})",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            report.label.if_supports_color(Stdout, |t| t.bold()),
            status.if_supports_color(Stdout, |t| t.red()),
            report.error.as_deref().unwrap_or("no details"),
        ),
    }
}

fn season_notes(report: &SeasonReport) -> String {
    let mut notes = Vec::new();
    if report.failed > 0 {
        notes.push(format!("{} failed", report.failed));
    }
    if report.incomplete > 0 {
        notes.push(format!("{} incomplete", report.incomplete));
    }
    if report.already_stored > 0 {
        notes.push(format!("{} already stored", report.already_stored));
    }
    if notes.is_empty() {
        String::new()
    } else {
        format!(
            " {}",
            format!("({})", notes.join(", ")).if_supports_color(Stdout, |t| t.dimmed())
        )
    }
}

/// Totals printed once the run is over.
pub(crate) fn print_summary(report: &HarvestReport) {
    let summary = report.summary();
    println!();
    println!(
        "{} {} matches saved from {} of {} seasons",
        "Done:".if_supports_color(Stdout, |t| t.bold()),
        summary.saved.if_supports_color(Stdout, |t| t.green()),
        summary.seasons_harvested - summary.seasons_failed,
        summary.seasons_harvested,
    );
    if summary.failed > 0 || summary.seasons_failed > 0 {
        println!(
            "  {} {} match(es) and {} season(s) failed; see the log for details",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            summary.failed,
            summary.seasons_failed,
        );
    }
    if summary.incomplete > 0 {
        println!(
            "  {}",
            format!("{} match(es) skipped for missing team names", summary.incomplete)
                .if_supports_color(Stdout, |t| t.dimmed())
        );
    }
}
