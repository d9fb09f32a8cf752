use std::cell::Cell;
use std::time::Duration;

use matchday_db::{SchemaError, open_database, store_counts};
use matchday_import::*;
use matchday_scraper::testing::{
    Advance, FakeSite, MatchFixture, archive_html, match_url, results_html, row, sections_html,
    stats_url,
};
use matchday_scraper::{CrawlOptions, ExtractOptions, ScrapeError};

const ARCHIVE: &str = "https://www.flashscore.pl/pilka-nozna/polska/pko-bp-ekstraklasa/archiwum/";
const RESULTS_A: &str =
    "https://www.flashscore.pl/pilka-nozna/polska/pko-bp-ekstraklasa-2023-2024/wyniki/";
const RESULTS_B: &str =
    "https://www.flashscore.pl/pilka-nozna/polska/pko-bp-ekstraklasa-2022-2023/wyniki/";

const TEAMS: &[&str] = &[
    "Jagiellonia Białystok",
    "Śląsk Wrocław",
    "Legia Warszawa",
    "Pogoń Szczecin",
    "Lech Poznań",
    "Górnik Zabrze",
    "Raków Częstochowa",
    "Zagłębie Lubin",
    "Widzew Łódź",
    "Cracovia",
    "Stal Mielec",
];

fn options() -> HarvestOptions {
    HarvestOptions {
        archive_url: ARCHIVE.to_string(),
        start_season_year: 2010,
        batch_size: 4,
        crawl: CrawlOptions {
            settle_pause: Duration::ZERO,
            click_pause: Duration::ZERO,
            ..CrawlOptions::default()
        },
        extract: ExtractOptions {
            marker_timeout: Duration::ZERO,
            marker_pause: Duration::ZERO,
            marker_pause_step: Duration::ZERO,
            settle_pause: Duration::ZERO,
            detail_pause: Duration::ZERO,
            detail_pause_step: Duration::ZERO,
            throttle: Duration::ZERO,
            ..ExtractOptions::default()
        },
    }
}

fn archive(site: &FakeSite) {
    site.page(
        ARCHIVE,
        archive_html(&[
            ("PKO BP Ekstraklasa 2023/2024", "/pilka-nozna/polska/pko-bp-ekstraklasa-2023-2024/"),
            ("PKO BP Ekstraklasa 2022/2023", "/pilka-nozna/polska/pko-bp-ekstraklasa-2022-2023/"),
            ("Ekstraklasa 2008/2009", "/pilka-nozna/polska/ekstraklasa-2008-2009/"),
        ]),
    );
}

fn href(id: &str) -> String {
    format!("/mecz/{id}/?mid={id}")
}

/// Serve a match page and its statistics view.
fn serve_match(site: &FakeSite, id: &str, fixture: &MatchFixture) {
    site.page(&match_url(id), fixture.html());
    site.page(
        &stats_url(id),
        sections_html(&[("Strzały", vec![row("Strzały na bramkę", "5", "3")])]),
    );
}

fn fixture(i: usize) -> MatchFixture {
    MatchFixture::new(TEAMS[i % TEAMS.len()], TEAMS[(i + 1) % TEAMS.len()])
}

/// Season A: ten matches behind one "show more" click, one of which names
/// the same team on both sides and cannot be stored.
fn season_a(site: &FakeSite) {
    let ids: Vec<String> = (0..10).map(|i| format!("a{i}")).collect();
    let hrefs: Vec<String> = ids.iter().map(|id| href(id)).collect();
    site.states(
        RESULTS_A,
        vec![results_html(&hrefs[..6], true), results_html(&hrefs, false)],
        Advance::OnClick,
    );
    for (i, id) in ids.iter().enumerate() {
        let shown = if i == 7 {
            MatchFixture::new("Górnik Zabrze", "Górnik Zabrze")
        } else {
            fixture(i)
        };
        serve_match(site, id, &shown);
    }
}

fn season_b(site: &FakeSite) {
    let ids: Vec<String> = (0..3).map(|i| format!("b{i}")).collect();
    let hrefs: Vec<String> = ids.iter().map(|id| href(id)).collect();
    site.page(RESULTS_B, results_html(&hrefs, false));
    for (i, id) in ids.iter().enumerate() {
        serve_match(site, id, &fixture(i + 3));
    }
}

#[tokio::test]
async fn store_failure_and_bad_match_do_not_stop_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("matches.db");
    let site = FakeSite::new();
    archive(&site);
    season_a(&site);
    season_b(&site);

    // The second season's store connection fails outright
    let opens = Cell::new(0);
    let opener = || {
        opens.set(opens.get() + 1);
        if opens.get() == 2 {
            Err(SchemaError::VersionMismatch {
                expected: 1,
                found: 99,
            })
        } else {
            open_database(&path)
        }
    };

    let report = harvest(&site.launcher(), &opener, &options(), &SilentProgress)
        .await
        .unwrap();

    assert_eq!(report.seasons_discovered, 3);
    let seasons = report.seasons();
    assert_eq!(seasons.len(), 2);

    let a = &seasons[0];
    assert_eq!(a.label, "PKO BP Ekstraklasa 2023/2024");
    assert_eq!(a.status, SeasonStatus::Completed);
    assert_eq!(a.references_found, 10);
    assert_eq!(a.extracted, 10);
    assert_eq!(a.saved, 9);
    assert_eq!(a.failed, 1);
    assert_eq!(a.detailed_success, 10);

    let b = &seasons[1];
    assert_eq!(b.status, SeasonStatus::StoreFailed);
    assert_eq!(b.extracted, 3);
    assert_eq!(b.saved, 0);
    assert!(b.error.is_some());

    assert_eq!(report.total_saved(), 9);
    assert_eq!(opens.get(), 2);

    let conn = open_database(&path).unwrap();
    let counts = store_counts(&conn).unwrap();
    assert_eq!(counts.matches, 9);
    assert_eq!(counts.statistics, 9);

    // Discovery plus one browser per season, all closed, no page left open
    let gauges = &site.gauges;
    assert_eq!(gauges.launches.get(), 3);
    assert_eq!(gauges.browsers_closed.get(), 3);
    assert_eq!(gauges.open_pages.get(), 0);
    assert!(gauges.max_open_pages.get() <= 4);
}

#[tokio::test]
async fn incomplete_matches_are_dropped_before_storage() {
    let site = FakeSite::new();
    site.page(
        ARCHIVE,
        archive_html(&[("PKO BP Ekstraklasa 2023/2024", "/pilka-nozna/polska/pko-bp-ekstraklasa-2023-2024/")]),
    );
    let hrefs: Vec<String> = ["c0", "c1", "c2"].iter().map(|id| href(id)).collect();
    site.page(RESULTS_A, results_html(&hrefs, false));
    serve_match(&site, "c0", &fixture(0));
    let mut no_away = fixture(1);
    no_away.away = None;
    serve_match(&site, "c1", &no_away);
    let mut no_attendance = fixture(2);
    no_attendance.attendance = None;
    serve_match(&site, "c2", &no_attendance);

    let opener = matchday_db::open_memory;

    let report = harvest(&site.launcher(), &opener, &options(), &SilentProgress)
        .await
        .unwrap();
    let season = &report.seasons()[0];
    assert_eq!(season.extracted, 3);
    assert_eq!(season.incomplete, 1);
    assert_eq!(season.saved, 2);
    assert_eq!(season.failed, 0);
}

#[tokio::test]
async fn crawl_failure_is_confined_to_its_season() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("matches.db");
    let site = FakeSite::new();
    archive(&site);
    // Season A's results view is never served
    season_b(&site);

    let store = SqliteStore::new(&path);
    let report = harvest(&site.launcher(), &store, &options(), &SilentProgress)
        .await
        .unwrap();

    let seasons = report.seasons();
    assert_eq!(seasons[0].status, SeasonStatus::CrawlFailed);
    assert_eq!(seasons[0].saved, 0);
    assert_eq!(seasons[1].status, SeasonStatus::Completed);
    assert_eq!(seasons[1].saved, 3);
    assert_eq!(report.total_saved(), 3);
    assert_eq!(site.gauges.browsers_closed.get(), 3);
}

#[tokio::test]
async fn unreachable_archive_is_fatal() {
    let site = FakeSite::new();
    let opener = matchday_db::open_memory;
    let err = harvest(&site.launcher(), &opener, &options(), &SilentProgress)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        HarvestError::Archive(ScrapeError::Navigation { .. })
    ));
    assert_eq!(site.gauges.browsers_closed.get(), 1);
}

#[tokio::test]
async fn archive_without_seasons_is_fatal() {
    let site = FakeSite::new();
    site.page(ARCHIVE, archive_html(&[]));
    let opener = matchday_db::open_memory;
    let err = harvest(&site.launcher(), &opener, &options(), &SilentProgress)
        .await
        .unwrap_err();
    assert!(matches!(err, HarvestError::Archive(ScrapeError::NoSeasons(_))));
}

#[tokio::test]
async fn seasons_before_start_year_are_skipped() {
    let site = FakeSite::new();
    archive(&site);
    season_a(&site);
    season_b(&site);

    let opener = matchday_db::open_memory;
    let recent_only = HarvestOptions {
        start_season_year: 2023,
        ..options()
    };
    let report = harvest(&site.launcher(), &opener, &recent_only, &SilentProgress)
        .await
        .unwrap();
    assert_eq!(report.seasons_discovered, 3);
    assert_eq!(report.seasons().len(), 1);
    assert_eq!(report.seasons()[0].year_token, "2023/2024");
}

#[tokio::test]
async fn report_file_lists_each_season() {
    let dir = tempfile::tempdir().unwrap();
    let site = FakeSite::new();
    archive(&site);
    season_b(&site);

    let opener = matchday_db::open_memory;
    let report = harvest(&site.launcher(), &opener, &options(), &SilentProgress)
        .await
        .unwrap();

    let path = dir.path().join("harvest.txt");
    report.write_to_file(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("=== Harvest Report ==="));
    assert!(text.contains("Saved: 3"));
    assert!(text.contains("[FAILED] PKO BP Ekstraklasa 2023/2024"));
    assert!(text.contains("[OK] PKO BP Ekstraklasa 2022/2023: saved 3/3"));
}
