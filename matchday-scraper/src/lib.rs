//! Browser-driven harvesting of the results site.
//!
//! Discovers seasons on the archive, expands each season's results list,
//! and extracts every match through a bounded number of concurrent pages.

pub mod batch;
pub mod crawl;
pub mod error;
pub mod extract;
pub mod locator;
pub mod page;
pub mod site;
pub mod webdriver;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use batch::{extract_batches, partition};
pub use crawl::{
    CrawlOptions, collect_match_links, crawl_season, discover_seasons, expand_results,
    parse_seasons,
};
pub use error::ScrapeError;
pub use extract::{ExtractOptions, MatchInfo, SectionsProbe, extract_match, parse_match_page};
pub use locator::{Css, FallbackChain, Locator};
pub use page::{Browser, Launcher, Page, goto_within};
pub use site::DEFAULT_ARCHIVE_URL;
pub use webdriver::{DEFAULT_WEBDRIVER_URL, WebDriverBrowser, WebDriverLauncher, WebDriverPage};
