//! Browser automation seam.
//!
//! The crawler and extractor only talk to these traits. The production
//! implementation drives a WebDriver endpoint (see [`crate::webdriver`]);
//! tests substitute scripted pages serving fixture HTML.
//!
//! Everything runs on a single task: extractions are interleaved with
//! `join_all`, never spawned, so no `Send` bounds are required.

use std::time::Duration;

use crate::error::ScrapeError;

/// Starts browser sessions. One browser is launched per season.
#[allow(async_fn_in_trait)]
pub trait Launcher {
    type Browser: Browser;

    async fn launch(&self) -> Result<Self::Browser, ScrapeError>;
}

/// A running browser that can open pages.
#[allow(async_fn_in_trait)]
pub trait Browser {
    type Page: Page;

    /// Open a new blank page. Several pages may be open at once.
    async fn new_page(&self) -> Result<Self::Page, ScrapeError>;

    /// Shut the browser down, closing any page still open.
    async fn close(self) -> Result<(), ScrapeError>;
}

/// A single page (tab) under automation.
#[allow(async_fn_in_trait)]
pub trait Page {
    /// Navigate and wait for the document to load.
    async fn goto(&mut self, url: &str) -> Result<(), ScrapeError>;

    /// URL of the document currently loaded (after any redirects).
    async fn current_url(&mut self) -> Result<String, ScrapeError>;

    /// Serialized HTML of the live DOM.
    async fn content(&mut self) -> Result<String, ScrapeError>;

    /// Click the first element matching a CSS selector.
    ///
    /// Returns `false` when nothing matches.
    async fn click(&mut self, selector: &str) -> Result<bool, ScrapeError>;

    /// Wait up to `timeout` for a CSS selector to match.
    ///
    /// Returns `false` on timeout; only transport failures are errors.
    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<bool, ScrapeError>;

    /// Close any extra windows (popups, ad tabs) opened alongside this page.
    /// Returns how many were closed.
    async fn close_popups(&mut self) -> Result<usize, ScrapeError>;

    async fn close(self) -> Result<(), ScrapeError>;
}

/// Navigate, giving up once `timeout` has passed.
///
/// A hung load surfaces as [`ScrapeError::Timeout`] carrying the URL.
pub async fn goto_within<P: Page>(
    page: &mut P,
    url: &str,
    timeout: Duration,
) -> Result<(), ScrapeError> {
    match tokio::time::timeout(timeout, page.goto(url)).await {
        Ok(result) => result,
        Err(_) => {
            log::debug!("Loading {} took longer than {:?}", url, timeout);
            Err(ScrapeError::Timeout(url.to_string()))
        }
    }
}
