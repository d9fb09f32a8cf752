//! WebDriver-backed implementation of the browser seam.
//!
//! Each page is its own WebDriver session against the configured endpoint
//! (chromedriver or geckodriver). The browser keeps track of the sessions it
//! handed out so that closing it never leaks one. Sessions load pages
//! eagerly and carry a page-load timeout, so a stuck document cannot hold a
//! session forever.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::wd::{Capabilities, TimeoutConfiguration};
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;

use crate::error::ScrapeError;
use crate::page::{Browser, Launcher, Page};

/// Default WebDriver endpoint.
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";

/// Page-load timeout applied to every session.
pub const DEFAULT_PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(30);

type Sessions = Rc<RefCell<HashMap<usize, Client>>>;

/// Launches browsers against a WebDriver endpoint.
#[derive(Debug, Clone)]
pub struct WebDriverLauncher {
    endpoint: String,
    headless: bool,
    page_load_timeout: Duration,
}

impl WebDriverLauncher {
    pub fn new(endpoint: impl Into<String>, headless: bool) -> Self {
        Self {
            endpoint: endpoint.into(),
            headless,
            page_load_timeout: DEFAULT_PAGE_LOAD_TIMEOUT,
        }
    }

    pub fn with_page_load_timeout(mut self, timeout: Duration) -> Self {
        self.page_load_timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn capabilities(&self) -> Capabilities {
        let mut chrome_args = vec!["--window-size=1920,1080", "--disable-notifications"];
        let mut firefox_args = Vec::new();
        if self.headless {
            chrome_args.extend(["--headless=new", "--disable-gpu"]);
            firefox_args.push("-headless");
        }

        let mut caps = Capabilities::new();
        caps.insert("pageLoadStrategy".to_string(), json!("eager"));
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": chrome_args }));
        caps.insert("moz:firefoxOptions".to_string(), json!({ "args": firefox_args }));
        caps
    }
}

impl Default for WebDriverLauncher {
    fn default() -> Self {
        Self::new(DEFAULT_WEBDRIVER_URL, true)
    }
}

impl Launcher for WebDriverLauncher {
    type Browser = WebDriverBrowser;

    async fn launch(&self) -> Result<WebDriverBrowser, ScrapeError> {
        url::Url::parse(&self.endpoint).map_err(|source| ScrapeError::Url {
            url: self.endpoint.clone(),
            source,
        })?;
        log::debug!(
            "Launching browser via {} (headless: {})",
            self.endpoint,
            self.headless
        );
        Ok(WebDriverBrowser {
            endpoint: self.endpoint.clone(),
            capabilities: self.capabilities(),
            page_load_timeout: self.page_load_timeout,
            sessions: Rc::new(RefCell::new(HashMap::new())),
            next_id: Cell::new(0),
        })
    }
}

/// A group of WebDriver sessions that are closed together.
pub struct WebDriverBrowser {
    endpoint: String,
    capabilities: Capabilities,
    page_load_timeout: Duration,
    sessions: Sessions,
    next_id: Cell<usize>,
}

impl Browser for WebDriverBrowser {
    type Page = WebDriverPage;

    async fn new_page(&self) -> Result<WebDriverPage, ScrapeError> {
        let client = ClientBuilder::native()
            .capabilities(self.capabilities.clone())
            .connect(&self.endpoint)
            .await?;
        let timeouts = TimeoutConfiguration::new(None, Some(self.page_load_timeout), None);
        if let Err(e) = client.update_timeouts(timeouts).await {
            if let Err(close) = client.close().await {
                log::debug!("Failed to close WebDriver session: {}", close);
            }
            return Err(e.into());
        }

        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.sessions.borrow_mut().insert(id, client.clone());

        Ok(WebDriverPage {
            id,
            client,
            sessions: Rc::clone(&self.sessions),
        })
    }

    async fn close(self) -> Result<(), ScrapeError> {
        let leftover: Vec<Client> = self.sessions.borrow_mut().drain().map(|(_, c)| c).collect();
        if !leftover.is_empty() {
            log::debug!("Closing {} leftover WebDriver session(s)", leftover.len());
        }
        for client in leftover {
            if let Err(e) = client.close().await {
                log::debug!("Failed to close WebDriver session: {}", e);
            }
        }
        Ok(())
    }
}

/// One WebDriver session.
pub struct WebDriverPage {
    id: usize,
    client: Client,
    sessions: Sessions,
}

impl Page for WebDriverPage {
    async fn goto(&mut self, url: &str) -> Result<(), ScrapeError> {
        self.client
            .goto(url)
            .await
            .map_err(|e| match e {
                CmdError::Standard(ref wd) if matches!(wd.error, ErrorStatus::Timeout) => {
                    ScrapeError::Timeout(url.to_string())
                }
                e => ScrapeError::Navigation {
                    url: url.to_string(),
                    reason: e.to_string(),
                },
            })
    }

    async fn current_url(&mut self) -> Result<String, ScrapeError> {
        Ok(self.client.current_url().await?.to_string())
    }

    async fn content(&mut self) -> Result<String, ScrapeError> {
        Ok(self.client.source().await?)
    }

    async fn click(&mut self, selector: &str) -> Result<bool, ScrapeError> {
        let elements = self.client.find_all(Locator::Css(selector)).await?;
        match elements.first() {
            Some(element) => {
                element.click().await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<bool, ScrapeError> {
        match self
            .client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(selector))
            .await
        {
            Ok(_) => Ok(true),
            Err(CmdError::WaitTimeout) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn close_popups(&mut self) -> Result<usize, ScrapeError> {
        let main = self.client.window().await?;
        let mut closed = 0;
        for handle in self.client.windows().await? {
            if handle == main {
                continue;
            }
            self.client.switch_to_window(handle).await?;
            self.client.close_window().await?;
            closed += 1;
        }
        if closed > 0 {
            self.client.switch_to_window(main).await?;
        }
        Ok(closed)
    }

    async fn close(self) -> Result<(), ScrapeError> {
        self.sessions.borrow_mut().remove(&self.id);
        self.client.close().await?;
        Ok(())
    }
}
