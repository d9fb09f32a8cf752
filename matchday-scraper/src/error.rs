/// Errors that can occur while driving the browser.
///
/// Most of these never escape the extractor: it degrades to partial records
/// instead. They surface from season discovery and crawling.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("Could not start WebDriver session: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    #[error("WebDriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Timed out waiting for '{0}'")]
    Timeout(String),

    #[error("Invalid URL '{url}': {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Archive page has no seasons: {0}")]
    NoSeasons(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
