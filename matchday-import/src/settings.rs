//! Harvester settings (store path, WebDriver endpoint, archive URL).
//!
//! Values are resolved in priority order: explicit override (CLI flag),
//! environment variable, `~/.config/matchday/settings.toml`, default.
//! A `.env` file in the working directory is loaded into the environment
//! first.

use std::path::{Path, PathBuf};

use matchday_scraper::{DEFAULT_ARCHIVE_URL, DEFAULT_WEBDRIVER_URL};
use thiserror::Error;

pub const ENV_DB_PATH: &str = "DB_PATH";
pub const ENV_WEBDRIVER_URL: &str = "WEBDRIVER_URL";
pub const ENV_HEADLESS: &str = "BROWSER_HEADLESS";
pub const ENV_ARCHIVE_URL: &str = "ARCHIVE_URL";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid settings file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: String, value: String },
}

/// Canonical path to the settings file: `~/.config/matchday/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("matchday").join("settings.toml")
}

/// Default store location: `<data dir>/matchday/matches.db`.
pub fn default_db_path() -> PathBuf {
    let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    data.join("matchday").join("matches.db")
}

/// TOML settings file format.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct SettingsFile {
    #[serde(default)]
    pub database: DatabaseSection,
    #[serde(default)]
    pub browser: BrowserSection,
    #[serde(default)]
    pub archive: ArchiveSection,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct DatabaseSection {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct BrowserSection {
    pub webdriver_url: Option<String>,
    pub headless: Option<bool>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct ArchiveSection {
    pub url: Option<String>,
}

impl SettingsFile {
    /// Read a settings file. A missing file yields empty settings.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No settings file at {}", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(SettingsError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn parse(contents: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(contents)?)
    }
}

/// Values given explicitly, typically on the command line.
#[derive(Debug, Default, Clone)]
pub struct SettingsOverrides {
    pub db_path: Option<PathBuf>,
    pub webdriver_url: Option<String>,
    pub headless: Option<bool>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub webdriver_url: String,
    pub headless: bool,
    pub archive_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: true,
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from overrides, the environment and the settings file.
    pub fn load(overrides: &SettingsOverrides) -> Result<Self, SettingsError> {
        dotenv::dotenv().ok();
        let file = SettingsFile::load(&settings_path())?;
        Self::resolve(overrides, &file, |key| std::env::var(key).ok())
    }

    /// Resolve each value: override > environment > file > default.
    pub fn resolve(
        overrides: &SettingsOverrides,
        file: &SettingsFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SettingsError> {
        let defaults = Self::default();
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let db_path = overrides
            .db_path
            .clone()
            .or_else(|| env(ENV_DB_PATH).map(PathBuf::from))
            .or_else(|| file.database.path.clone())
            .unwrap_or(defaults.db_path);

        let webdriver_url = overrides
            .webdriver_url
            .clone()
            .or_else(|| env(ENV_WEBDRIVER_URL))
            .or_else(|| file.browser.webdriver_url.clone())
            .unwrap_or(defaults.webdriver_url);

        let headless = match overrides.headless {
            Some(h) => h,
            None => match env(ENV_HEADLESS) {
                Some(value) => parse_bool(ENV_HEADLESS, &value)?,
                None => file.browser.headless.unwrap_or(defaults.headless),
            },
        };

        let archive_url = env(ENV_ARCHIVE_URL)
            .or_else(|| file.archive.url.clone())
            .unwrap_or(defaults.archive_url);

        Ok(Self {
            db_path,
            webdriver_url,
            headless,
            archive_url,
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, SettingsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(SettingsError::Invalid {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
