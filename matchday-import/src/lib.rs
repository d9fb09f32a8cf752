//! Season harvesting and persistence.
//!
//! This crate owns the end-to-end flow: discovering seasons, crawling and
//! extracting each one with a fresh browser, and committing the season's
//! matches to the store as one unit.

pub mod harvest;
pub mod progress;
pub mod report;
pub mod season_import;
pub mod settings;

pub use harvest::{
    DEFAULT_BATCH_SIZE, DEFAULT_START_YEAR, HarvestError, HarvestOptions, SqliteStore, StoreOpener,
    harvest, harvest_with_settings, run_harvest,
};
pub use progress::{HarvestProgress, LogProgress, SilentProgress};
pub use report::{HarvestReport, SeasonReport, SeasonStatus};
pub use season_import::{ImportError, SeasonImportStats, import_season};
pub use settings::{Settings, SettingsError, SettingsFile, SettingsOverrides, settings_path};
