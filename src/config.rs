//! Configuration file support.
//!
//! Settings are layered, lowest priority first:
//! - built-in defaults
//! - `~/.config/dress-fitter/config.toml`
//! - environment variables (`DRESS_FITTER_API_URL`, `DRESS_FITTER_LOG`)
//!
//! A missing file is not an error. A file that cannot be read or parsed, or
//! that contains out-of-range values, is reported as a warning and the
//! affected values fall back to their defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};
use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const ENV_API_URL: &str = "DRESS_FITTER_API_URL";
pub const ENV_LOG: &str = "DRESS_FITTER_LOG";

/// Where the dress catalog comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    /// `GET /api/admin/dresses`
    Remote,
    /// The static list shipped with the app
    Builtin,
}

/// Fully resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub catalog: CatalogConfig,
    pub ui: UiConfig,
    pub log_level: log::LevelFilter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    /// `None` leaves timeouts to the HTTP transport
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    pub source: CatalogSource,
    pub page_size: usize,
    pub page_increment: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UiConfig {
    pub success_marker: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                timeout: None,
            },
            catalog: CatalogConfig {
                source: CatalogSource::Remote,
                page_size: 5,
                page_increment: 5,
            },
            ui: UiConfig {
                success_marker: Duration::from_millis(1500),
            },
            log_level: log::LevelFilter::Info,
        }
    }
}

/// On-disk shape; every field is optional so partial files merge cleanly.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    api: FileApi,
    catalog: FileCatalog,
    ui: FileUi,
    log: FileLog,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileApi {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileCatalog {
    source: Option<CatalogSource>,
    page_size: Option<usize>,
    page_increment: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileUi {
    success_marker_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileLog {
    level: Option<String>,
}

impl AppConfig {
    /// Load from the user config file and the process environment.
    pub fn load() -> Self {
        let file = config_path().and_then(|path| {
            if !path.exists() {
                debug!("Config not found: {}", path.display());
                return None;
            }
            info!("Loading config: {}", path.display());
            match read_file(&path) {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!("{e}");
                    None
                }
            }
        });

        Self::from_layers(file.as_deref(), |key| std::env::var(key).ok())
    }

    /// Build a config from optional TOML text and an environment lookup.
    pub fn from_layers(file: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(text) = file {
            match toml::from_str::<FileConfig>(text) {
                Ok(parsed) => config.apply_file(parsed),
                Err(source) => warn!(
                    "{}",
                    ConfigError::Parse {
                        path: "config.toml".to_string(),
                        source,
                    }
                ),
            }
        }

        if let Some(url) = env(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            let url = url.trim();
            match validate_base_url(url) {
                Ok(()) => config.api.base_url = url.to_string(),
                Err(e) => warn!("{ENV_API_URL}: {e}"),
            }
        }
        if let Some(level) = env(ENV_LOG) {
            match level.parse() {
                Ok(level) => config.log_level = level,
                Err(_) => warn!("{ENV_LOG}: unknown log level '{level}'"),
            }
        }

        config
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(url) = file.api.base_url {
            match validate_base_url(&url) {
                Ok(()) => self.api.base_url = url,
                Err(e) => warn!("{e}"),
            }
        }
        if let Some(secs) = file.api.timeout_secs {
            if secs == 0 {
                warn!("{}", ConfigError::Invalid("api.timeout_secs must be > 0".into()));
            } else {
                self.api.timeout = Some(Duration::from_secs(secs));
            }
        }

        if let Some(source) = file.catalog.source {
            self.catalog.source = source;
        }
        match file.catalog.page_size {
            Some(0) => warn!("{}", ConfigError::Invalid("catalog.page_size must be > 0".into())),
            Some(n) => self.catalog.page_size = n,
            None => {}
        }
        match file.catalog.page_increment {
            Some(0) => warn!(
                "{}",
                ConfigError::Invalid("catalog.page_increment must be > 0".into())
            ),
            Some(n) => self.catalog.page_increment = n,
            None => {}
        }

        if let Some(ms) = file.ui.success_marker_ms {
            self.ui.success_marker = Duration::from_millis(ms);
        }

        if let Some(level) = file.log.level {
            match level.parse() {
                Ok(level) => self.log_level = level,
                Err(_) => warn!("log.level: unknown log level '{level}'"),
            }
        }
    }
}

fn validate_base_url(url: &str) -> Result<(), ConfigError> {
    reqwest::Url::parse(url)
        .map(|_| ())
        .map_err(|e| ConfigError::Invalid(format!("api.base_url '{url}' is not a URL: {e}")))
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// `~/.config/dress-fitter/config.toml` on Linux
fn config_path() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push("dress-fitter");
    path.push("config.toml");
    Some(path)
}
