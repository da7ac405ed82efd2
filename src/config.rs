//! Configuration management for collectscan.
//!
//! A config file (TOML, YAML or JSON) is either passed explicitly or
//! discovered with the prefer crate. File values are layered over defaults,
//! then environment overrides are applied, producing [`Settings`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::sources::{
    DEFAULT_LOOKUP_BASE_URL, DEFAULT_RESULT_SELECTOR, FANDOM_BASE_URL, UPCITEMDB_BASE_URL,
};
use crate::identity::QueryEncoding;
use crate::models::DEFAULT_BRAND;

/// Default catalog filename inside the data directory.
pub const DEFAULT_CATALOG_FILENAME: &str = "collection.csv";

/// Default Sheets range rows are appended to.
pub const DEFAULT_SHEETS_RANGE: &str = "Sheet1!A:E";

/// Overrides the catalog CSV path.
pub const CATALOG_ENV: &str = "COLLECTSCAN_CATALOG";

/// Supplies the Sheets bearer token.
pub const SHEETS_TOKEN_ENV: &str = "COLLECTSCAN_SHEETS_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {message}")]
    Parse { path: PathBuf, message: String },
}

/// Identity source endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upc_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookup_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookup_encoding: Option<QueryEncoding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookup_selector: Option<String>,
}

/// Google Sheets catalog target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    /// OAuth access token. Prefer the environment variable over storing it here.
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,
}

/// On-disk configuration. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data directory path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    /// Catalog CSV path (relative paths resolve against the config file).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    /// Placeholder brand for new records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_brand: Option<String>,
    /// User agent string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    /// Tesseract language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr_language: Option<String>,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheets: Option<SheetsConfig>,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer for discovery.
    /// Falls back to defaults when nothing is found or the file is unusable.
    pub async fn load() -> Self {
        match prefer::load("collectscan").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("Ignoring config: {}", e);
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// Format is chosen by extension: toml, yaml/yml, otherwise JSON.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let mut config = Self::parse(path, &contents)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let parsed = match ext {
            "toml" => toml::from_str(contents).map_err(|e| e.to_string()),
            "yaml" | "yml" => serde_yaml::from_str(contents).map_err(|e| e.to_string()),
            _ => serde_json::from_str(contents).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Directory relative paths resolve against.
    pub fn base_dir(&self) -> PathBuf {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// Resolve a path that may be relative or start with `~`.
    pub fn resolve_path(path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Layer this config over `settings`.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        let base_dir = self.base_dir();

        if let Some(ref data_dir) = self.data_dir {
            settings.data_dir = Self::resolve_path(data_dir, &base_dir);
            settings.catalog_path = settings.data_dir.join(DEFAULT_CATALOG_FILENAME);
        }
        if let Some(ref catalog) = self.catalog {
            settings.catalog_path = Self::resolve_path(catalog, &base_dir);
        }
        if let Some(ref brand) = self.default_brand {
            settings.default_brand = brand.clone();
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = user_agent.clone();
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(ref language) = self.ocr_language {
            settings.ocr_language = language.clone();
        }

        let sources = &self.sources;
        if let Some(ref url) = sources.upc_base_url {
            settings.sources.upc_base_url = url.clone();
        }
        if let Some(ref url) = sources.wiki_base_url {
            settings.sources.wiki_base_url = url.clone();
        }
        if let Some(ref url) = sources.lookup_base_url {
            settings.sources.lookup_base_url = url.clone();
        }
        if let Some(encoding) = sources.lookup_encoding {
            settings.sources.lookup_encoding = encoding;
        }
        if let Some(ref selector) = sources.lookup_selector {
            settings.sources.lookup_selector = selector.clone();
        }

        if let Some(ref sheets) = self.sheets {
            settings.sheets = Some(SheetsSettings {
                spreadsheet_id: sheets.spreadsheet_id.clone(),
                range: sheets
                    .range
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SHEETS_RANGE.to_string()),
                access_token: sheets.access_token.clone(),
            });
        }
    }
}

/// Resolved identity source settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    pub upc_base_url: String,
    pub wiki_base_url: String,
    pub lookup_base_url: String,
    pub lookup_encoding: QueryEncoding,
    pub lookup_selector: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            upc_base_url: UPCITEMDB_BASE_URL.to_string(),
            wiki_base_url: FANDOM_BASE_URL.to_string(),
            lookup_base_url: DEFAULT_LOOKUP_BASE_URL.to_string(),
            lookup_encoding: QueryEncoding::default(),
            lookup_selector: DEFAULT_RESULT_SELECTOR.to_string(),
        }
    }
}

/// Resolved Google Sheets settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetsSettings {
    pub spreadsheet_id: String,
    pub range: String,
    pub access_token: Option<String>,
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory.
    pub data_dir: PathBuf,
    /// Catalog CSV file.
    pub catalog_path: PathBuf,
    /// Placeholder brand for new records.
    pub default_brand: String,
    /// User agent for HTTP requests.
    pub user_agent: String,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// Tesseract language.
    pub ocr_language: String,
    pub sources: SourceSettings,
    /// When set, rows go to Google Sheets instead of the CSV file.
    pub sheets: Option<SheetsSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        // Documents dir -> Home dir -> Current dir
        let data_dir = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("collectscan");

        Self {
            catalog_path: data_dir.join(DEFAULT_CATALOG_FILENAME),
            data_dir,
            default_brand: DEFAULT_BRAND.to_string(),
            user_agent: crate::http_client::USER_AGENT.to_string(),
            request_timeout: crate::http_client::DEFAULT_TIMEOUT.as_secs(),
            ocr_language: "eng".to_string(),
            sources: SourceSettings::default(),
            sheets: None,
        }
    }
}

impl Settings {
    /// Request timeout as a duration.
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout)
    }

    /// Apply environment variable overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(path) = std::env::var(CATALOG_ENV) {
            if !path.is_empty() {
                self.catalog_path = Config::resolve_path(&path, Path::new("."));
            }
        }
        if let Ok(token) = std::env::var(SHEETS_TOKEN_ENV) {
            if let Some(ref mut sheets) = self.sheets {
                if !token.is_empty() {
                    sheets.access_token = Some(token);
                }
            }
        }
        self
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Catalog file override (--catalog flag).
    pub catalog: Option<PathBuf>,
}

/// Load settings: defaults, then config file, then env, then CLI overrides.
pub async fn load_settings(options: &LoadOptions) -> Result<Settings, ConfigError> {
    let config = match options.config_path {
        Some(ref path) => Config::load_from_path(path).await?,
        None => Config::load().await,
    };

    if let Some(ref path) = config.source_path {
        tracing::debug!("Loaded config from {}", path.display());
    }

    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    let mut settings = settings.with_env_overrides();

    if let Some(ref catalog) = options.catalog {
        settings.catalog_path = catalog.clone();
    }

    Ok(settings)
}
