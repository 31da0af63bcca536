//! Configuration model for the Horde tools.
//!
//! Configuration is stored in TOML format at:
//! - Linux: `~/.config/horde/config.toml`
//! - macOS: `~/Library/Application Support/horde/config.toml`
//! - Windows: `%APPDATA%\horde\config.toml`
//!
//! # Examples
//!
//! ```toml
//! [general]
//! default_format = "pretty"
//! log_level = "info"
//!
//! [weather]
//! units = "metric"
//! metar_url = "https://tgftp.nws.noaa.gov/data/observations/metar/stations/{station}.TXT"
//! taf_url = "https://tgftp.nws.noaa.gov/data/forecasts/taf/stations/{station}.TXT"
//! timeout_seconds = 10
//!
//! [vfs]
//! backend = "file"
//! root = "/var/lib/horde/vfs"
//! quota_bytes = 10485760
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Default NOAA METAR feed, `{station}` is replaced by the ICAO identifier.
pub const DEFAULT_METAR_URL: &str =
    "https://tgftp.nws.noaa.gov/data/observations/metar/stations/{station}.TXT";

/// Default NOAA TAF feed, `{station}` is replaced by the ICAO identifier.
pub const DEFAULT_TAF_URL: &str =
    "https://tgftp.nws.noaa.gov/data/forecasts/taf/stations/{station}.TXT";

const VALID_FORMATS: [&str; 3] = ["json", "text", "pretty"];
const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const VALID_UNITS: [&str; 2] = ["metric", "standard"];

/// Keys accepted by [`HordeConfig::get`] and [`HordeConfig::set`].
pub const CONFIG_KEYS: [&str; 9] = [
    "general.default_format",
    "general.log_level",
    "weather.units",
    "weather.metar_url",
    "weather.taf_url",
    "weather.timeout_seconds",
    "vfs.backend",
    "vfs.root",
    "vfs.quota_bytes",
];

/// Complete tool configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct HordeConfig {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Weather report settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Virtual filesystem settings
    #[serde(default)]
    pub vfs: VfsConfig,
}

/// General configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneralConfig {
    /// Default output format (json, text, pretty)
    pub default_format: String,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_format: "pretty".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Weather decoding and fetching settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeatherConfig {
    /// Display unit system (metric, standard)
    pub units: String,

    /// METAR feed URL template
    pub metar_url: String,

    /// TAF feed URL template
    pub taf_url: String,

    /// HTTP request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            units: "metric".to_string(),
            metar_url: DEFAULT_METAR_URL.to_string(),
            taf_url: DEFAULT_TAF_URL.to_string(),
            timeout_seconds: 10,
        }
    }
}

/// Storage backend selection for the virtual filesystem.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VfsBackendKind {
    /// Volatile in-memory tree
    #[default]
    Memory,
    /// Directory on the local filesystem
    File,
    /// `SQLite` database file
    Sql,
}

impl VfsBackendKind {
    /// Returns the configuration spelling of the backend.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File => "file",
            Self::Sql => "sql",
        }
    }
}

impl fmt::Display for VfsBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VfsBackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            "sql" => Ok(Self::Sql),
            _ => Err(Error::InvalidArgument(format!(
                "invalid vfs backend: '{s}' (expected: memory, file, or sql)"
            ))),
        }
    }
}

/// Virtual filesystem settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct VfsConfig {
    /// Backend used by `horde vfs`
    #[serde(default)]
    pub backend: VfsBackendKind,

    /// Host directory (file backend) or database file (sql backend)
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Optional quota in bytes
    #[serde(default)]
    pub quota_bytes: Option<u64>,
}

impl HordeConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if a value is out of range or unknown.
    ///
    /// # Examples
    ///
    /// ```
    /// use horde_core::HordeConfig;
    ///
    /// let mut config = HordeConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.weather.units = "imperial-ish".to_string();
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        check_one_of("general.default_format", &self.general.default_format, &VALID_FORMATS)?;
        check_one_of("general.log_level", &self.general.log_level, &VALID_LEVELS)?;
        check_one_of("weather.units", &self.weather.units, &VALID_UNITS)?;

        for (key, template) in [
            ("weather.metar_url", &self.weather.metar_url),
            ("weather.taf_url", &self.weather.taf_url),
        ] {
            if !template.contains("{station}") {
                return Err(Error::ConfigError {
                    message: format!("{key} must contain the {{station}} placeholder"),
                });
            }
        }

        if self.weather.timeout_seconds == 0 {
            return Err(Error::ConfigError {
                message: "weather.timeout_seconds must be greater than 0".to_string(),
            });
        }

        if self.weather.timeout_seconds > 300 {
            return Err(Error::ConfigError {
                message: "weather.timeout_seconds cannot exceed 300 seconds".to_string(),
            });
        }

        if self.vfs.backend != VfsBackendKind::Memory && self.vfs.root.is_none() {
            return Err(Error::ConfigError {
                message: format!("vfs.root is required for the {} backend", self.vfs.backend),
            });
        }

        if self.vfs.quota_bytes == Some(0) {
            return Err(Error::ConfigError {
                message: "vfs.quota_bytes must be greater than 0 when set".to_string(),
            });
        }

        Ok(())
    }

    /// Returns the platform-specific default configuration path.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform has no configuration directory.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| Error::ConfigError {
            message: "failed to determine config directory".to_string(),
        })?;

        Ok(config_dir.join("horde").join("config.toml"))
    }

    /// Loads configuration from the default path, or returns defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read, parsed or validated.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Loads configuration from `path`, or returns defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("Config file not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::ConfigIo {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let toml_str = toml::to_string_pretty(self).map_err(|e| Error::ConfigError {
            message: format!("failed to serialize config: {e}"),
        })?;

        fs::write(path, toml_str).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("Saved config to {}", path.display());

        Ok(())
    }

    /// Gets a configuration value by key path (e.g. `weather.units`).
    ///
    /// Returns `None` for unknown keys and for unset optional values.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "general.default_format" => Some(self.general.default_format.clone()),
            "general.log_level" => Some(self.general.log_level.clone()),

            "weather.units" => Some(self.weather.units.clone()),
            "weather.metar_url" => Some(self.weather.metar_url.clone()),
            "weather.taf_url" => Some(self.weather.taf_url.clone()),
            "weather.timeout_seconds" => Some(self.weather.timeout_seconds.to_string()),

            "vfs.backend" => Some(self.vfs.backend.to_string()),
            "vfs.root" => self.vfs.root.as_ref().map(|p| p.display().to_string()),
            "vfs.quota_bytes" => self.vfs.quota_bytes.map(|v| v.to_string()),

            _ => None,
        }
    }

    /// Sets a configuration value by key path.
    ///
    /// The result is not validated; call [`HordeConfig::validate`] or
    /// [`HordeConfig::save_to`] afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown keys or values of the wrong type.
    ///
    /// # Examples
    ///
    /// ```
    /// use horde_core::HordeConfig;
    ///
    /// let mut config = HordeConfig::default();
    /// config.set("weather.units", "standard").unwrap();
    /// assert_eq!(config.get("weather.units").as_deref(), Some("standard"));
    /// ```
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "general.default_format" => self.general.default_format = value.to_string(),
            "general.log_level" => self.general.log_level = value.to_string(),

            "weather.units" => self.weather.units = value.to_lowercase(),
            "weather.metar_url" => self.weather.metar_url = value.to_string(),
            "weather.taf_url" => self.weather.taf_url = value.to_string(),
            "weather.timeout_seconds" => {
                self.weather.timeout_seconds = parse_number(key, value)?;
            }

            "vfs.backend" => self.vfs.backend = value.parse()?,
            "vfs.root" => {
                self.vfs.root = if value.is_empty() || value == "none" {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "vfs.quota_bytes" => {
                self.vfs.quota_bytes = if value.is_empty() || value == "none" {
                    None
                } else {
                    Some(parse_number(key, value)?)
                };
            }

            _ => {
                return Err(Error::UnknownKey {
                    key: key.to_string(),
                });
            }
        }

        Ok(())
    }
}

fn check_one_of(key: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(Error::ConfigError {
            message: format!(
                "invalid {key} '{value}', must be one of: {}",
                allowed.join(", ")
            ),
        })
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value.parse().map_err(|_| {
        Error::InvalidArgument(format!("invalid value for {key}, must be a number: '{value}'"))
    })
}
