//! Config command implementation.
//!
//! Manages the configuration file. Unless `--config` or `HORDE_CONFIG`
//! points elsewhere, it is stored in TOML format at:
//! - Linux: `~/.config/horde/config.toml`
//! - macOS: `~/Library/Application Support/horde/config.toml`
//! - Windows: `%APPDATA%\horde\config.toml`

use super::common::print_output;
use crate::actions::ConfigAction;
use crate::runner::Settings;
use anyhow::{Result, bail};
use horde_core::HordeConfig;
use horde_core::cli::ExitCode;
use horde_core::config::CONFIG_KEYS;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Configuration initialization result.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InitResult {
    /// Whether a file was written
    pub success: bool,
    /// Status message
    pub message: String,
    /// Configuration file location
    pub path: String,
}

/// Configuration value result.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ConfigValue {
    /// Configuration key
    pub key: String,
    /// Configuration value, `none` when an optional value is unset
    pub value: String,
}

/// Set configuration result.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SetResult {
    /// Whether set was successful
    pub success: bool,
    /// The key that was set
    pub key: String,
    /// The new value
    pub value: String,
    /// Status message
    pub message: String,
}

/// Configuration file location.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ConfigPath {
    /// Configuration file location
    pub path: String,
    /// Whether the file exists
    pub exists: bool,
}

/// Writes a default configuration to `path`.
///
/// An existing file is left alone unless `force` is set.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn init_config(path: &Path, force: bool) -> Result<InitResult> {
    if path.exists() && !force {
        return Ok(InitResult {
            success: false,
            message: "configuration file already exists (use --force to overwrite)".to_string(),
            path: path.display().to_string(),
        });
    }

    HordeConfig::default().save_to(path)?;
    info!(path = %path.display(), "Wrote default configuration");

    Ok(InitResult {
        success: true,
        message: "configuration file created with default values".to_string(),
        path: path.display().to_string(),
    })
}

/// Looks up `key` in `config`.
///
/// # Errors
///
/// Returns an error listing the available keys if `key` is unknown.
///
/// # Examples
///
/// ```
/// use horde_cli::commands::config::get_value;
/// use horde_core::HordeConfig;
///
/// let config = HordeConfig::default();
/// assert_eq!(get_value(&config, "weather.units").unwrap().value, "metric");
/// assert_eq!(get_value(&config, "vfs.root").unwrap().value, "none");
/// assert!(get_value(&config, "weather.colour").is_err());
/// ```
pub fn get_value(config: &HordeConfig, key: &str) -> Result<ConfigValue> {
    if !CONFIG_KEYS.contains(&key) {
        bail!(
            "configuration key '{key}' not found\n\nAvailable keys:\n{}",
            CONFIG_KEYS
                .iter()
                .map(|k| format!(" - {k}"))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    Ok(ConfigValue {
        key: key.to_string(),
        value: config.get(key).unwrap_or_else(|| "none".to_string()),
    })
}

/// Sets `key` in the file at `path`, starting from `config`.
///
/// The updated configuration is validated before it is written, so an
/// invalid value leaves the file untouched.
pub fn set_value(config: &HordeConfig, path: &Path, key: &str, value: &str) -> SetResult {
    let mut updated = config.clone();
    let outcome = updated
        .set(key, value)
        .and_then(|()| updated.save_to(path));

    match outcome {
        Ok(()) => SetResult {
            success: true,
            key: key.to_string(),
            value: value.to_string(),
            message: format!("set '{key}' to '{value}'"),
        },
        Err(e) => SetResult {
            success: false,
            key: key.to_string(),
            value: value.to_string(),
            message: format!("failed to set value: {e}"),
        },
    }
}

/// Runs the config command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be read or written.
pub fn run(action: ConfigAction, settings: &Settings) -> Result<ExitCode> {
    info!("Config action: {:?}", action);
    let path = settings.config_path.as_path();

    match action {
        ConfigAction::Init { force } => {
            print_output(&init_config(path, force)?, settings.format)?;
        }
        ConfigAction::Show => print_output(&settings.config, settings.format)?,
        ConfigAction::Get { key } => {
            print_output(&get_value(&settings.config, &key)?, settings.format)?;
        }
        ConfigAction::Set { key, value } => {
            let result = set_value(&settings.config, path, &key, &value);
            print_output(&result, settings.format)?;
            if !result.success {
                return Ok(ExitCode::INVALID_INPUT);
            }
        }
        ConfigAction::Path => {
            let result = ConfigPath {
                path: path.display().to_string(),
                exists: path.exists(),
            };
            print_output(&result, settings.format)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
