//! Command execution and runtime logic.
//!
//! Contains logging initialization, settings resolution and the routing of
//! parsed commands to their handlers.

use anyhow::{Context, Result};
use horde_core::HordeConfig;
use horde_core::cli::{ExitCode, OutputFormat};
use horde_vfs::VfsError;
use horde_weather::{UnitSystem, WeatherError};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Commands;
use crate::commands;

/// Initializes logging infrastructure.
///
/// `--verbose` forces debug level. Otherwise `RUST_LOG` wins and
/// `default_level` (normally `general.log_level`) is the fallback.
///
/// # Errors
///
/// Returns an error if logging initialization fails.
pub fn init_logging(verbose: bool, default_level: &str) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("failed to initialize logging")?;

    Ok(())
}

/// Effective settings: the configuration file overlaid with global flags.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Output format for command results
    pub format: OutputFormat,
    /// Unit system for decoded summaries
    pub units: UnitSystem,
    /// Loaded configuration
    pub config: HordeConfig,
    /// Location the configuration was loaded from
    pub config_path: PathBuf,
}

impl Settings {
    /// Loads the configuration and applies `--format` and `--units`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is invalid or a flag
    /// value is not recognised.
    ///
    /// # Examples
    ///
    /// ```
    /// use horde_cli::runner::Settings;
    /// use horde_core::cli::OutputFormat;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let settings = Settings::resolve(
    ///     Some("json"),
    ///     None,
    ///     Some(dir.path().join("missing.toml")),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(settings.format, OutputFormat::Json);
    /// assert_eq!(settings.units.as_str(), "metric");
    /// ```
    pub fn resolve(
        format: Option<&str>,
        units: Option<&str>,
        config_path: Option<PathBuf>,
    ) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => HordeConfig::default_path()?,
        };
        let config = HordeConfig::load_from(&config_path)
            .with_context(|| format!("failed to load config from {}", config_path.display()))?;

        let format = format
            .unwrap_or(&config.general.default_format)
            .parse::<OutputFormat>()?;
        let units = units.unwrap_or(&config.weather.units).parse::<UnitSystem>()?;

        debug!(format = %format.as_str(), units = %units, "Resolved settings");

        Ok(Self {
            format,
            units,
            config,
            config_path,
        })
    }
}

/// Executes the specified CLI command.
///
/// Routes commands to their respective handlers and returns an exit code.
///
/// # Errors
///
/// Returns an error if command execution fails.
pub async fn execute_command(command: Commands, settings: &Settings) -> Result<ExitCode> {
    match command {
        Commands::Metar { report, full } => commands::metar::run(&report, full, settings),
        Commands::Taf { report, full } => commands::taf::run(&report, full, settings),
        Commands::Fetch { station, taf, full } => {
            commands::fetch::run(&station, taf, full, settings).await
        }
        Commands::Vfs {
            backend,
            root,
            quota,
            action,
        } => {
            let options = commands::vfs::BackendOptions {
                backend,
                root,
                quota,
            };
            commands::vfs::run(&options, action, settings)
        }
        Commands::Config { action } => commands::config::run(action, settings),
        Commands::Completions { shell } => {
            use crate::cli::Cli;
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            commands::completions::run(shell, &mut cmd)
        }
    }
}

/// Maps a failed command to the process exit code.
///
/// Malformed reports and invalid arguments exit with
/// [`ExitCode::INVALID_INPUT`]; unreachable or missing sources and storage
/// failures exit with [`ExitCode::SOURCE_ERROR`].
///
/// # Examples
///
/// ```
/// use horde_cli::runner::exit_code_for;
/// use horde_core::cli::ExitCode;
/// use horde_weather::WeatherError;
///
/// let err = anyhow::Error::from(WeatherError::EmptyReport);
/// assert_eq!(exit_code_for(&err), ExitCode::INVALID_INPUT);
/// assert_eq!(exit_code_for(&anyhow::anyhow!("boom")), ExitCode::ERROR);
/// ```
#[must_use]
pub fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    for cause in error.chain() {
        if let Some(e) = cause.downcast_ref::<WeatherError>() {
            if e.is_parse_error() || e.is_invalid_input() {
                return ExitCode::INVALID_INPUT;
            }
            if e.is_network_error() || e.is_not_found() {
                return ExitCode::SOURCE_ERROR;
            }
        }
        if let Some(e) = cause.downcast_ref::<VfsError>() {
            if e.is_invalid_path() || matches!(e, VfsError::InvalidQuota { .. }) {
                return ExitCode::INVALID_INPUT;
            }
            return ExitCode::SOURCE_ERROR;
        }
        if let Some(e) = cause.downcast_ref::<horde_core::Error>() {
            if e.is_invalid_argument() || e.is_config_error() {
                return ExitCode::INVALID_INPUT;
            }
        }
    }
    ExitCode::ERROR
}
