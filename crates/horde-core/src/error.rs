//! Error types shared across the Horde tools.
//!
//! # Examples
//!
//! ```
//! use horde_core::{Error, Result};
//!
//! fn check_units(units: &str) -> Result<()> {
//!     if units.is_empty() {
//!         return Err(Error::ConfigError {
//!             message: "units cannot be empty".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = check_units("").unwrap_err();
//! assert!(err.is_config_error());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for configuration and argument handling.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    ///
    /// Raised when configuration is invalid, missing required fields,
    /// or contains contradictory settings.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Configuration file could not be read or written.
    #[error("Configuration file error at {path}")]
    ConfigIo {
        /// Location of the configuration file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for the expected model.
    #[error("Failed to parse configuration at {path}: {message}")]
    ConfigParse {
        /// Location of the configuration file
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Invalid argument error.
    ///
    /// Raised when CLI arguments or function parameters are invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Unknown configuration key.
    #[error("Unknown configuration key: {key}")]
    UnknownKey {
        /// The key that was requested
        key: String,
    },
}

impl Error {
    /// Returns `true` if this is a configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use horde_core::Error;
    ///
    /// let err = Error::ConfigError {
    ///     message: "Invalid units".to_string(),
    /// };
    /// assert!(err.is_config_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigError { .. } | Self::ConfigIo { .. } | Self::ConfigParse { .. }
        )
    }

    /// Returns `true` if this is an invalid argument error.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::UnknownKey { .. })
    }
}

/// Type alias for results using the core error type.
pub type Result<T> = std::result::Result<T, Error>;
