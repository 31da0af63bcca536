//! How `horde` presents decoded reports and VFS results, and how it
//! reports failure to the shell.
//!
//! `general.default_format` in the configuration file and the `--format`
//! flag both parse into [`OutputFormat`]. Failures are classified into an
//! [`ExitCode`] so scripts can tell a garbled report from an unreachable
//! feed.
//!
//! ```
//! use horde_core::cli::{ExitCode, OutputFormat};
//!
//! let format: OutputFormat = "TEXT".parse().unwrap();
//! assert_eq!(format.to_string(), "text");
//! assert_eq!(ExitCode::SOURCE_ERROR.as_i32(), 3);
//! ```

use std::fmt;
use std::str::FromStr;

/// Rendering of a decoded observation, forecast or VFS listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Indented JSON of the serialised record
    Json,
    /// One `key: value` line per leaf, nested keys joined with dots
    Text,
    /// Coloured tree, empty fields left out
    #[default]
    Pretty,
}

impl OutputFormat {
    /// Name used on the command line and in the config file.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Pretty => "pretty",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            "pretty" => Ok(Self::Pretty),
            _ => Err(crate::Error::InvalidArgument(format!(
                "unknown output format '{s}', use json, text or pretty"
            ))),
        }
    }
}

/// Process exit status of a `horde` invocation.
///
/// ```
/// use horde_core::cli::ExitCode;
///
/// assert!(ExitCode::SUCCESS.is_success());
/// assert!(!ExitCode::INVALID_INPUT.is_success());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Command completed.
    pub const SUCCESS: Self = Self(0);

    /// Anything not classified below.
    pub const ERROR: Self = Self(1);

    /// Undecodable report, bad station identifier, invalid VFS path,
    /// flag or configuration value.
    pub const INVALID_INPUT: Self = Self(2);

    /// The NOAA feed failed or had no report, or a VFS backend failed.
    pub const SOURCE_ERROR: Self = Self(3);

    /// Wraps a raw status.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        Self(code)
    }

    /// Raw status passed to `std::process::exit`.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// `true` only for [`ExitCode::SUCCESS`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 == 0
    }
}

impl Default for ExitCode {
    fn default() -> Self {
        Self::SUCCESS
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
