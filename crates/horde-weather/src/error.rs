//! Error types for report decoding and fetching.

use thiserror::Error;

/// Errors that can occur while decoding or fetching weather reports.
///
/// # Examples
///
/// ```
/// use horde_weather::WeatherError;
///
/// let error = WeatherError::StationNotFound {
///     station: "ZZZZ".to_string(),
/// };
///
/// assert!(error.is_not_found());
/// ```
#[derive(Error, Debug)]
pub enum WeatherError {
    /// The report contained no tokens.
    #[error("Report is empty")]
    EmptyReport,

    /// No group of the report could be read as a station identifier.
    #[error("Report has no station identifier: {report}")]
    MissingStation {
        /// The raw report text
        report: String,
    },

    /// A station identifier is not four alphanumeric characters.
    #[error("Invalid station identifier: {id}")]
    InvalidStation {
        /// The rejected identifier
        id: String,
    },

    /// A unit system name was not recognised.
    #[error("Invalid unit system: '{value}' (expected: metric or standard)")]
    InvalidUnitSystem {
        /// The rejected value
        value: String,
    },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client")]
    Client {
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// The request to the report feed failed.
    #[error("Request to {url} failed")]
    Http {
        /// Requested URL
        url: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The report feed answered with a non-success status.
    #[error("Report feed {url} returned HTTP {status}")]
    HttpStatus {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The feed has no report for the station.
    #[error("No report available for station {station}")]
    StationNotFound {
        /// Station identifier
        station: String,
    },
}

impl WeatherError {
    /// Returns `true` if the error comes from decoding report text.
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(self, Self::EmptyReport | Self::MissingStation { .. })
    }

    /// Returns `true` if the station has no report.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::StationNotFound { .. })
    }

    /// Returns `true` if the error comes from the network layer.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(
            self,
            Self::Client { .. } | Self::Http { .. } | Self::HttpStatus { .. }
        )
    }

    /// Returns `true` if an input value was rejected.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidStation { .. } | Self::InvalidUnitSystem { .. }
        )
    }
}

/// Type alias for weather operation results.
pub type Result<T> = std::result::Result<T, WeatherError>;
