//! Where raw report text comes from.
//!
//! [`ReportSource`] abstracts over the NOAA text feed and an in-memory
//! source used offline and in tests.
//!
//! # Examples
//!
//! ```
//! use horde_weather::source::{ReportType, StaticSource, StationId};
//!
//! let station: StationId = "kbos".parse().unwrap();
//! assert_eq!(station.as_str(), "KBOS");
//!
//! let _source = StaticSource::new().with_report(
//!     station,
//!     ReportType::Metar,
//!     "KBOS 011154Z 27010KT 10SM FEW050 22/12 A3012",
//! );
//! ```

use crate::error::{Result, WeatherError};
use async_trait::async_trait;
use horde_core::WeatherConfig;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// ICAO station identifier: four characters, letters and digits,
/// starting with a letter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(String);

impl StationId {
    /// Validates and upper-cases a station identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::InvalidStation`] unless the identifier is four
    /// alphanumeric characters starting with a letter.
    pub fn new(id: impl AsRef<str>) -> Result<Self> {
        let id = id.as_ref().trim().to_uppercase();
        let valid = id.len() == 4
            && id.chars().all(|c| c.is_ascii_alphanumeric())
            && id.starts_with(|c: char| c.is_ascii_alphabetic());
        if !valid {
            return Err(WeatherError::InvalidStation { id });
        }
        Ok(Self(id))
    }

    /// Returns the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StationId {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// Kind of report to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportType {
    /// Current observation
    Metar,
    /// Terminal forecast
    Taf,
}

impl ReportType {
    /// Lower-case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Metar => "metar",
            Self::Taf => "taf",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider of raw report text.
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Fetches the latest report of `report` type for `station`.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::StationNotFound`] when no report exists, or a
    /// network error for remote sources.
    async fn fetch(&self, station: &StationId, report: ReportType) -> Result<String>;
}

/// NOAA text feed over HTTP.
#[derive(Debug, Clone)]
pub struct NoaaSource {
    client: reqwest::Client,
    metar_url: String,
    taf_url: String,
}

impl NoaaSource {
    /// Creates a source with explicit URL templates.
    ///
    /// `{station}` in a template is replaced with the station identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::Client`] if the HTTP client cannot be built.
    pub fn new(
        metar_url: impl Into<String>,
        taf_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("horde-weather/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| WeatherError::Client { source })?;
        Ok(Self {
            client,
            metar_url: metar_url.into(),
            taf_url: taf_url.into(),
        })
    }

    /// Creates a source from the `[weather]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::Client`] if the HTTP client cannot be built.
    pub fn from_config(config: &WeatherConfig) -> Result<Self> {
        Self::new(
            config.metar_url.clone(),
            config.taf_url.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    /// URL that would be requested for a station and report type.
    #[must_use]
    pub fn url_for(&self, station: &StationId, report: ReportType) -> String {
        let template = match report {
            ReportType::Metar => &self.metar_url,
            ReportType::Taf => &self.taf_url,
        };
        template.replace("{station}", station.as_str())
    }
}

#[async_trait]
impl ReportSource for NoaaSource {
    #[instrument(skip(self), fields(station = %station, report = %report))]
    async fn fetch(&self, station: &StationId, report: ReportType) -> Result<String> {
        let url = self.url_for(station, report);
        info!(url = %url, "Fetching report");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| WeatherError::Http {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(WeatherError::StationNotFound {
                station: station.to_string(),
            });
        }
        if !status.is_success() {
            return Err(WeatherError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| WeatherError::Http {
                url: url.clone(),
                source,
            })?;
        if body.trim().is_empty() {
            return Err(WeatherError::StationNotFound {
                station: station.to_string(),
            });
        }

        debug!(bytes = body.len(), "Report received");
        Ok(body)
    }
}

/// Reports held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    reports: HashMap<(StationId, ReportType), String>,
}

impl StaticSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a report and returns the source.
    #[must_use]
    pub fn with_report(
        mut self,
        station: StationId,
        report: ReportType,
        text: impl Into<String>,
    ) -> Self {
        self.insert(station, report, text);
        self
    }

    /// Adds or replaces a report.
    pub fn insert(&mut self, station: StationId, report: ReportType, text: impl Into<String>) {
        self.reports.insert((station, report), text.into());
    }
}

#[async_trait]
impl ReportSource for StaticSource {
    async fn fetch(&self, station: &StationId, report: ReportType) -> Result<String> {
        self.reports
            .get(&(station.clone(), report))
            .cloned()
            .ok_or_else(|| WeatherError::StationNotFound {
                station: station.to_string(),
            })
    }
}
