//! Fetch-and-decode facade over a [`ReportSource`].

use crate::error::Result;
use crate::metar::{Metar, parse_metar};
use crate::source::{ReportSource, ReportType, StationId};
use crate::taf::{Taf, parse_taf};
use tracing::debug;

/// Fetches reports from a source and decodes them.
///
/// # Examples
///
/// ```
/// use horde_weather::WeatherService;
/// use horde_weather::source::{ReportType, StaticSource, StationId};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let station = StationId::new("EGLL").unwrap();
/// let source = StaticSource::new().with_report(
///     station.clone(),
///     ReportType::Metar,
///     "EGLL 011150Z 24010KT 9999 SCT030 15/08 Q1012",
/// );
///
/// let service = WeatherService::new(source);
/// let metar = service.current(&station).await.unwrap();
/// assert_eq!(metar.station, "EGLL");
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WeatherService<S> {
    source: S,
}

impl<S: ReportSource> WeatherService<S> {
    /// Creates a service reading from `source`.
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Returns the underlying source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Latest observation for `station`.
    ///
    /// # Errors
    ///
    /// Propagates source errors and decoding errors.
    pub async fn current(&self, station: &StationId) -> Result<Metar> {
        let raw = self.source.fetch(station, ReportType::Metar).await?;
        debug!(station = %station, "Decoding METAR");
        parse_metar(&raw)
    }

    /// Latest forecast for `station`.
    ///
    /// # Errors
    ///
    /// Propagates source errors and decoding errors.
    pub async fn forecast(&self, station: &StationId) -> Result<Taf> {
        let raw = self.source.fetch(station, ReportType::Taf).await?;
        debug!(station = %station, "Decoding TAF");
        parse_taf(&raw)
    }
}
