//! Station report download command.
//!
//! Fetches the latest METAR or TAF for a station from the configured feed
//! and prints it the same way `metar` and `taf` do.

use super::common::print_output;
use crate::runner::Settings;
use anyhow::{Context, Result};
use horde_core::cli::ExitCode;
use horde_weather::{ForecastSummary, NoaaSource, ObservationSummary, StationId, WeatherService};
use tracing::info;

/// Runs the fetch command.
///
/// # Errors
///
/// Returns an error if the station identifier is invalid, the feed cannot
/// be reached or has no report, or the report cannot be decoded.
pub async fn run(station: &str, taf: bool, full: bool, settings: &Settings) -> Result<ExitCode> {
    let station = StationId::new(station)?;
    let source = NoaaSource::from_config(&settings.config.weather)
        .context("failed to set up report source")?;
    let service = WeatherService::new(source);

    if taf {
        let forecast = service
            .forecast(&station)
            .await
            .with_context(|| format!("failed to get forecast for {station}"))?;
        info!(station = %station, periods = forecast.periods.len(), "Fetched TAF");
        if full {
            print_output(&forecast, settings.format)?;
        } else {
            print_output(&ForecastSummary::from_taf(&forecast, settings.units), settings.format)?;
        }
    } else {
        let observation = service
            .current(&station)
            .await
            .with_context(|| format!("failed to get observation for {station}"))?;
        info!(station = %station, "Fetched METAR");
        if full {
            print_output(&observation, settings.format)?;
        } else {
            let summary = ObservationSummary::from_metar(&observation, settings.units);
            print_output(&summary, settings.format)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
