//! TAF decoding command.

use super::common::{print_output, report_text};
use crate::runner::Settings;
use anyhow::Result;
use horde_core::cli::ExitCode;
use horde_weather::{ForecastSummary, Taf, parse_taf};
use tracing::{info, warn};

/// Decodes `text` and logs groups that no rule accepted.
///
/// # Errors
///
/// Returns a parse error when the forecast is empty or has no station.
pub fn decode(text: &str) -> Result<Taf> {
    let taf = parse_taf(text)?;
    if !taf.unparsed.is_empty() {
        warn!(groups = ?taf.unparsed, "Some groups were not recognised");
    }
    info!(station = %taf.station, periods = taf.periods.len(), "Decoded TAF");
    Ok(taf)
}

/// Runs the taf command.
///
/// # Errors
///
/// Returns an error if the forecast cannot be read or decoded.
pub fn run(report: &[String], full: bool, settings: &Settings) -> Result<ExitCode> {
    let taf = decode(&report_text(report)?)?;

    if full {
        print_output(&taf, settings.format)?;
    } else {
        print_output(&ForecastSummary::from_taf(&taf, settings.units), settings.format)?;
    }

    Ok(ExitCode::SUCCESS)
}
