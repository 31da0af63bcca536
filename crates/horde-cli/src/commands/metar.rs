//! METAR decoding command.
//!
//! Decodes an observation given on the command line or stdin and prints it
//! either as a unit-converted summary or with every decoded field.

use super::common::{print_output, report_text};
use crate::runner::Settings;
use anyhow::Result;
use horde_core::cli::ExitCode;
use horde_weather::{Metar, ObservationSummary, parse_metar};
use tracing::{info, warn};

/// Decodes `text` and logs groups that no rule accepted.
///
/// # Errors
///
/// Returns a parse error when the report is empty or has no station.
///
/// # Examples
///
/// ```
/// use horde_cli::commands::metar::decode;
///
/// let metar = decode("EGLL 011150Z 24010KT 9999 SCT030 15/08 Q1012").unwrap();
/// assert_eq!(metar.station, "EGLL");
/// ```
pub fn decode(text: &str) -> Result<Metar> {
    let metar = parse_metar(text)?;
    if !metar.unparsed.is_empty() {
        warn!(groups = ?metar.unparsed, "Some groups were not recognised");
    }
    info!(station = %metar.station, "Decoded METAR");
    Ok(metar)
}

/// Runs the metar command.
///
/// # Errors
///
/// Returns an error if the report cannot be read or decoded.
pub fn run(report: &[String], full: bool, settings: &Settings) -> Result<ExitCode> {
    let metar = decode(&report_text(report)?)?;

    if full {
        print_output(&metar, settings.format)?;
    } else {
        let summary = ObservationSummary::from_metar(&metar, settings.units);
        print_output(&summary, settings.format)?;
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use horde_weather::UnitSystem;

    #[test]
    fn test_decode_observation() {
        let metar = decode("KJFK 011151Z 31012KT 10SM FEW250 M02/M12 A3021").unwrap();
        assert_eq!(metar.station, "KJFK");
        assert!(metar.unparsed.is_empty());

        let summary = ObservationSummary::from_metar(&metar, UnitSystem::Metric);
        assert_eq!(summary.station, "KJFK");
        assert!(summary.temperature.is_some());
    }

    #[test]
    fn test_decode_empty_is_parse_error() {
        let err = decode("   ").unwrap_err();
        let weather = err.downcast_ref::<horde_weather::WeatherError>().unwrap();
        assert!(weather.is_parse_error());
    }
}
