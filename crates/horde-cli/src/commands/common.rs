//! Common utilities shared across CLI commands.

use anyhow::{Context, Result};
use horde_core::cli::OutputFormat;
use horde_weather::WeatherError;
use serde::Serialize;
use std::io::{self, Read};

/// Joins report words given on the command line into one report.
///
/// A single `-` reads the report from stdin instead.
///
/// # Errors
///
/// Returns an error if stdin cannot be read, or
/// [`WeatherError::EmptyReport`] if the report is blank.
///
/// # Examples
///
/// ```
/// use horde_cli::commands::common::report_text;
///
/// let words = vec!["EDDF".to_string(), "011150Z".to_string()];
/// assert_eq!(report_text(&words).unwrap(), "EDDF 011150Z");
/// ```
pub fn report_text(words: &[String]) -> Result<String> {
    let text = if matches!(words, [only] if only == "-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read report from stdin")?;
        buffer
    } else {
        words.join(" ")
    };

    if text.trim().is_empty() {
        return Err(WeatherError::EmptyReport.into());
    }
    Ok(text)
}

/// Formats `data` and prints it to stdout.
///
/// # Errors
///
/// Returns an error if formatting fails.
pub fn print_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<()> {
    let formatted =
        crate::formatters::format_output(data, format).context("failed to format output")?;
    println!("{formatted}");
    Ok(())
}
