//! Output formatters for CLI commands.
//!
//! Provides consistent formatting across all CLI commands for JSON, text, and pretty output modes.

use anyhow::Result;
use colored::Colorize;
use horde_core::cli::OutputFormat;
use serde::Serialize;

/// Format data according to the specified output format.
///
/// # Arguments
///
/// * `data` - The data to format (must be serializable)
/// * `format` - The output format (Json, Text, Pretty)
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Examples
///
/// ```
/// use horde_cli::formatters::format_output;
/// use horde_core::cli::OutputFormat;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Station {
///     id: String,
///     elevation_m: u32,
/// }
///
/// let station = Station {
///     id: "EDDF".to_string(),
///     elevation_m: 111,
/// };
///
/// let output = format_output(&station, OutputFormat::Json)?;
/// assert!(output.contains("\"id\""));
///
/// let output = format_output(&station, OutputFormat::Text)?;
/// assert_eq!(output, "elevation_m: 111\nid: EDDF");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(data),
        OutputFormat::Text => text::format(data),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// JSON output formatting.
pub mod json {
    use super::{Result, Serialize};

    /// Format data as JSON.
    ///
    /// Uses pretty-printing with 2-space indentation.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let json = serde_json::to_string_pretty(data)?;
        Ok(json)
    }

    /// Format data as compact JSON (no formatting).
    pub fn format_compact<T: Serialize>(data: &T) -> Result<String> {
        let json = serde_json::to_string(data)?;
        Ok(json)
    }
}

/// Plain text output formatting.
pub mod text {
    use super::{Result, Serialize};
    use serde_json::Value;

    /// Format data as `key: value` lines in key order.
    ///
    /// Nested keys are joined with `.` and array items are addressed by
    /// index, so every line can be picked out with `grep`. Null values are
    /// left out. A scalar at the top level is printed on its own.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut lines = Vec::new();
        flatten(&value, "", &mut lines);
        Ok(lines.join("\n"))
    }

    fn flatten(value: &Value, prefix: &str, lines: &mut Vec<String>) {
        let key = |child: &str| {
            if prefix.is_empty() {
                child.to_string()
            } else {
                format!("{prefix}.{child}")
            }
        };

        match value {
            Value::Null => {}
            Value::Object(obj) => {
                for (name, child) in obj {
                    flatten(child, &key(name), lines);
                }
            }
            Value::Array(items) => {
                for (i, child) in items.iter().enumerate() {
                    flatten(child, &key(&i.to_string()), lines);
                }
            }
            scalar => {
                let rendered = match scalar {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                if prefix.is_empty() {
                    lines.push(rendered);
                } else {
                    lines.push(format!("{prefix}: {rendered}"));
                }
            }
        }
    }
}

/// Pretty (human-readable) output formatting.
pub mod pretty {
    use super::{Colorize, Result, Serialize};
    use serde_json::Value;

    /// Format data as colorized, human-readable output.
    ///
    /// Objects become an indented tree of `key: value` lines with nulls
    /// and empty collections dropped.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        // Convert to JSON value first for inspection
        let value = serde_json::to_value(data)?;

        let mut out = String::new();
        match &value {
            Value::Object(_) | Value::Array(_) => format_value(&value, 0, &mut out),
            scalar => out.push_str(&scalar_text(scalar)),
        }
        Ok(out.trim_end().to_string())
    }

    fn is_blank(value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::Array(items) => items.is_empty(),
            Value::Object(obj) => obj.is_empty(),
            _ => false,
        }
    }

    fn scalar_text(value: &Value) -> String {
        match value {
            Value::Bool(b) => b.to_string().yellow().to_string(),
            Value::Number(n) => n.to_string().cyan().to_string(),
            Value::String(s) => s.green().to_string(),
            _ => String::new(),
        }
    }

    /// Recursively format a value with colors and indentation.
    fn format_value(value: &Value, indent: usize, out: &mut String) {
        let indent_str = "  ".repeat(indent);

        match value {
            Value::Object(obj) => {
                for (key, val) in obj.iter().filter(|(_, v)| !is_blank(v)) {
                    out.push_str(&indent_str);
                    out.push_str(&key.blue().bold().to_string());
                    out.push(':');
                    if val.is_object() || val.is_array() {
                        out.push('\n');
                        format_value(val, indent + 1, out);
                    } else {
                        out.push(' ');
                        out.push_str(&scalar_text(val));
                        out.push('\n');
                    }
                }
            }
            Value::Array(items) => {
                for item in items.iter().filter(|v| !is_blank(v)) {
                    out.push_str(&indent_str);
                    out.push_str(&"-".dimmed().to_string());
                    if item.is_object() || item.is_array() {
                        out.push('\n');
                        format_value(item, indent + 1, out);
                    } else {
                        out.push(' ');
                        out.push_str(&scalar_text(item));
                        out.push('\n');
                    }
                }
            }
            scalar => {
                out.push_str(&indent_str);
                out.push_str(&scalar_text(scalar));
                out.push('\n');
            }
        }
    }
}
