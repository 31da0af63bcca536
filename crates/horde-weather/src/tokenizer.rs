//! Splits raw report text into upper-cased groups.

use regex::Regex;
use std::sync::LazyLock;

static NOAA_TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}/\d{2}/\d{2} \d{2}:\d{2}$").expect("valid regex"));

/// Tokenizes a METAR or TAF report.
///
/// Text after the first `=` is discarded, as is the timestamp line that
/// prefixes reports served by the NOAA feed.
///
/// # Examples
///
/// ```
/// use horde_weather::tokenizer::tokenize;
///
/// let tokens = tokenize("2024/05/01 12:00\nkbos 011154z 27010kt= junk");
/// assert_eq!(tokens, vec!["KBOS", "011154Z", "27010KT"]);
/// ```
#[must_use]
pub fn tokenize(raw: &str) -> Vec<String> {
    let body = raw.split('=').next().unwrap_or_default();
    let mut lines = body.lines().peekable();
    if lines
        .peek()
        .is_some_and(|first| NOAA_TIMESTAMP.is_match(first.trim()))
    {
        lines.next();
    }
    lines
        .flat_map(str::split_whitespace)
        .map(str::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t ").is_empty());
        assert!(tokenize("= KBOS").is_empty());
    }

    #[test]
    fn test_multiline_report() {
        let tokens = tokenize("TAF EGLL 011100Z 0112/0218 24010KT\n     TEMPO 0112/0115 4000 RA");
        assert_eq!(tokens.len(), 9);
        assert_eq!(tokens[5], "TEMPO");
    }

    #[test]
    fn test_timestamp_only_stripped_on_first_line() {
        let tokens = tokenize("KBOS 011154Z\n2024/05/01 12:00");
        assert_eq!(tokens, vec!["KBOS", "011154Z", "2024/05/01", "12:00"]);
    }
}
