//! METAR and SPECI observation decoding.
//!
//! Groups are matched against an ordered slot table. `TEMPO` and `BECMG`
//! open a trend record and redirect later weather groups to it, and `RMK`
//! hands the rest of the report to the remarks decoder.
//!
//! # Examples
//!
//! ```
//! use horde_weather::metar::{parse_metar, ReportModifier};
//!
//! let metar = parse_metar(
//!     "METAR EDDF 011150Z AUTO 24012G22KT 9999 FEW035 18/09 Q1016 NOSIG",
//! ).unwrap();
//!
//! assert_eq!(metar.station, "EDDF");
//! assert_eq!(metar.modifier, Some(ReportModifier::Auto));
//! assert!((metar.pressure.unwrap().hectopascal() - 1016.0).abs() < 1e-9);
//! assert!(metar.no_significant_change);
//! ```

use crate::conditions::{
    CLOUDS, CONDITION, Conditions, NO_SIGNIFICANT_WEATHER, RUNWAY, RunwayVisualRange,
    VISIBILITY, VISIBILITY_FRACTION, WIND, WIND_VARIATION,
};
use crate::error::{Result, WeatherError};
use crate::grammar::{Grammar, SlotRule};
use crate::remarks::{Remarks, parse_remarks};
use crate::time::ReportTime;
use crate::tokenizer::tokenize;
use crate::units::{Pressure, PressureUnit, Temperature};
use regex::{Captures, Regex};
use serde::Serialize;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::debug;

static REPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(METAR|SPECI)$").expect("valid regex"));
pub(crate) static STATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9]{3}$").expect("valid regex"));
pub(crate) static UPDATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})?(\d{2})(\d{2})Z$").expect("valid regex"));
static MODIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(AUTO|COR|CC[A-Z])$").expect("valid regex"));
static TEMPERATURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(M)?(\d{2})/(?:(M)?(\d{2})|XX|//)?$").expect("valid regex"));
static PRESSURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:A(\d{4})|Q(\d{4}))$").expect("valid regex"));
static NO_SIGNIFICANT_CHANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^NOSIG$").expect("valid regex"));
static TREND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(TEMPO|BECMG)$").expect("valid regex"));
static TIME_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(FM|TL|AT)(\d{2})(\d{2})$").expect("valid regex"));
static REMARK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^RMK$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Report,
    Station,
    Update,
    Modifier,
    Wind,
    WindVariation,
    VisibilityFraction,
    Visibility,
    Runway,
    Condition,
    Clouds,
    Temperature,
    Pressure,
    NoSignificantChange,
    NoSignificantWeather,
    Trend,
    TimeMarker,
    Remark,
}

fn main_grammar() -> Grammar<Slot> {
    Grammar::new(vec![
        SlotRule::once(Slot::Report, &REPORT),
        SlotRule::once(Slot::Station, &STATION),
        SlotRule::once(Slot::Update, &UPDATE),
        SlotRule::once(Slot::Modifier, &MODIFIER),
        SlotRule::once(Slot::Wind, &WIND),
        SlotRule::once(Slot::WindVariation, &WIND_VARIATION),
        SlotRule::repeated(Slot::VisibilityFraction, &VISIBILITY_FRACTION),
        SlotRule::repeated(Slot::Visibility, &VISIBILITY),
        SlotRule::repeated(Slot::Runway, &RUNWAY),
        SlotRule::repeated(Slot::Condition, &CONDITION),
        SlotRule::repeated(Slot::Clouds, &CLOUDS),
        SlotRule::once(Slot::Temperature, &TEMPERATURE),
        SlotRule::once(Slot::Pressure, &PRESSURE),
        SlotRule::repeated(Slot::NoSignificantChange, &NO_SIGNIFICANT_CHANGE),
        SlotRule::repeated(Slot::Trend, &TREND),
        SlotRule::repeated(Slot::Remark, &REMARK),
    ])
}

fn trend_grammar() -> Grammar<Slot> {
    Grammar::new(vec![
        SlotRule::repeated(Slot::TimeMarker, &TIME_MARKER),
        SlotRule::repeated(Slot::Wind, &WIND),
        SlotRule::repeated(Slot::VisibilityFraction, &VISIBILITY_FRACTION),
        SlotRule::repeated(Slot::Visibility, &VISIBILITY),
        SlotRule::repeated(Slot::Condition, &CONDITION),
        SlotRule::repeated(Slot::Clouds, &CLOUDS),
        SlotRule::repeated(Slot::NoSignificantWeather, &NO_SIGNIFICANT_WEATHER),
        SlotRule::repeated(Slot::Trend, &TREND),
        SlotRule::repeated(Slot::Remark, &REMARK),
    ])
}

/// Routine observation or special report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ReportKind {
    /// `METAR`
    #[default]
    Metar,
    /// `SPECI`
    Speci,
}

/// Report modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReportModifier {
    /// `AUTO`: fully automated observation
    Auto,
    /// `COR` or `CCx`: corrected observation
    Corrected,
}

/// Trend forecast type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TrendKind {
    /// `BECMG`
    Becoming,
    /// `TEMPO`
    Temporary,
}

/// A `TEMPO`/`BECMG` trend appended to an observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trend {
    /// Trend type
    pub kind: TrendKind,
    /// `FMhhmm`
    pub from: Option<ReportTime>,
    /// `TLhhmm`
    pub until: Option<ReportTime>,
    /// `ATgggg`
    pub at: Option<ReportTime>,
    /// Expected conditions
    pub conditions: Conditions,
}

/// A decoded METAR or SPECI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metar {
    /// Report text as received
    pub raw: String,
    /// METAR or SPECI
    pub kind: ReportKind,
    /// ICAO station identifier
    pub station: String,
    /// Observation time
    pub time: Option<ReportTime>,
    /// `AUTO` or `COR`
    pub modifier: Option<ReportModifier>,
    /// Observed conditions
    pub conditions: Conditions,
    /// Air temperature
    pub temperature: Option<Temperature>,
    /// Dew point
    pub dew_point: Option<Temperature>,
    /// Altimeter setting / QNH
    pub pressure: Option<Pressure>,
    /// Runway visual ranges
    pub runways: Vec<RunwayVisualRange>,
    /// `NOSIG`
    pub no_significant_change: bool,
    /// Trend forecasts
    pub trends: Vec<Trend>,
    /// Decoded remarks section
    pub remarks: Remarks,
    /// Groups no rule accepted
    pub unparsed: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum Cursor {
    Main,
    Trend(usize),
}

impl Metar {
    fn empty(raw: &str) -> Self {
        Self {
            raw: raw.trim().to_string(),
            kind: ReportKind::default(),
            station: String::new(),
            time: None,
            modifier: None,
            conditions: Conditions::default(),
            temperature: None,
            dew_point: None,
            pressure: None,
            runways: Vec::new(),
            no_significant_change: false,
            trends: Vec::new(),
            remarks: Remarks::default(),
            unparsed: Vec::new(),
        }
    }

    fn conditions_mut(&mut self, cursor: Cursor) -> &mut Conditions {
        match cursor {
            Cursor::Main => &mut self.conditions,
            Cursor::Trend(index) => self
                .trends
                .get_mut(index)
                .map_or(&mut self.conditions, |trend| &mut trend.conditions),
        }
    }

    fn apply_temperature(&mut self, caps: &Captures<'_>) -> bool {
        let Some(temperature) = signed_celsius(caps.get(1).is_some(), &caps[2]) else {
            return false;
        };
        self.temperature = Some(temperature);
        self.dew_point = caps
            .get(4)
            .and_then(|dew| signed_celsius(caps.get(3).is_some(), dew.as_str()));
        true
    }

    fn apply_pressure(&mut self, caps: &Captures<'_>) -> bool {
        let pressure = if let Some(inches) = caps.get(1) {
            inches
                .as_str()
                .parse::<u16>()
                .ok()
                .map(|v| Pressure::new(f64::from(v) / 100.0, PressureUnit::InchesOfMercury))
        } else {
            caps[2]
                .parse::<u16>()
                .ok()
                .map(|v| Pressure::from_hectopascal(f64::from(v)))
        };
        self.pressure = pressure;
        pressure.is_some()
    }

    fn apply_time_marker(&mut self, cursor: Cursor, caps: &Captures<'_>) -> bool {
        let Cursor::Trend(index) = cursor else {
            return false;
        };
        let (Some(trend), Some(time)) = (
            self.trends.get_mut(index),
            ReportTime::from_parts(None, &caps[2], &caps[3]),
        ) else {
            return false;
        };
        match &caps[1] {
            "FM" => trend.from = Some(time),
            "TL" => trend.until = Some(time),
            _ => trend.at = Some(time),
        }
        true
    }
}

fn signed_celsius(negative: bool, digits: &str) -> Option<Temperature> {
    let value = f64::from(digits.parse::<u8>().ok()?);
    Some(Temperature::from_celsius(if negative { -value } else { value }))
}

/// Decodes a METAR or SPECI report.
///
/// # Errors
///
/// Returns [`WeatherError::EmptyReport`] for blank input and
/// [`WeatherError::MissingStation`] when no station group is found.
pub fn parse_metar(raw: &str) -> Result<Metar> {
    let tokens = tokenize(raw);
    if tokens.is_empty() {
        return Err(WeatherError::EmptyReport);
    }

    let mut metar = Metar::empty(raw);
    let mut grammar = main_grammar();
    let mut cursor = Cursor::Main;
    let mut station = None;
    let mut index = 0;

    while index < tokens.len() {
        let token = tokens[index].as_str();
        index += 1;

        let Some((slot, caps)) = grammar.match_token(token) else {
            metar.unparsed.push(token.to_string());
            continue;
        };

        let accepted = match slot {
            Slot::Report => {
                metar.kind = if &caps[1] == "SPECI" {
                    ReportKind::Speci
                } else {
                    ReportKind::Metar
                };
                true
            }
            Slot::Station => {
                station = Some(token.to_string());
                true
            }
            Slot::Update => {
                metar.time = ReportTime::from_parts(caps.get(1).map(|m| m.as_str()), &caps[2], &caps[3]);
                metar.time.is_some()
            }
            Slot::Modifier => {
                metar.modifier = Some(if token == "AUTO" {
                    ReportModifier::Auto
                } else {
                    ReportModifier::Corrected
                });
                true
            }
            Slot::Wind => metar.conditions_mut(cursor).apply_wind(&caps),
            Slot::WindVariation => metar.conditions_mut(cursor).apply_wind_variation(&caps),
            Slot::VisibilityFraction => {
                let combined = tokens.get(index).map(|next| format!("{token} {next}"));
                match combined {
                    Some(combined) if grammar.peek(Slot::Visibility, &combined) => {
                        index += 1;
                        VISIBILITY
                            .captures(&combined)
                            .is_some_and(|caps| metar.conditions_mut(cursor).apply_visibility(&caps))
                    }
                    _ => false,
                }
            }
            Slot::Visibility => metar.conditions_mut(cursor).apply_visibility(&caps),
            Slot::Runway => match RunwayVisualRange::from_captures(&caps) {
                Some(range) => {
                    metar.runways.push(range);
                    true
                }
                None => false,
            },
            Slot::Condition => metar.conditions_mut(cursor).apply_condition(&caps),
            Slot::Clouds => metar.conditions_mut(cursor).apply_clouds(&caps),
            Slot::Temperature => metar.apply_temperature(&caps),
            Slot::Pressure => metar.apply_pressure(&caps),
            Slot::NoSignificantChange => {
                metar.no_significant_change = true;
                true
            }
            Slot::NoSignificantWeather => {
                metar.conditions_mut(cursor).no_significant_weather = true;
                true
            }
            Slot::Trend => {
                metar.trends.push(Trend {
                    kind: if &caps[1] == "TEMPO" {
                        TrendKind::Temporary
                    } else {
                        TrendKind::Becoming
                    },
                    from: None,
                    until: None,
                    at: None,
                    conditions: Conditions::default(),
                });
                cursor = Cursor::Trend(metar.trends.len() - 1);
                grammar = trend_grammar();
                true
            }
            Slot::TimeMarker => metar.apply_time_marker(cursor, &caps),
            Slot::Remark => {
                metar.remarks = parse_remarks(&tokens[index..]);
                index = tokens.len();
                true
            }
        };

        if !accepted {
            metar.unparsed.push(token.to_string());
        }
    }

    metar.station = station.ok_or_else(|| WeatherError::MissingStation {
        report: metar.raw.clone(),
    })?;

    if !metar.unparsed.is_empty() {
        debug!(
            station = %metar.station,
            unparsed = ?metar.unparsed,
            "METAR contains unrecognised groups"
        );
    }

    Ok(metar)
}

impl FromStr for Metar {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self> {
        parse_metar(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::{Bound, CloudCoverage, WindDirection};
    use crate::units::{DistanceUnit, SpeedUnit};

    #[test]
    fn test_empty_report() {
        assert!(matches!(parse_metar("  "), Err(WeatherError::EmptyReport)));
    }

    #[test]
    fn test_missing_station() {
        let err = parse_metar("011154Z 27010KT").unwrap_err();
        assert!(matches!(err, WeatherError::MissingStation { .. }));
    }

    #[test]
    fn test_us_observation() {
        let metar = parse_metar(
            "KBOS 011154Z 27010G18KT 240V300 10SM FEW050 SCT250 22/M01 A3012 RMK AO2 SLP201",
        )
        .unwrap();
        assert_eq!(metar.station, "KBOS");
        assert_eq!(metar.time, ReportTime::new(Some(1), 11, 54));
        let wind = metar.conditions.wind.unwrap();
        assert_eq!(wind.direction, WindDirection::Degrees(270));
        assert_eq!(wind.variation, Some((240, 300)));
        let vis = metar.conditions.visibility.as_ref().unwrap();
        assert!((vis.distance.value_in(DistanceUnit::StatuteMiles) - 10.0).abs() < 1e-9);
        assert_eq!(metar.conditions.clouds.len(), 2);
        assert!((metar.temperature.unwrap().celsius() - 22.0).abs() < 1e-9);
        assert!((metar.dew_point.unwrap().celsius() + 1.0).abs() < 1e-9);
        assert!((metar.pressure.unwrap().value_in(PressureUnit::InchesOfMercury) - 30.12).abs() < 1e-9);
        assert!(metar.remarks.sea_level_pressure.is_some());
        assert!(metar.unparsed.is_empty());
    }

    #[test]
    fn test_speci_and_correction() {
        let metar = parse_metar("SPECI KJFK 011210Z COR 00000KT 1/2SM FG VV002 12/12 A2990").unwrap();
        assert_eq!(metar.kind, ReportKind::Speci);
        assert_eq!(metar.modifier, Some(ReportModifier::Corrected));
        assert!(metar.conditions.wind.unwrap().is_calm());
        assert_eq!(metar.conditions.clouds[0].coverage, CloudCoverage::VerticalVisibility);
    }

    #[test]
    fn test_visibility_fraction_lookahead() {
        let metar = parse_metar("KDEN 011153Z 36005KT 1 1/2SM BR OVC004 02/01 A3001").unwrap();
        let vis = metar.conditions.visibility.unwrap();
        assert!((vis.distance.value_in(DistanceUnit::StatuteMiles) - 1.5).abs() < 1e-9);
        assert!(metar.unparsed.is_empty());
    }

    #[test]
    fn test_lonely_digit_is_unparsed() {
        let metar = parse_metar("KDEN 011153Z 36005KT 3 BKN020").unwrap();
        assert_eq!(metar.unparsed, vec!["3"]);
        assert_eq!(metar.conditions.clouds.len(), 1);
    }

    #[test]
    fn test_cavok_and_missing_dew_point() {
        let metar = parse_metar("LFPG 011200Z 18004MPS CAVOK 25/ Q1018").unwrap();
        assert!(metar.conditions.cavok);
        assert_eq!(metar.conditions.visibility.unwrap().bound, Bound::MoreThan);
        assert!(metar.dew_point.is_none());
        let wind = metar.conditions.wind.unwrap();
        assert!((wind.speed.value_in(SpeedUnit::MetersPerSecond) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_trend_redirects_groups() {
        let metar = parse_metar(
            "EGLL 011150Z 24010KT 9999 SCT030 15/08 Q1012 BECMG FM1300 TL1500 25020KT 4000 SHRA TEMPO BKN012",
        )
        .unwrap();
        assert_eq!(metar.conditions.clouds.len(), 1);
        assert_eq!(metar.trends.len(), 2);
        let becmg = &metar.trends[0];
        assert_eq!(becmg.kind, TrendKind::Becoming);
        assert_eq!(becmg.from, ReportTime::new(None, 13, 0));
        assert_eq!(becmg.until, ReportTime::new(None, 15, 0));
        assert_eq!(becmg.conditions.weather.len(), 1);
        assert!(becmg.conditions.visibility.is_some());
        assert_eq!(metar.trends[1].kind, TrendKind::Temporary);
        assert_eq!(metar.trends[1].conditions.clouds.len(), 1);
        let main_wind = metar.conditions.wind.unwrap();
        assert_eq!(main_wind.direction, WindDirection::Degrees(240));
    }

    #[test]
    fn test_unknown_groups_are_kept() {
        let metar = parse_metar("KBOS 011154Z 27010KT 10SM XYZZY CLR 20/10 A2992").unwrap();
        assert_eq!(metar.unparsed, vec!["XYZZY"]);
    }

    #[test]
    fn test_runway_visual_range_collected() {
        let metar = parse_metar("EDDM 010620Z 05003KT 0300 R26L/0450N R26R/0500U FG VV001 02/02 Q1020").unwrap();
        assert_eq!(metar.runways.len(), 2);
        assert_eq!(metar.runways[0].runway, "26L");
    }

    #[test]
    fn test_from_str() {
        let metar: Metar = "KSEA 011153Z 18008KT 10SM OVC015 11/08 A2998".parse().unwrap();
        assert_eq!(metar.station, "KSEA");
    }
}
