//! Terminal aerodrome forecast decoding.
//!
//! The base forecast is the first period. `FM` groups open further periods,
//! while `BECMG`, `TEMPO` and `PROBnn` open change groups inside the current
//! period. Weather groups are written to whichever record was opened last.
//!
//! # Examples
//!
//! ```
//! use horde_weather::taf::{parse_taf, ChangeKind};
//!
//! let taf = parse_taf(
//!     "TAF KJFK 011130Z 0112/0218 20012KT P6SM SCT040 \
//!      FM012000 22015G25KT 5SM -SHRA BKN030 \
//!      PROB30 TEMPO 0122/0202 2SM TSRA OVC015CB",
//! ).unwrap();
//!
//! assert_eq!(taf.periods.len(), 2);
//! let change = &taf.periods[1].changes[0];
//! assert_eq!(change.kind, ChangeKind::Temporary);
//! assert_eq!(change.probability, Some(30));
//! ```

use crate::conditions::{
    CLOUDS, CONDITION, Conditions, NO_SIGNIFICANT_WEATHER, TIME_RANGE, VISIBILITY,
    VISIBILITY_FRACTION, WIND, decode_time_range,
};
use crate::error::{Result, WeatherError};
use crate::grammar::{Grammar, SlotRule};
use crate::metar::{STATION, UPDATE};
use crate::time::ReportTime;
use crate::tokenizer::tokenize;
use crate::units::{Distance, DistanceUnit, Speed, SpeedUnit, Temperature};
use regex::{Captures, Regex};
use serde::Serialize;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::debug;

static REPORT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^TAF$").expect("valid regex"));
static AMENDED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^AMD$").expect("valid regex"));
static CORRECTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^COR$").expect("valid regex"));
static STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(NIL|CNL)$").expect("valid regex"));
static FROM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^FM(\d{2})?(\d{2})(\d{2})Z?$").expect("valid regex"));
static CHANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(BECMG|TEMPO)$").expect("valid regex"));
static PROBABILITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^PROB(\d{2})$").expect("valid regex"));
static LEGACY_CHANGE_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})(\d{2})$").expect("valid regex"));
static WIND_SHEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^WS(\d{3})/(\d{3})(\d{2,3})(KT|MPS|KMH)$").expect("valid regex")
});
static TEMPERATURE_EXTREME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^T([XN])(M)?(\d{2})/(\d{2})(\d{2})?Z$").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Report,
    Amended,
    Corrected,
    Station,
    Issued,
    Valid,
    Status,
    From,
    Change,
    Probability,
    Wind,
    VisibilityFraction,
    Visibility,
    Condition,
    Clouds,
    WindShear,
    TemperatureExtreme,
    NoSignificantWeather,
}

fn taf_grammar() -> Grammar<Slot> {
    Grammar::new(vec![
        SlotRule::once(Slot::Report, &REPORT),
        SlotRule::once(Slot::Amended, &AMENDED),
        SlotRule::once(Slot::Corrected, &CORRECTED),
        SlotRule::once(Slot::Station, &STATION),
        SlotRule::once(Slot::Issued, &UPDATE),
        SlotRule::once(Slot::Valid, &TIME_RANGE),
        SlotRule::once(Slot::Status, &STATUS),
        SlotRule::repeated(Slot::From, &FROM),
        SlotRule::repeated(Slot::Change, &CHANGE),
        SlotRule::repeated(Slot::Probability, &PROBABILITY),
        SlotRule::repeated(Slot::Wind, &WIND),
        SlotRule::repeated(Slot::VisibilityFraction, &VISIBILITY_FRACTION),
        SlotRule::repeated(Slot::Visibility, &VISIBILITY),
        SlotRule::repeated(Slot::Condition, &CONDITION),
        SlotRule::repeated(Slot::Clouds, &CLOUDS),
        SlotRule::repeated(Slot::WindShear, &WIND_SHEAR),
        SlotRule::repeated(Slot::TemperatureExtreme, &TEMPERATURE_EXTREME),
        SlotRule::repeated(Slot::NoSignificantWeather, &NO_SIGNIFICANT_WEATHER),
    ])
}

/// Forecast validity window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidityPeriod {
    /// Start of validity
    pub from: ReportTime,
    /// End of validity
    pub until: ReportTime,
}

/// `NIL` or `CNL` forecast status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ForecastStatus {
    /// No forecast issued
    Missing,
    /// Forecast cancelled
    Cancelled,
}

/// Low level wind shear (`WS020/24045KT`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindShear {
    /// Height of the shear layer
    pub height: Distance,
    /// Wind direction at that height
    pub direction: u16,
    /// Wind speed at that height
    pub speed: Speed,
}

/// Forecast temperature extreme (`TX25/0118Z`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureForecast {
    /// Forecast temperature
    pub temperature: Temperature,
    /// When it is expected
    pub time: ReportTime,
}

/// Change group type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChangeKind {
    /// `BECMG`
    Becoming,
    /// `TEMPO`
    Temporary,
    /// `PROBnn` on its own
    Probability,
}

/// A change group within a forecast period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastChange {
    /// Change type
    pub kind: ChangeKind,
    /// Probability in percent
    pub probability: Option<u8>,
    /// Start of the change
    pub from: Option<ReportTime>,
    /// End of the change
    pub until: Option<ReportTime>,
    /// Expected conditions
    pub conditions: Conditions,
    /// Low level wind shear
    pub wind_shear: Option<WindShear>,
}

impl ForecastChange {
    fn new(kind: ChangeKind, probability: Option<u8>) -> Self {
        Self {
            kind,
            probability,
            from: None,
            until: None,
            conditions: Conditions::default(),
            wind_shear: None,
        }
    }

    fn is_fresh_probability(&self) -> bool {
        self.kind == ChangeKind::Probability
            && self.from.is_none()
            && self.wind_shear.is_none()
            && self.conditions.is_empty()
    }
}

/// A base or `FM` forecast period.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastPeriod {
    /// Start of the period, the validity start for the base period
    pub from: Option<ReportTime>,
    /// Forecast conditions
    pub conditions: Conditions,
    /// Low level wind shear
    pub wind_shear: Option<WindShear>,
    /// `TX` group
    pub max_temperature: Option<TemperatureForecast>,
    /// `TN` group
    pub min_temperature: Option<TemperatureForecast>,
    /// Change groups
    pub changes: Vec<ForecastChange>,
}

/// A decoded TAF.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Taf {
    /// Report text as received
    pub raw: String,
    /// ICAO station identifier
    pub station: String,
    /// Issue time
    pub issued: Option<ReportTime>,
    /// `AMD`
    pub amended: bool,
    /// `COR`
    pub corrected: bool,
    /// `NIL`/`CNL`
    pub status: Option<ForecastStatus>,
    /// Validity window
    pub valid: Option<ValidityPeriod>,
    /// Base period followed by `FM` periods
    pub periods: Vec<ForecastPeriod>,
    /// Groups no rule accepted
    pub unparsed: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum Cursor {
    Period(usize),
    Change(usize, usize),
}

impl Taf {
    fn empty(raw: &str) -> Self {
        Self {
            raw: raw.trim().to_string(),
            station: String::new(),
            issued: None,
            amended: false,
            corrected: false,
            status: None,
            valid: None,
            periods: vec![ForecastPeriod::default()],
            unparsed: Vec::new(),
        }
    }

    fn period_mut(&mut self, cursor: Cursor) -> Option<&mut ForecastPeriod> {
        let (Cursor::Period(index) | Cursor::Change(index, _)) = cursor;
        self.periods.get_mut(index)
    }

    fn change_mut(&mut self, cursor: Cursor) -> Option<&mut ForecastChange> {
        match cursor {
            Cursor::Change(period, change) => self.periods.get_mut(period)?.changes.get_mut(change),
            Cursor::Period(_) => None,
        }
    }

    fn conditions_mut(&mut self, cursor: Cursor) -> Option<&mut Conditions> {
        match cursor {
            Cursor::Period(index) => self.periods.get_mut(index).map(|p| &mut p.conditions),
            Cursor::Change(..) => self.change_mut(cursor).map(|c| &mut c.conditions),
        }
    }

    fn wind_shear_mut(&mut self, cursor: Cursor) -> Option<&mut Option<WindShear>> {
        match cursor {
            Cursor::Period(index) => self.periods.get_mut(index).map(|p| &mut p.wind_shear),
            Cursor::Change(..) => self.change_mut(cursor).map(|c| &mut c.wind_shear),
        }
    }

    /// Opens a change group, reusing a bare `PROBnn` group when one was
    /// just opened.
    fn open_change(&mut self, cursor: Cursor, kind: ChangeKind) -> Option<Cursor> {
        if kind != ChangeKind::Probability {
            if let Some(change) = self.change_mut(cursor) {
                if change.is_fresh_probability() {
                    change.kind = kind;
                    return Some(cursor);
                }
            }
        }
        let (Cursor::Period(period) | Cursor::Change(period, _)) = cursor;
        let changes = &mut self.periods.get_mut(period)?.changes;
        changes.push(ForecastChange::new(kind, None));
        Some(Cursor::Change(period, changes.len() - 1))
    }

    fn apply_change_time(&mut self, cursor: Cursor, token: &str) -> bool {
        let range = if let Some(caps) = TIME_RANGE.captures(token) {
            caps.get(1).and_then(|_| decode_time_range(&caps))
        } else if let Some(caps) = LEGACY_CHANGE_TIME.captures(token) {
            ReportTime::from_parts(None, &caps[1], "00")
                .zip(ReportTime::from_parts(None, &caps[2], "00"))
        } else {
            None
        };
        match (range, self.change_mut(cursor)) {
            (Some((from, until)), Some(change)) => {
                change.from = Some(from);
                change.until = Some(until);
                true
            }
            _ => false,
        }
    }

    fn apply_temperature_extreme(&mut self, cursor: Cursor, caps: &Captures<'_>) -> bool {
        let Some(forecast) = decode_temperature_extreme(caps) else {
            return false;
        };
        let Some(period) = self.period_mut(cursor) else {
            return false;
        };
        if &caps[1] == "X" {
            period.max_temperature = Some(forecast);
        } else {
            period.min_temperature = Some(forecast);
        }
        true
    }
}

fn decode_temperature_extreme(caps: &Captures<'_>) -> Option<TemperatureForecast> {
    let degrees = f64::from(caps[3].parse::<u8>().ok()?);
    let time = match caps.get(5) {
        Some(hour) => ReportTime::from_parts(Some(&caps[4]), hour.as_str(), "00")?,
        None => ReportTime::from_parts(None, &caps[4], "00")?,
    };
    Some(TemperatureForecast {
        temperature: Temperature::from_celsius(if caps.get(2).is_some() {
            -degrees
        } else {
            degrees
        }),
        time,
    })
}

fn decode_wind_shear(caps: &Captures<'_>) -> Option<WindShear> {
    let unit = SpeedUnit::from_report_code(&caps[4])?;
    Some(WindShear {
        height: Distance::new(
            f64::from(caps[1].parse::<u16>().ok()?) * 100.0,
            DistanceUnit::Feet,
        ),
        direction: caps[2].parse().ok()?,
        speed: Speed::new(f64::from(caps[3].parse::<u16>().ok()?), unit),
    })
}

fn decode_validity(caps: &Captures<'_>) -> Option<ValidityPeriod> {
    let (from, until) = decode_time_range(caps)?;
    Some(ValidityPeriod { from, until })
}

/// Decodes a terminal aerodrome forecast.
///
/// # Errors
///
/// Returns [`WeatherError::EmptyReport`] for blank input and
/// [`WeatherError::MissingStation`] when no station group is found.
pub fn parse_taf(raw: &str) -> Result<Taf> {
    let tokens = tokenize(raw);
    if tokens.is_empty() {
        return Err(WeatherError::EmptyReport);
    }

    let mut taf = Taf::empty(raw);
    let mut grammar = taf_grammar();
    let mut cursor = Cursor::Period(0);
    let mut station = None;
    let mut expect_change_time = false;
    let mut index = 0;

    while index < tokens.len() {
        let token = tokens[index].as_str();
        index += 1;

        if expect_change_time {
            expect_change_time = false;
            if taf.apply_change_time(cursor, token) {
                continue;
            }
        }

        let Some((slot, caps)) = grammar.match_token(token) else {
            taf.unparsed.push(token.to_string());
            continue;
        };

        let accepted = match slot {
            Slot::Report => true,
            Slot::Amended => {
                taf.amended = true;
                true
            }
            Slot::Corrected => {
                taf.corrected = true;
                true
            }
            Slot::Station => {
                station = Some(token.to_string());
                true
            }
            Slot::Issued => {
                taf.issued =
                    ReportTime::from_parts(caps.get(1).map(|m| m.as_str()), &caps[2], &caps[3]);
                taf.issued.is_some()
            }
            Slot::Valid => {
                taf.valid = decode_validity(&caps);
                if let (Some(valid), Some(base)) = (taf.valid, taf.periods.first_mut()) {
                    base.from = Some(valid.from);
                }
                taf.valid.is_some()
            }
            Slot::Status => {
                taf.status = Some(if &caps[1] == "NIL" {
                    ForecastStatus::Missing
                } else {
                    ForecastStatus::Cancelled
                });
                true
            }
            Slot::From => {
                match ReportTime::from_parts(caps.get(1).map(|m| m.as_str()), &caps[2], &caps[3]) {
                    Some(from) => {
                        taf.periods.push(ForecastPeriod {
                            from: Some(from),
                            ..ForecastPeriod::default()
                        });
                        cursor = Cursor::Period(taf.periods.len() - 1);
                        true
                    }
                    None => false,
                }
            }
            Slot::Change => {
                let kind = if &caps[1] == "TEMPO" {
                    ChangeKind::Temporary
                } else {
                    ChangeKind::Becoming
                };
                match taf.open_change(cursor, kind) {
                    Some(next) => {
                        cursor = next;
                        expect_change_time = true;
                        true
                    }
                    None => false,
                }
            }
            Slot::Probability => {
                let probability = caps[1].parse::<u8>().ok();
                match taf.open_change(cursor, ChangeKind::Probability) {
                    Some(next) => {
                        cursor = next;
                        if let Some(change) = taf.change_mut(cursor) {
                            change.probability = probability;
                        }
                        expect_change_time = true;
                        true
                    }
                    None => false,
                }
            }
            Slot::Wind => taf.conditions_mut(cursor).is_some_and(|c| c.apply_wind(&caps)),
            Slot::VisibilityFraction => {
                let combined = tokens.get(index).map(|next| format!("{token} {next}"));
                match combined {
                    Some(combined) if grammar.peek(Slot::Visibility, &combined) => {
                        index += 1;
                        VISIBILITY.captures(&combined).is_some_and(|caps| {
                            taf.conditions_mut(cursor)
                                .is_some_and(|c| c.apply_visibility(&caps))
                        })
                    }
                    _ => false,
                }
            }
            Slot::Visibility => taf
                .conditions_mut(cursor)
                .is_some_and(|c| c.apply_visibility(&caps)),
            Slot::Condition => taf
                .conditions_mut(cursor)
                .is_some_and(|c| c.apply_condition(&caps)),
            Slot::Clouds => taf
                .conditions_mut(cursor)
                .is_some_and(|c| c.apply_clouds(&caps)),
            Slot::WindShear => match (decode_wind_shear(&caps), taf.wind_shear_mut(cursor)) {
                (Some(shear), Some(target)) => {
                    *target = Some(shear);
                    true
                }
                _ => false,
            },
            Slot::TemperatureExtreme => taf.apply_temperature_extreme(cursor, &caps),
            Slot::NoSignificantWeather => taf.conditions_mut(cursor).is_some_and(|c| {
                c.no_significant_weather = true;
                true
            }),
        };

        if !accepted {
            taf.unparsed.push(token.to_string());
        }
    }

    taf.station = station.ok_or_else(|| WeatherError::MissingStation {
        report: taf.raw.clone(),
    })?;

    if !taf.unparsed.is_empty() {
        debug!(
            station = %taf.station,
            unparsed = ?taf.unparsed,
            "TAF contains unrecognised groups"
        );
    }

    Ok(taf)
}

impl FromStr for Taf {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self> {
        parse_taf(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::WindDirection;

    #[test]
    fn test_empty_and_stationless() {
        assert!(matches!(parse_taf(""), Err(WeatherError::EmptyReport)));
        assert!(matches!(
            parse_taf("TAF 011130Z 0112/0218"),
            Err(WeatherError::MissingStation { .. })
        ));
    }

    #[test]
    fn test_header() {
        let taf = parse_taf("TAF AMD EGLL 011100Z 0112/0218 24010KT 9999 SCT030").unwrap();
        assert!(taf.amended);
        assert!(!taf.corrected);
        assert_eq!(taf.station, "EGLL");
        assert_eq!(taf.issued, ReportTime::new(Some(1), 11, 0));
        let valid = taf.valid.unwrap();
        assert_eq!(valid.from, ReportTime::new(Some(1), 12, 0).unwrap());
        assert_eq!(valid.until, ReportTime::new(Some(2), 18, 0).unwrap());
        assert_eq!(taf.periods[0].from, Some(valid.from));
        assert!(taf.unparsed.is_empty());
    }

    #[test]
    fn test_from_groups_open_periods() {
        let taf = parse_taf(
            "TAF KBOS 011130Z 0112/0218 27010KT P6SM FEW050 FM011800 30015G25KT P6SM BKN040 FM020600 VRB03KT 3SM BR OVC008",
        )
        .unwrap();
        assert_eq!(taf.periods.len(), 3);
        assert_eq!(taf.periods[1].from, ReportTime::new(Some(1), 18, 0));
        assert_eq!(
            taf.periods[2].conditions.wind.unwrap().direction,
            WindDirection::Variable
        );
        assert_eq!(taf.periods[2].conditions.weather.len(), 1);
        assert_eq!(taf.periods[0].conditions.clouds.len(), 1);
    }

    #[test]
    fn test_from_group_with_invalid_time_is_unparsed() {
        let taf = parse_taf("TAF KBOS 011130Z 0112/0218 27010KT P6SM FEW050 FM9999 BECMG 0114/0116 31015KT").unwrap();
        assert_eq!(taf.periods.len(), 1);
        assert_eq!(taf.unparsed, vec!["FM9999".to_string()]);
        let change = &taf.periods[0].changes[0];
        assert_eq!(change.kind, ChangeKind::Becoming);
        assert!(change.conditions.wind.is_some());
    }

    #[test]
    fn test_change_groups_and_probability() {
        let taf = parse_taf(
            "TAF EDDF 011100Z 0112/0218 25010KT 9999 BKN030 BECMG 0114/0116 31015KT TEMPO 0118/0122 4000 SHRA PROB40 0200/0204 0800 FG",
        )
        .unwrap();
        let changes = &taf.periods[0].changes;
        assert_eq!(changes.len(), 3);
        assert_eq!(changes[0].kind, ChangeKind::Becoming);
        assert_eq!(changes[0].from, ReportTime::new(Some(1), 14, 0));
        assert!(changes[0].conditions.wind.is_some());
        assert_eq!(changes[1].kind, ChangeKind::Temporary);
        assert_eq!(changes[1].conditions.weather.len(), 1);
        assert_eq!(changes[2].kind, ChangeKind::Probability);
        assert_eq!(changes[2].probability, Some(40));
        assert_eq!(changes[2].until, ReportTime::new(Some(2), 4, 0));
        assert!(taf.periods[0].conditions.weather.is_empty());
        assert!(taf.unparsed.is_empty());
    }

    #[test]
    fn test_probability_followed_by_tempo_merges() {
        let taf = parse_taf("TAF LFPG 011100Z 0112/0218 20005KT CAVOK PROB30 TEMPO 0115/0118 TSRA").unwrap();
        let changes = &taf.periods[0].changes;
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Temporary);
        assert_eq!(changes[0].probability, Some(30));
        assert_eq!(changes[0].from, ReportTime::new(Some(1), 15, 0));
    }

    #[test]
    fn test_legacy_change_time_only_after_keyword() {
        let taf = parse_taf("TAF KXYZ 011130Z 011212 18010KT 2000 TEMPO 1418 0800 FG").unwrap();
        assert!(taf.periods[0].conditions.visibility.is_some());
        let change = &taf.periods[0].changes[0];
        assert_eq!(change.from, ReportTime::new(None, 14, 0));
        assert_eq!(change.until, ReportTime::new(None, 18, 0));
        assert!((change.conditions.visibility.as_ref().unwrap().distance.meters() - 800.0).abs() < 1e-9);
    }

    #[test]
    fn test_wind_shear_and_temperature_extremes() {
        let taf = parse_taf("TAF KDEN 011130Z 0112/0218 32010KT P6SM SKC WS020/24045KT TX25/0121Z TNM03/0212Z").unwrap();
        let base = &taf.periods[0];
        let shear = base.wind_shear.unwrap();
        assert!((shear.height.value_in(DistanceUnit::Feet) - 2000.0).abs() < 1e-9);
        assert_eq!(shear.direction, 240);
        let max = base.max_temperature.unwrap();
        assert!((max.temperature.celsius() - 25.0).abs() < 1e-9);
        assert_eq!(max.time, ReportTime::new(Some(1), 21, 0).unwrap());
        assert!((base.min_temperature.unwrap().temperature.celsius() + 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_nil_and_no_significant_weather() {
        let taf = parse_taf("TAF EGKK 011100Z NIL").unwrap();
        assert_eq!(taf.status, Some(ForecastStatus::Missing));

        let taf = parse_taf("TAF EGKK 011100Z 0112/0212 22010KT 9999 -RA BKN010 BECMG 0115/0117 NSW").unwrap();
        assert!(taf.periods[0].changes[0].conditions.no_significant_weather);
    }
}
