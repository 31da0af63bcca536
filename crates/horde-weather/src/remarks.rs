//! Decoding of the `RMK` section of North American observations.
//!
//! Each remark group is recognised at most once, except sensor outage
//! flags. Anything else is kept verbatim as free text.

use crate::grammar::{Grammar, SlotRule};
use crate::units::{Distance, DistanceUnit, Pressure, Temperature};
use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::LazyLock;

macro_rules! remark_pattern {
    ($name:ident, $pattern:literal) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($pattern).expect("valid regex"));
    };
}

remark_pattern!(NO_SPECI, r"^NOSPECI$");
remark_pattern!(STATION_TYPE, r"^A[O0]([12])$");
remark_pattern!(PRESSURE_CHANGE, r"^PRES(RR|FR)$");
remark_pattern!(SEA_LEVEL_PRESSURE, r"^SLP(\d{3})$");
remark_pattern!(HOURLY_PRECIPITATION, r"^P(\d{4}|////)$");
remark_pattern!(PERIOD_PRECIPITATION, r"^6(\d{4}|////)$");
remark_pattern!(DAILY_PRECIPITATION, r"^7(\d{4}|////)$");
remark_pattern!(SNOW_DEPTH, r"^4/(\d{3})$");
remark_pattern!(SNOW_WATER_EQUIVALENT, r"^933(\d{3})$");
remark_pattern!(CLOUD_TYPES, r"^8/([\d/])([\d/])([\d/])$");
remark_pattern!(SUNSHINE, r"^98(\d{3})$");
remark_pattern!(HOURLY_TEMPERATURE, r"^T([01])(\d{3})(?:([01])(\d{3}))?$");
remark_pattern!(SIX_HOUR_MAXIMUM, r"^1([01])(\d{3})$");
remark_pattern!(SIX_HOUR_MINIMUM, r"^2([01])(\d{3})$");
remark_pattern!(DAILY_EXTREMES, r"^4([01])(\d{3})([01])(\d{3})$");
remark_pattern!(PRESSURE_TENDENCY, r"^5([0-8])(\d{3})$");
remark_pattern!(
    SENSOR_OUTAGE,
    r"^(RVRNO|PWINO|PNO|FZRANO|TSNO|SLPNO|VISNO|CHINO)$"
);
remark_pattern!(MAINTENANCE, r"^\$$");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    NoSpeci,
    StationType,
    PressureChange,
    SeaLevelPressure,
    HourlyPrecipitation,
    PeriodPrecipitation,
    DailyPrecipitation,
    SnowDepth,
    SnowWaterEquivalent,
    CloudTypes,
    Sunshine,
    HourlyTemperature,
    SixHourMaximum,
    SixHourMinimum,
    DailyExtremes,
    PressureTendency,
    SensorOutage,
    Maintenance,
}

fn remarks_grammar() -> Grammar<Slot> {
    Grammar::new(vec![
        SlotRule::once(Slot::NoSpeci, &NO_SPECI),
        SlotRule::once(Slot::StationType, &STATION_TYPE),
        SlotRule::once(Slot::PressureChange, &PRESSURE_CHANGE),
        SlotRule::repeated(Slot::SensorOutage, &SENSOR_OUTAGE),
        SlotRule::once(Slot::SeaLevelPressure, &SEA_LEVEL_PRESSURE),
        SlotRule::once(Slot::HourlyPrecipitation, &HOURLY_PRECIPITATION),
        SlotRule::once(Slot::PeriodPrecipitation, &PERIOD_PRECIPITATION),
        SlotRule::once(Slot::DailyPrecipitation, &DAILY_PRECIPITATION),
        SlotRule::once(Slot::SnowDepth, &SNOW_DEPTH),
        SlotRule::once(Slot::SnowWaterEquivalent, &SNOW_WATER_EQUIVALENT),
        SlotRule::once(Slot::CloudTypes, &CLOUD_TYPES),
        SlotRule::once(Slot::Sunshine, &SUNSHINE),
        SlotRule::once(Slot::HourlyTemperature, &HOURLY_TEMPERATURE),
        SlotRule::once(Slot::SixHourMaximum, &SIX_HOUR_MAXIMUM),
        SlotRule::once(Slot::SixHourMinimum, &SIX_HOUR_MINIMUM),
        SlotRule::once(Slot::DailyExtremes, &DAILY_EXTREMES),
        SlotRule::once(Slot::PressureTendency, &PRESSURE_TENDENCY),
        SlotRule::once(Slot::Maintenance, &MAINTENANCE),
    ])
}

/// Automated station capability (`AO1`/`AO2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StationType {
    /// `AO1`: no precipitation discriminator
    Automated,
    /// `AO2`: with precipitation discriminator
    AutomatedWithPrecipitation,
}

/// Rapid pressure change (`PRESRR`/`PRESFR`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PressureChange {
    /// Rising rapidly
    RisingRapidly,
    /// Falling rapidly
    FallingRapidly,
}

/// A precipitation amount that may be indeterminate (`////`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Precipitation {
    /// Measured amount
    Amount(Distance),
    /// Fell but could not be measured
    Indeterminate,
}

impl Precipitation {
    fn from_hundredths(group: &str) -> Option<Self> {
        if group == "////" {
            return Some(Self::Indeterminate);
        }
        let hundredths: u16 = group.parse().ok()?;
        Some(Self::Amount(Distance::new(
            f64::from(hundredths) / 100.0,
            DistanceUnit::Inches,
        )))
    }
}

/// Low, middle and high cloud type codes (`8/CLCMCH`), `None` where
/// obscured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CloudTypes {
    /// Low cloud code
    pub low: Option<u8>,
    /// Middle cloud code
    pub middle: Option<u8>,
    /// High cloud code
    pub high: Option<u8>,
}

/// Direction of the three-hour pressure tendency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TendencyDirection {
    /// Characteristic 0-3
    Rising,
    /// Characteristic 4
    Steady,
    /// Characteristic 5-8
    Falling,
}

/// Three-hour pressure tendency (`5appp`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PressureTendency {
    /// WMO characteristic code
    pub characteristic: u8,
    /// Direction derived from the characteristic
    pub direction: TendencyDirection,
    /// Amount of change
    pub change: Pressure,
}

/// Decoded remarks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Remarks {
    /// `NOSPECI`
    pub no_speci: bool,
    /// `AO1`/`AO2`
    pub station_type: Option<StationType>,
    /// `PRESRR`/`PRESFR`
    pub pressure_change: Option<PressureChange>,
    /// `SLPppp`
    pub sea_level_pressure: Option<Pressure>,
    /// `Prrrr`: precipitation in the last hour
    pub hourly_precipitation: Option<Precipitation>,
    /// `6RRRR`: precipitation in the last 3 or 6 hours
    pub period_precipitation: Option<Precipitation>,
    /// `7RRRR`: precipitation in the last 24 hours
    pub daily_precipitation: Option<Precipitation>,
    /// `4/sss`
    pub snow_depth: Option<Distance>,
    /// `933RRR`
    pub snow_water_equivalent: Option<Distance>,
    /// `8/CLCMCH`
    pub cloud_types: Option<CloudTypes>,
    /// `98mmm`
    pub sunshine_minutes: Option<u16>,
    /// Hourly temperature in tenths
    pub temperature: Option<Temperature>,
    /// Hourly dew point in tenths
    pub dew_point: Option<Temperature>,
    /// `1sTTT`
    pub six_hour_maximum: Option<Temperature>,
    /// `2sTTT`
    pub six_hour_minimum: Option<Temperature>,
    /// Maximum of `4sTTTsTTT`
    pub daily_maximum: Option<Temperature>,
    /// Minimum of `4sTTTsTTT`
    pub daily_minimum: Option<Temperature>,
    /// `5appp`
    pub pressure_tendency: Option<PressureTendency>,
    /// Sensor outage flags such as `PWINO`
    pub sensor_outages: Vec<String>,
    /// `$`: station needs maintenance
    pub maintenance_needed: bool,
    /// Free text remarks
    pub other: Vec<String>,
}

impl Remarks {
    /// Returns `true` if the report had no remarks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply(&mut self, slot: Slot, caps: &Captures<'_>) -> Option<()> {
        match slot {
            Slot::NoSpeci => self.no_speci = true,
            Slot::StationType => {
                self.station_type = Some(if &caps[1] == "1" {
                    StationType::Automated
                } else {
                    StationType::AutomatedWithPrecipitation
                });
            }
            Slot::PressureChange => {
                self.pressure_change = Some(if &caps[1] == "RR" {
                    PressureChange::RisingRapidly
                } else {
                    PressureChange::FallingRapidly
                });
            }
            Slot::SeaLevelPressure => {
                let tenths = f64::from(caps[1].parse::<u16>().ok()?) / 10.0;
                let base = if tenths < 50.0 { 1000.0 } else { 900.0 };
                self.sea_level_pressure = Some(Pressure::from_hectopascal(base + tenths));
            }
            Slot::HourlyPrecipitation => {
                self.hourly_precipitation = Some(Precipitation::from_hundredths(&caps[1])?);
            }
            Slot::PeriodPrecipitation => {
                self.period_precipitation = Some(Precipitation::from_hundredths(&caps[1])?);
            }
            Slot::DailyPrecipitation => {
                self.daily_precipitation = Some(Precipitation::from_hundredths(&caps[1])?);
            }
            Slot::SnowDepth => {
                let inches = f64::from(caps[1].parse::<u16>().ok()?);
                self.snow_depth = Some(Distance::new(inches, DistanceUnit::Inches));
            }
            Slot::SnowWaterEquivalent => {
                let tenths = f64::from(caps[1].parse::<u16>().ok()?);
                self.snow_water_equivalent =
                    Some(Distance::new(tenths / 10.0, DistanceUnit::Inches));
            }
            Slot::CloudTypes => {
                let code = |i: usize| caps[i].parse::<u8>().ok();
                self.cloud_types = Some(CloudTypes {
                    low: code(1),
                    middle: code(2),
                    high: code(3),
                });
            }
            Slot::Sunshine => self.sunshine_minutes = Some(caps[1].parse().ok()?),
            Slot::HourlyTemperature => {
                self.temperature = Some(tenths_celsius(&caps[1], &caps[2])?);
                if let (Some(sign), Some(value)) = (caps.get(3), caps.get(4)) {
                    self.dew_point = tenths_celsius(sign.as_str(), value.as_str());
                }
            }
            Slot::SixHourMaximum => {
                self.six_hour_maximum = Some(tenths_celsius(&caps[1], &caps[2])?);
            }
            Slot::SixHourMinimum => {
                self.six_hour_minimum = Some(tenths_celsius(&caps[1], &caps[2])?);
            }
            Slot::DailyExtremes => {
                self.daily_maximum = Some(tenths_celsius(&caps[1], &caps[2])?);
                self.daily_minimum = Some(tenths_celsius(&caps[3], &caps[4])?);
            }
            Slot::PressureTendency => {
                let characteristic: u8 = caps[1].parse().ok()?;
                let direction = match characteristic {
                    0..=3 => TendencyDirection::Rising,
                    4 => TendencyDirection::Steady,
                    _ => TendencyDirection::Falling,
                };
                let tenths = f64::from(caps[2].parse::<u16>().ok()?);
                self.pressure_tendency = Some(PressureTendency {
                    characteristic,
                    direction,
                    change: Pressure::from_hectopascal(tenths / 10.0),
                });
            }
            Slot::SensorOutage => self.sensor_outages.push(caps[1].to_string()),
            Slot::Maintenance => self.maintenance_needed = true,
        }
        Some(())
    }
}

fn tenths_celsius(sign: &str, tenths: &str) -> Option<Temperature> {
    let value = f64::from(tenths.parse::<u16>().ok()?) / 10.0;
    Some(Temperature::from_celsius(if sign == "1" { -value } else { value }))
}

/// Decodes the groups following `RMK`.
pub(crate) fn parse_remarks(tokens: &[String]) -> Remarks {
    let mut remarks = Remarks::default();
    let mut grammar = remarks_grammar();
    for token in tokens {
        let applied = grammar
            .match_token(token)
            .and_then(|(slot, caps)| remarks.apply(slot, &caps));
        if applied.is_none() {
            remarks.other.push(token.clone());
        }
    }
    remarks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remarks(text: &str) -> Remarks {
        let tokens: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        parse_remarks(&tokens)
    }

    #[test]
    fn test_sea_level_pressure_century() {
        let r = remarks("SLP982");
        assert!((r.sea_level_pressure.unwrap().hectopascal() - 998.2).abs() < 1e-9);
        let r = remarks("SLP132");
        assert!((r.sea_level_pressure.unwrap().hectopascal() - 1013.2).abs() < 1e-9);
    }

    #[test]
    fn test_station_type_and_flags() {
        let r = remarks("AO2 PRESFR NOSPECI $");
        assert_eq!(r.station_type, Some(StationType::AutomatedWithPrecipitation));
        assert_eq!(r.pressure_change, Some(PressureChange::FallingRapidly));
        assert!(r.no_speci);
        assert!(r.maintenance_needed);
        assert!(r.other.is_empty());
    }

    #[test]
    fn test_hourly_temperature_tenths() {
        let r = remarks("T00561017");
        assert!((r.temperature.unwrap().celsius() - 5.6).abs() < 1e-9);
        assert!((r.dew_point.unwrap().celsius() + 1.7).abs() < 1e-9);
    }

    #[test]
    fn test_extremes() {
        let r = remarks("10142 20012 401001015");
        assert!((r.six_hour_maximum.unwrap().celsius() - 14.2).abs() < 1e-9);
        assert!((r.six_hour_minimum.unwrap().celsius() - 1.2).abs() < 1e-9);
        assert!((r.daily_maximum.unwrap().celsius() - 10.0).abs() < 1e-9);
        assert!((r.daily_minimum.unwrap().celsius() + 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_precipitation_groups() {
        let r = remarks("P0012 60217 7////");
        let Some(Precipitation::Amount(hourly)) = r.hourly_precipitation else {
            panic!("hourly precipitation missing");
        };
        assert!((hourly.value_in(DistanceUnit::Inches) - 0.12).abs() < 1e-9);
        assert!(matches!(r.period_precipitation, Some(Precipitation::Amount(_))));
        assert_eq!(r.daily_precipitation, Some(Precipitation::Indeterminate));
    }

    #[test]
    fn test_snow_and_sunshine() {
        let r = remarks("4/021 933036 98096");
        assert!((r.snow_depth.unwrap().value_in(DistanceUnit::Inches) - 21.0).abs() < 1e-9);
        assert!((r.snow_water_equivalent.unwrap().value_in(DistanceUnit::Inches) - 3.6).abs() < 1e-9);
        assert_eq!(r.sunshine_minutes, Some(96));
    }

    #[test]
    fn test_pressure_tendency() {
        let r = remarks("52032");
        let tendency = r.pressure_tendency.unwrap();
        assert_eq!(tendency.direction, TendencyDirection::Rising);
        assert!((tendency.change.hectopascal() - 3.2).abs() < 1e-9);
        assert_eq!(remarks("57010").pressure_tendency.unwrap().direction, TendencyDirection::Falling);
    }

    #[test]
    fn test_cloud_types_with_obscured_levels() {
        let r = remarks("8/6//");
        assert_eq!(r.cloud_types, Some(CloudTypes { low: Some(6), middle: None, high: None }));
    }

    #[test]
    fn test_sensor_outages_repeat_and_free_text_kept() {
        let r = remarks("PWINO TSNO FRQ LTGIC");
        assert_eq!(r.sensor_outages, vec!["PWINO", "TSNO"]);
        assert_eq!(r.other, vec!["FRQ", "LTGIC"]);
    }

    #[test]
    fn test_groups_consumed_once() {
        let r = remarks("SLP132 SLP140");
        assert_eq!(r.other, vec!["SLP140"]);
        assert!(!r.is_empty());
        assert!(remarks("").is_empty());
    }
}
