//! Human readable views of decoded reports in a chosen unit system.

use crate::conditions::{CloudLayer, Conditions, Visibility, Wind, WindDirection};
use crate::metar::{Metar, TrendKind};
use crate::taf::{ChangeKind, ForecastChange, Taf};
use crate::time::ReportTime;
use crate::units::{Temperature, UnitSystem, compass_direction, felt_temperature, relative_humidity};
use serde::Serialize;
use std::fmt;

/// A value with its unit symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    /// Numeric value
    pub value: f64,
    /// Unit symbol
    pub unit: &'static str,
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} {}", self.value, self.unit)
    }
}

/// Wind, visibility, weather and clouds rendered as text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConditionsSummary {
    /// Wind description
    pub wind: Option<String>,
    /// Visibility description
    pub visibility: Option<String>,
    /// Present weather descriptions
    pub weather: Vec<String>,
    /// Cloud layer descriptions
    pub clouds: Vec<String>,
}

impl ConditionsSummary {
    /// Renders `conditions` in `units`.
    #[must_use]
    pub fn new(conditions: &Conditions, units: UnitSystem) -> Self {
        let mut weather: Vec<String> = conditions.weather.iter().map(|w| w.description()).collect();
        if conditions.no_significant_weather {
            weather.push("no significant weather".to_string());
        }
        let mut clouds: Vec<String> = conditions
            .clouds
            .iter()
            .map(|layer| describe_clouds(layer, units))
            .collect();
        if conditions.cavok {
            clouds.push("ceiling and visibility OK".to_string());
        }
        Self {
            wind: conditions.wind.as_ref().map(|w| describe_wind(w, units)),
            visibility: conditions
                .visibility
                .as_ref()
                .map(|v| describe_visibility(v, units)),
            weather,
            clouds,
        }
    }

    /// Returns `true` if nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wind.is_none()
            && self.visibility.is_none()
            && self.weather.is_empty()
            && self.clouds.is_empty()
    }
}

fn describe_wind(wind: &Wind, units: UnitSystem) -> String {
    let speed_unit = units.speed();
    let speed = Reading {
        value: wind.speed.value_in(speed_unit),
        unit: speed_unit.symbol(),
    };
    let mut text = match wind.direction {
        WindDirection::Calm => return "calm".to_string(),
        WindDirection::Variable => format!("variable at {speed}"),
        WindDirection::Degrees(degrees) => {
            format!("from {} ({degrees}°) at {speed}", compass_direction(degrees))
        }
    };
    if let Some(gust) = wind.gust {
        text.push_str(&format!(
            ", gusting to {}",
            Reading {
                value: gust.value_in(speed_unit),
                unit: speed_unit.symbol(),
            }
        ));
    }
    if let Some((from, to)) = wind.variation {
        text.push_str(&format!(", varying {from}° to {to}°"));
    }
    text
}

fn describe_visibility(visibility: &Visibility, units: UnitSystem) -> String {
    let unit = units.distance();
    let reading = Reading {
        value: visibility.distance.value_in(unit),
        unit: unit.symbol(),
    };
    let mut text = format!("{}{reading}", visibility.bound.prefix());
    if let Some(direction) = &visibility.direction {
        text.push_str(&format!(" to the {direction}"));
    }
    text
}

fn describe_clouds(layer: &CloudLayer, units: UnitSystem) -> String {
    let mut text = layer.coverage.description().to_string();
    if let Some(base) = layer.base {
        let unit = units.height();
        text.push_str(&format!(" at {:.0} {}", base.value_in(unit), unit.symbol()));
    }
    if let Some(kind) = layer.kind {
        text.push_str(&format!(" ({kind:?})").to_lowercase());
    }
    text
}

fn reading(value: f64, unit: &'static str) -> Reading {
    Reading { value, unit }
}

/// A titled block of conditions, used for trends and forecast changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionSummary {
    /// Heading such as `temporarily from 011500Z until 011800Z`
    pub heading: String,
    /// Conditions of the section
    pub conditions: ConditionsSummary,
}

/// Observation rendered in a unit system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationSummary {
    /// Station identifier
    pub station: String,
    /// Observation time
    pub observed: Option<String>,
    /// Air temperature
    pub temperature: Option<Reading>,
    /// Dew point
    pub dew_point: Option<Reading>,
    /// Relative humidity in percent
    pub humidity: Option<f64>,
    /// Wind chill or heat index when it differs from the air temperature
    pub felt_temperature: Option<Reading>,
    /// Pressure
    pub pressure: Option<Reading>,
    /// Observed conditions
    pub conditions: ConditionsSummary,
    /// Trend forecasts
    pub trends: Vec<SectionSummary>,
    /// Free text remarks
    pub remarks: Vec<String>,
}

impl ObservationSummary {
    /// Renders `metar` in `units`.
    ///
    /// # Examples
    ///
    /// ```
    /// use horde_weather::{parse_metar, ObservationSummary, UnitSystem};
    ///
    /// let metar = parse_metar("KBOS 011154Z 00000KT 10SM CLR 20/10 A2992").unwrap();
    /// let summary = ObservationSummary::from_metar(&metar, UnitSystem::Standard);
    ///
    /// assert_eq!(summary.temperature.unwrap().unit, "°F");
    /// assert_eq!(summary.conditions.wind.as_deref(), Some("calm"));
    /// ```
    #[must_use]
    pub fn from_metar(metar: &Metar, units: UnitSystem) -> Self {
        let temperature_unit = units.temperature();
        let temp = |t: Temperature| {
            reading(t.value_in(temperature_unit), temperature_unit.symbol())
        };
        let felt = metar.temperature.and_then(|t| {
            let felt = felt_temperature(t, metar.dew_point, metar.conditions.wind.map(|w| w.speed));
            ((felt.celsius() - t.celsius()).abs() >= 0.05).then(|| temp(felt))
        });
        let pressure_unit = units.pressure();
        let trends = metar
            .trends
            .iter()
            .map(|trend| {
                let mut heading = match trend.kind {
                    TrendKind::Becoming => "becoming".to_string(),
                    TrendKind::Temporary => "temporarily".to_string(),
                };
                push_time(&mut heading, "from", trend.from);
                push_time(&mut heading, "until", trend.until);
                push_time(&mut heading, "at", trend.at);
                SectionSummary {
                    heading,
                    conditions: ConditionsSummary::new(&trend.conditions, units),
                }
            })
            .collect();
        Self {
            station: metar.station.clone(),
            observed: metar.time.map(|t| t.to_string()),
            temperature: metar.temperature.map(temp),
            dew_point: metar.dew_point.map(temp),
            humidity: metar
                .temperature
                .zip(metar.dew_point)
                .map(|(t, d)| relative_humidity(t, d)),
            felt_temperature: felt,
            pressure: metar
                .pressure
                .map(|p| reading(p.value_in(pressure_unit), pressure_unit.symbol())),
            conditions: ConditionsSummary::new(&metar.conditions, units),
            trends,
            remarks: metar.remarks.other.clone(),
        }
    }
}

fn push_time(heading: &mut String, label: &str, time: Option<ReportTime>) {
    if let Some(time) = time {
        heading.push_str(&format!(" {label} {time}"));
    }
}

/// Forecast rendered in a unit system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSummary {
    /// Station identifier
    pub station: String,
    /// Issue time
    pub issued: Option<String>,
    /// Validity window
    pub valid: Option<String>,
    /// `NIL`/`CNL` status
    pub status: Option<String>,
    /// Periods, each followed by its change groups
    pub periods: Vec<PeriodSummary>,
}

/// One forecast period with its changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    /// Period heading
    pub section: SectionSummary,
    /// Forecast maximum temperature
    pub max_temperature: Option<Reading>,
    /// Forecast minimum temperature
    pub min_temperature: Option<Reading>,
    /// Change groups
    pub changes: Vec<SectionSummary>,
}

impl ForecastSummary {
    /// Renders `taf` in `units`.
    #[must_use]
    pub fn from_taf(taf: &Taf, units: UnitSystem) -> Self {
        let temperature_unit = units.temperature();
        let periods = taf
            .periods
            .iter()
            .enumerate()
            .map(|(index, period)| {
                let mut heading = if index == 0 {
                    "base forecast".to_string()
                } else {
                    "from".to_string()
                };
                if let Some(from) = period.from {
                    heading.push_str(&format!(" {from}"));
                }
                PeriodSummary {
                    section: SectionSummary {
                        heading,
                        conditions: ConditionsSummary::new(&period.conditions, units),
                    },
                    max_temperature: period.max_temperature.map(|f| {
                        reading(f.temperature.value_in(temperature_unit), temperature_unit.symbol())
                    }),
                    min_temperature: period.min_temperature.map(|f| {
                        reading(f.temperature.value_in(temperature_unit), temperature_unit.symbol())
                    }),
                    changes: period
                        .changes
                        .iter()
                        .map(|change| change_section(change, units))
                        .collect(),
                }
            })
            .collect();
        Self {
            station: taf.station.clone(),
            issued: taf.issued.map(|t| t.to_string()),
            valid: taf.valid.map(|v| format!("{} to {}", v.from, v.until)),
            status: taf.status.map(|s| format!("{s:?}").to_lowercase()),
            periods,
        }
    }
}

fn change_section(change: &ForecastChange, units: UnitSystem) -> SectionSummary {
    let mut heading = match change.kind {
        ChangeKind::Becoming => "becoming".to_string(),
        ChangeKind::Temporary => "temporarily".to_string(),
        ChangeKind::Probability => "possibly".to_string(),
    };
    if let Some(probability) = change.probability {
        heading.push_str(&format!(" ({probability}%)"));
    }
    push_time(&mut heading, "from", change.from);
    push_time(&mut heading, "until", change.until);
    SectionSummary {
        heading,
        conditions: ConditionsSummary::new(&change.conditions, units),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metar::parse_metar;
    use crate::taf::parse_taf;

    #[test]
    fn test_metric_summary() {
        let metar = parse_metar("EDDF 011150Z 27020G35KT 240V300 9999 -RA BKN012CB 05/03 Q1003 TEMPO 4000 SHRA").unwrap();
        let summary = ObservationSummary::from_metar(&metar, UnitSystem::Metric);
        assert_eq!(summary.temperature.unwrap().unit, "°C");
        let wind = summary.conditions.wind.unwrap();
        assert!(wind.starts_with("from W (270°) at 37.0 km/h"));
        assert!(wind.contains("gusting to 64.8 km/h"));
        assert!(wind.ends_with("varying 240° to 300°"));
        assert_eq!(summary.conditions.visibility.as_deref(), Some("at least 10.0 km"));
        assert_eq!(summary.conditions.clouds, vec!["broken at 366 m (cumulonimbus)"]);
        assert!(summary.humidity.unwrap() > 80.0);
        assert!(summary.felt_temperature.is_some());
        assert_eq!(summary.trends.len(), 1);
        assert_eq!(summary.trends[0].heading, "temporarily");
    }

    #[test]
    fn test_standard_summary_pressure() {
        let metar = parse_metar("KBOS 011154Z 27010KT 10SM FEW050 22/12 A3012").unwrap();
        let summary = ObservationSummary::from_metar(&metar, UnitSystem::Standard);
        let pressure = summary.pressure.unwrap();
        assert_eq!(pressure.unit, "inHg");
        assert_eq!(pressure.to_string(), "30.1 inHg");
        assert!(summary.felt_temperature.is_none());
    }

    #[test]
    fn test_cavok_summary() {
        let metar = parse_metar("LFPG 011200Z 18004KT CAVOK 25/10 Q1018").unwrap();
        let summary = ObservationSummary::from_metar(&metar, UnitSystem::Metric);
        assert_eq!(summary.conditions.clouds, vec!["ceiling and visibility OK"]);
        assert_eq!(summary.conditions.visibility.as_deref(), Some("more than 10.0 km"));
    }

    #[test]
    fn test_forecast_summary() {
        let taf = parse_taf("TAF EGLL 011100Z 0112/0218 24010KT 9999 SCT030 TX18/0115Z PROB30 0118/0121 3000 TSRA FM020600 VRB03KT 2000 BR").unwrap();
        let summary = ForecastSummary::from_taf(&taf, UnitSystem::Metric);
        assert_eq!(summary.valid.as_deref(), Some("011200Z to 021800Z"));
        assert_eq!(summary.periods.len(), 2);
        assert_eq!(summary.periods[0].section.heading, "base forecast 011200Z");
        assert_eq!(summary.periods[0].changes[0].heading, "possibly (30%) from 011800Z until 012100Z");
        assert_eq!(summary.periods[1].section.heading, "from 020600Z");
        assert!(summary.periods[0].max_temperature.is_some());
    }
}
