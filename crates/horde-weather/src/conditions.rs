//! Weather body shared by observations, trends and forecast periods.
//!
//! Wind, visibility, runway range, present weather and cloud groups are
//! decoded here from the captures of the slot patterns, so the METAR and TAF
//! decoders only decide which record a group lands in.

use crate::time::ReportTime;
use crate::units::{Distance, DistanceUnit, Speed, SpeedUnit};
use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::LazyLock;

pub(crate) static WIND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{3}|VRB|VAR)(\d{2,3})(?:G(\d{2,3}))?(KT|KTS|MPS|KMH|KPH|MPH|FPS)$")
        .expect("valid regex")
});
pub(crate) static WIND_VARIATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{3})V(\d{3})$").expect("valid regex"));
pub(crate) static VISIBILITY_FRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d$").expect("valid regex"));
pub(crate) static VISIBILITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(\d{4})(N|NE|E|SE|S|SW|W|NW)?(NDV)?|([MP])?(?:(\d{1,2}) )?(?:(\d{1,2})/)?(\d{1,2})(SM|KM)|(CAVOK))$",
    )
    .expect("valid regex")
});
pub(crate) static RUNWAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^R(\d{2}[LCR]?)/([PM])?(\d{4})(?:V([PM])?(\d{4}))?(FT)?(?:/?([UDN]))?$")
        .expect("valid regex")
});
pub(crate) static CONDITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(-|\+|VC|RE)?(MI|BC|PR|DR|BL|SH|TS|FZ)?((?:DZ|RA|SN|SG|IC|PL|PE|GR|GS|UP)*)(BR|FG|FU|VA|DU|SA|HZ|PY)?(PO|SQ|FC|SS|DS)?$",
    )
    .expect("valid regex")
});
pub(crate) static CLOUDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(SKC|CLR|NSC|NCD)|(FEW|SCT|BKN|OVC|VV)(\d{3}|///)(CB|TCU|///)?)$")
        .expect("valid regex")
});
pub(crate) static NO_SIGNIFICANT_WEATHER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^NSW$").expect("valid regex"));
pub(crate) static TIME_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d{2})(\d{2})/(\d{2})(\d{2})|(\d{2})(\d{2})(\d{2}))$").expect("valid regex")
});

/// How a reported value relates to the true value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Bound {
    /// The value as reported
    #[default]
    Exact,
    /// Below the reported value (`M` prefix, `0000`)
    LessThan,
    /// Above the reported value (`P` prefix, `CAVOK`)
    MoreThan,
    /// The reported value or more (`9999`)
    AtLeast,
}

impl Bound {
    fn from_prefix(prefix: Option<&str>) -> Self {
        match prefix {
            Some("M") => Self::LessThan,
            Some("P") => Self::MoreThan,
            _ => Self::Exact,
        }
    }

    /// Prefix used when displaying a bounded value.
    #[must_use]
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::Exact => "",
            Self::LessThan => "less than ",
            Self::MoreThan => "more than ",
            Self::AtLeast => "at least ",
        }
    }
}

/// Wind direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WindDirection {
    /// No wind (`00000KT`)
    Calm,
    /// Direction varies (`VRB`)
    Variable,
    /// True bearing in degrees
    Degrees(u16),
}

/// Surface wind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Wind {
    /// Direction the wind blows from
    pub direction: WindDirection,
    /// Mean speed
    pub speed: Speed,
    /// Gust speed
    pub gust: Option<Speed>,
    /// Variation sector as reported by a `dddVddd` group
    pub variation: Option<(u16, u16)>,
}

impl Wind {
    fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let unit = SpeedUnit::from_report_code(&caps[4])?;
        let speed: u16 = caps[2].parse().ok()?;
        let direction = match &caps[1] {
            "VRB" | "VAR" => WindDirection::Variable,
            degrees => {
                let degrees: u16 = degrees.parse().ok()?;
                if degrees > 360 {
                    return None;
                }
                if degrees == 0 && speed == 0 {
                    WindDirection::Calm
                } else {
                    WindDirection::Degrees(degrees)
                }
            }
        };
        let gust = match caps.get(3) {
            Some(g) => Some(Speed::new(f64::from(g.as_str().parse::<u16>().ok()?), unit)),
            None => None,
        };
        Some(Self {
            direction,
            speed: Speed::new(f64::from(speed), unit),
            gust,
            variation: None,
        })
    }

    /// Returns `true` for a calm report.
    #[must_use]
    pub const fn is_calm(&self) -> bool {
        matches!(self.direction, WindDirection::Calm)
    }
}

/// Prevailing or minimum visibility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Visibility {
    /// Distance
    pub distance: Distance,
    /// Qualifier of the distance
    pub bound: Bound,
    /// Compass direction of a directional minimum
    pub direction: Option<String>,
    /// `NDV`: the station cannot report directional variation
    pub no_directional_variation: bool,
}

impl Visibility {
    fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        if let Some(meters) = caps.get(1) {
            let (distance, bound) = match meters.as_str() {
                "9999" => (10_000.0, Bound::AtLeast),
                "0000" => (50.0, Bound::LessThan),
                m => (f64::from(m.parse::<u16>().ok()?), Bound::Exact),
            };
            return Some(Self {
                distance: Distance::from_meters(distance),
                bound,
                direction: caps.get(2).map(|d| d.as_str().to_string()),
                no_directional_variation: caps.get(3).is_some(),
            });
        }
        if caps.get(9).is_some() {
            return Some(Self {
                distance: Distance::new(10.0, DistanceUnit::Kilometers),
                bound: Bound::MoreThan,
                direction: None,
                no_directional_variation: false,
            });
        }

        let whole = match caps.get(5) {
            Some(w) => f64::from(w.as_str().parse::<u8>().ok()?),
            None => 0.0,
        };
        let last = f64::from(caps.get(7)?.as_str().parse::<u8>().ok()?);
        let value = match caps.get(6) {
            Some(numerator) => {
                if last == 0.0 {
                    return None;
                }
                whole + f64::from(numerator.as_str().parse::<u8>().ok()?) / last
            }
            None => whole + last,
        };
        let unit = match caps.get(8).map(|u| u.as_str()) {
            Some("KM") => DistanceUnit::Kilometers,
            _ => DistanceUnit::StatuteMiles,
        };
        Some(Self {
            distance: Distance::new(value, unit),
            bound: Bound::from_prefix(caps.get(4).map(|p| p.as_str())),
            direction: None,
            no_directional_variation: false,
        })
    }
}

/// Runway visual range tendency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RangeTendency {
    /// `U`
    Increasing,
    /// `D`
    Decreasing,
    /// `N`
    NoChange,
}

/// Runway visual range (`R24L/1200V1800FT/U`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunwayVisualRange {
    /// Runway designator
    pub runway: String,
    /// Reported or minimum range
    pub range: Distance,
    /// Qualifier of `range`
    pub bound: Bound,
    /// Maximum of a variable range
    pub variable_max: Option<(Distance, Bound)>,
    /// Tendency
    pub tendency: Option<RangeTendency>,
}

impl RunwayVisualRange {
    pub(crate) fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let unit = if caps.get(6).is_some() {
            DistanceUnit::Feet
        } else {
            DistanceUnit::Meters
        };
        let distance = |s: &str| s.parse::<u16>().ok().map(|v| Distance::new(f64::from(v), unit));
        let variable_max = match caps.get(5) {
            Some(max) => Some((
                distance(max.as_str())?,
                Bound::from_prefix(caps.get(4).map(|p| p.as_str())),
            )),
            None => None,
        };
        let tendency = caps.get(7).and_then(|t| match t.as_str() {
            "U" => Some(RangeTendency::Increasing),
            "D" => Some(RangeTendency::Decreasing),
            "N" => Some(RangeTendency::NoChange),
            _ => None,
        });
        Some(Self {
            runway: caps[1].to_string(),
            range: distance(&caps[3])?,
            bound: Bound::from_prefix(caps.get(2).map(|p| p.as_str())),
            variable_max,
            tendency,
        })
    }
}

/// Intensity of a present weather group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Intensity {
    /// `-`
    Light,
    /// No prefix
    #[default]
    Moderate,
    /// `+`
    Heavy,
}

/// A present weather group such as `-SHRA` or `VCTS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherPhenomenon {
    /// Intensity
    pub intensity: Intensity,
    /// `VC`: observed in the vicinity rather than at the station
    pub vicinity: bool,
    /// `RE`: recent weather
    pub recent: bool,
    /// Descriptor code (`SH`, `TS`, `FZ`, ...)
    pub descriptor: Option<String>,
    /// Precipitation codes in report order
    pub precipitation: Vec<String>,
    /// Obscuration code (`BR`, `FG`, ...)
    pub obscuration: Option<String>,
    /// Other phenomenon code (`SQ`, `FC`, ...)
    pub other: Option<String>,
}

impl WeatherPhenomenon {
    fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let code = |i: usize| caps.get(i).map(|m| m.as_str().to_string());
        let precipitation: Vec<String> = caps
            .get(3)
            .map(|m| m.as_str())
            .unwrap_or_default()
            .as_bytes()
            .chunks(2)
            .filter_map(|pair| std::str::from_utf8(pair).ok().map(str::to_string))
            .collect();
        let phenomenon = Self {
            intensity: match caps.get(1).map(|m| m.as_str()) {
                Some("-") => Intensity::Light,
                Some("+") => Intensity::Heavy,
                _ => Intensity::Moderate,
            },
            vicinity: caps.get(1).is_some_and(|m| m.as_str() == "VC"),
            recent: caps.get(1).is_some_and(|m| m.as_str() == "RE"),
            descriptor: code(2),
            precipitation,
            obscuration: code(4),
            other: code(5),
        };
        let empty = phenomenon.descriptor.is_none()
            && phenomenon.precipitation.is_empty()
            && phenomenon.obscuration.is_none()
            && phenomenon.other.is_none();
        (!empty).then_some(phenomenon)
    }

    /// English description, e.g. `light showers of rain`.
    ///
    /// # Examples
    ///
    /// ```
    /// use horde_weather::parse_metar;
    ///
    /// let metar = parse_metar("KBOS 011154Z 27010KT 10SM +TSRA BR OVC010 20/18 A2992").unwrap();
    /// let described: Vec<String> = metar.conditions.weather.iter().map(|w| w.description()).collect();
    /// assert_eq!(described, vec!["heavy thunderstorm with rain", "mist"]);
    /// ```
    #[must_use]
    pub fn description(&self) -> String {
        let mut words: Vec<&str> = Vec::new();
        if self.recent {
            words.push("recent");
        }
        match self.intensity {
            Intensity::Light => words.push("light"),
            Intensity::Heavy => words.push("heavy"),
            Intensity::Moderate => {}
        }
        if let Some(descriptor) = &self.descriptor {
            words.push(phenomenon_name(descriptor));
            if !self.precipitation.is_empty() {
                words.push(if descriptor == "TS" { "with" } else { "of" });
            }
        }
        let precipitation: Vec<&str> = self
            .precipitation
            .iter()
            .map(|code| phenomenon_name(code))
            .collect();
        let precipitation = precipitation.join(" and ");
        if !precipitation.is_empty() {
            words.push(&precipitation);
        }
        for code in [&self.obscuration, &self.other].into_iter().flatten() {
            words.push(phenomenon_name(code));
        }
        if self.vicinity {
            words.push("in the vicinity");
        }
        words.join(" ")
    }
}

/// English name of a present weather code.
#[must_use]
pub fn phenomenon_name(code: &str) -> &'static str {
    match code {
        "MI" => "shallow",
        "BC" => "patches of",
        "PR" => "partial",
        "DR" => "low drifting",
        "BL" => "blowing",
        "SH" => "showers",
        "TS" => "thunderstorm",
        "FZ" => "freezing",
        "DZ" => "drizzle",
        "RA" => "rain",
        "SN" => "snow",
        "SG" => "snow grains",
        "IC" => "ice crystals",
        "PL" | "PE" => "ice pellets",
        "GR" => "hail",
        "GS" => "small hail",
        "UP" => "unknown precipitation",
        "BR" => "mist",
        "FG" => "fog",
        "FU" => "smoke",
        "VA" => "volcanic ash",
        "DU" => "widespread dust",
        "SA" => "sand",
        "HZ" => "haze",
        "PY" => "spray",
        "PO" => "dust whirls",
        "SQ" => "squalls",
        "FC" => "funnel cloud",
        "SS" => "sandstorm",
        "DS" => "duststorm",
        _ => "unknown phenomenon",
    }
}

/// Cloud amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CloudCoverage {
    /// `SKC`/`CLR`
    Clear,
    /// `NSC`
    NoSignificantClouds,
    /// `NCD`
    NoCloudsDetected,
    /// `FEW`: 1-2 oktas
    Few,
    /// `SCT`: 3-4 oktas
    Scattered,
    /// `BKN`: 5-7 oktas
    Broken,
    /// `OVC`: 8 oktas
    Overcast,
    /// `VV`: sky obscured, height is the vertical visibility
    VerticalVisibility,
}

impl CloudCoverage {
    fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "SKC" | "CLR" => Self::Clear,
            "NSC" => Self::NoSignificantClouds,
            "NCD" => Self::NoCloudsDetected,
            "FEW" => Self::Few,
            "SCT" => Self::Scattered,
            "BKN" => Self::Broken,
            "OVC" => Self::Overcast,
            "VV" => Self::VerticalVisibility,
            _ => return None,
        })
    }

    /// English description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Clear => "clear sky",
            Self::NoSignificantClouds => "no significant clouds",
            Self::NoCloudsDetected => "no clouds detected",
            Self::Few => "few",
            Self::Scattered => "scattered",
            Self::Broken => "broken",
            Self::Overcast => "overcast",
            Self::VerticalVisibility => "vertical visibility",
        }
    }
}

/// Convective cloud type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CloudType {
    /// `CB`
    Cumulonimbus,
    /// `TCU`
    ToweringCumulus,
}

/// A cloud group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloudLayer {
    /// Amount
    pub coverage: CloudCoverage,
    /// Base height above ground, `None` when not reported
    pub base: Option<Distance>,
    /// Convective type
    pub kind: Option<CloudType>,
}

impl CloudLayer {
    fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        if let Some(clear) = caps.get(1) {
            return Some(Self {
                coverage: CloudCoverage::from_code(clear.as_str())?,
                base: None,
                kind: None,
            });
        }
        let base = caps[3]
            .parse::<u16>()
            .ok()
            .map(|hundreds| Distance::new(f64::from(hundreds) * 100.0, DistanceUnit::Feet));
        let kind = caps.get(4).and_then(|k| match k.as_str() {
            "CB" => Some(CloudType::Cumulonimbus),
            "TCU" => Some(CloudType::ToweringCumulus),
            _ => None,
        });
        Some(Self {
            coverage: CloudCoverage::from_code(&caps[2])?,
            base,
            kind,
        })
    }
}

/// Wind, visibility, weather and clouds of one record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Conditions {
    /// Surface wind
    pub wind: Option<Wind>,
    /// Prevailing visibility
    pub visibility: Option<Visibility>,
    /// Minimum visibility, from a second visibility group
    pub minimum_visibility: Option<Visibility>,
    /// `CAVOK`
    pub cavok: bool,
    /// Present weather
    pub weather: Vec<WeatherPhenomenon>,
    /// Cloud layers
    pub clouds: Vec<CloudLayer>,
    /// `NSW`
    pub no_significant_weather: bool,
    /// `NSC`
    pub no_significant_clouds: bool,
}

impl Conditions {
    /// Returns `true` if no group has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply_wind(&mut self, caps: &Captures<'_>) -> bool {
        let Some(wind) = Wind::from_captures(caps) else {
            return false;
        };
        self.wind = Some(wind);
        true
    }

    pub(crate) fn apply_wind_variation(&mut self, caps: &Captures<'_>) -> bool {
        let (Ok(from), Ok(to)) = (caps[1].parse(), caps[2].parse()) else {
            return false;
        };
        match &mut self.wind {
            Some(wind) => {
                wind.variation = Some((from, to));
                true
            }
            None => false,
        }
    }

    pub(crate) fn apply_visibility(&mut self, caps: &Captures<'_>) -> bool {
        let Some(visibility) = Visibility::from_captures(caps) else {
            return false;
        };
        if caps.get(9).is_some() {
            self.cavok = true;
        }
        if self.visibility.is_some() && caps.get(1).is_some() {
            self.minimum_visibility = Some(visibility);
        } else {
            self.visibility = Some(visibility);
        }
        true
    }

    pub(crate) fn apply_condition(&mut self, caps: &Captures<'_>) -> bool {
        let Some(phenomenon) = WeatherPhenomenon::from_captures(caps) else {
            return false;
        };
        self.weather.push(phenomenon);
        true
    }

    pub(crate) fn apply_clouds(&mut self, caps: &Captures<'_>) -> bool {
        let Some(layer) = CloudLayer::from_captures(caps) else {
            return false;
        };
        if layer.coverage == CloudCoverage::NoSignificantClouds {
            self.no_significant_clouds = true;
        }
        self.clouds.push(layer);
        true
    }
}

/// A change group time range, `DDHH/DDHH` or legacy `HHHH`.
pub(crate) fn decode_time_range(caps: &Captures<'_>) -> Option<(ReportTime, ReportTime)> {
    if caps.get(1).is_some() {
        return Some((
            ReportTime::from_parts(Some(&caps[1]), &caps[2], "00")?,
            ReportTime::from_parts(Some(&caps[3]), &caps[4], "00")?,
        ));
    }
    Some((
        ReportTime::from_parts(Some(&caps[5]), &caps[6], "00")?,
        ReportTime::from_parts(Some(&caps[5]), &caps[7], "00")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conditions_from(tokens: &[(&LazyLock<Regex>, &str)]) -> Conditions {
        let mut conditions = Conditions::default();
        for (pattern, token) in tokens {
            let caps = pattern.captures(token).expect("token matches");
            let applied = if std::ptr::eq(*pattern, &WIND) {
                conditions.apply_wind(&caps)
            } else if std::ptr::eq(*pattern, &VISIBILITY) {
                conditions.apply_visibility(&caps)
            } else if std::ptr::eq(*pattern, &CLOUDS) {
                conditions.apply_clouds(&caps)
            } else {
                conditions.apply_condition(&caps)
            };
            assert!(applied, "{token} was rejected");
        }
        conditions
    }

    #[test]
    fn test_wind_in_knots_with_gust() {
        let c = conditions_from(&[(&WIND, "27015G25KT")]);
        let wind = c.wind.unwrap();
        assert_eq!(wind.direction, WindDirection::Degrees(270));
        assert!((wind.speed.knots() - 15.0).abs() < 1e-9);
        assert!((wind.gust.unwrap().knots() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_wind_calm_and_variable() {
        assert!(conditions_from(&[(&WIND, "00000KT")]).wind.unwrap().is_calm());
        let vrb = conditions_from(&[(&WIND, "VRB03MPS")]).wind.unwrap();
        assert_eq!(vrb.direction, WindDirection::Variable);
        assert!((vrb.speed.value_in(SpeedUnit::MetersPerSecond) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_wind_direction_beyond_compass_rejected() {
        let mut c = Conditions::default();
        assert!(!c.apply_wind(&WIND.captures("99999KT").unwrap()));
        assert!(!c.apply_wind(&WIND.captures("36110KT").unwrap()));
        assert!(c.wind.is_none());
        assert!(c.apply_wind(&WIND.captures("36010KT").unwrap()));
    }

    #[test]
    fn test_wind_variation_needs_wind() {
        let mut c = Conditions::default();
        let caps = WIND_VARIATION.captures("240V300").unwrap();
        assert!(!c.apply_wind_variation(&caps));
        c.apply_wind(&WIND.captures("27010KT").unwrap());
        assert!(c.apply_wind_variation(&caps));
        assert_eq!(c.wind.unwrap().variation, Some((240, 300)));
    }

    #[test]
    fn test_visibility_metres() {
        let c = conditions_from(&[(&VISIBILITY, "9999"), (&VISIBILITY, "1500SW")]);
        let vis = c.visibility.unwrap();
        assert_eq!(vis.bound, Bound::AtLeast);
        assert!((vis.distance.meters() - 10_000.0).abs() < 1e-9);
        let min = c.minimum_visibility.unwrap();
        assert_eq!(min.direction.as_deref(), Some("SW"));
        assert!((min.distance.meters() - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn test_visibility_zero_is_less_than_fifty_metres() {
        let vis = conditions_from(&[(&VISIBILITY, "0000")]).visibility.unwrap();
        assert_eq!(vis.bound, Bound::LessThan);
        assert!((vis.distance.meters() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_visibility_statute_miles() {
        let vis = conditions_from(&[(&VISIBILITY, "1 1/2SM")]).visibility.unwrap();
        assert!((vis.distance.value_in(DistanceUnit::StatuteMiles) - 1.5).abs() < 1e-9);
        let vis = conditions_from(&[(&VISIBILITY, "M1/4SM")]).visibility.unwrap();
        assert_eq!(vis.bound, Bound::LessThan);
        assert!((vis.distance.value_in(DistanceUnit::StatuteMiles) - 0.25).abs() < 1e-9);
        let vis = conditions_from(&[(&VISIBILITY, "P6SM")]).visibility.unwrap();
        assert_eq!(vis.bound, Bound::MoreThan);
    }

    #[test]
    fn test_cavok() {
        let c = conditions_from(&[(&VISIBILITY, "CAVOK")]);
        assert!(c.cavok);
        assert_eq!(c.visibility.unwrap().bound, Bound::MoreThan);
    }

    #[test]
    fn test_runway_visual_range() {
        let caps = RUNWAY.captures("R24L/1200V1800FT/U").unwrap();
        let rvr = RunwayVisualRange::from_captures(&caps).unwrap();
        assert_eq!(rvr.runway, "24L");
        assert!((rvr.range.value_in(DistanceUnit::Feet) - 1200.0).abs() < 1e-9);
        assert_eq!(rvr.tendency, Some(RangeTendency::Increasing));
        assert!(rvr.variable_max.is_some());

        let caps = RUNWAY.captures("R06/P1500N").unwrap();
        let rvr = RunwayVisualRange::from_captures(&caps).unwrap();
        assert_eq!(rvr.bound, Bound::MoreThan);
        assert!((rvr.range.meters() - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn test_weather_phenomena() {
        let c = conditions_from(&[(&CONDITION, "-SHRASN"), (&CONDITION, "VCFG")]);
        assert_eq!(c.weather.len(), 2);
        assert_eq!(c.weather[0].intensity, Intensity::Light);
        assert_eq!(c.weather[0].precipitation, vec!["RA", "SN"]);
        assert_eq!(c.weather[0].description(), "light showers of rain and snow");
        assert!(c.weather[1].vicinity);
        assert_eq!(c.weather[1].description(), "fog in the vicinity");
    }

    #[test]
    fn test_bare_intensity_is_not_weather() {
        let caps = CONDITION.captures("VC").unwrap();
        let mut c = Conditions::default();
        assert!(!c.apply_condition(&caps));
        assert!(c.is_empty());
    }

    #[test]
    fn test_clouds() {
        let c = conditions_from(&[(&CLOUDS, "FEW020"), (&CLOUDS, "BKN045CB"), (&CLOUDS, "OVC///")]);
        assert_eq!(c.clouds.len(), 3);
        assert!((c.clouds[0].base.unwrap().value_in(DistanceUnit::Feet) - 2000.0).abs() < 1e-9);
        assert_eq!(c.clouds[1].kind, Some(CloudType::Cumulonimbus));
        assert!(c.clouds[2].base.is_none());
    }

    #[test]
    fn test_no_significant_clouds() {
        let c = conditions_from(&[(&CLOUDS, "NSC")]);
        assert!(c.no_significant_clouds);
        assert_eq!(c.clouds[0].coverage, CloudCoverage::NoSignificantClouds);
    }

    #[test]
    fn test_time_range() {
        let caps = TIME_RANGE.captures("0112/0118").unwrap();
        let (from, until) = decode_time_range(&caps).unwrap();
        assert_eq!((from.day, from.hour), (Some(1), 12));
        assert_eq!((until.day, until.hour), (Some(1), 18));

        let caps = TIME_RANGE.captures("051218").unwrap();
        let (from, until) = decode_time_range(&caps).unwrap();
        assert_eq!((from.day, from.hour, until.hour), (Some(5), 12, 18));
    }
}
