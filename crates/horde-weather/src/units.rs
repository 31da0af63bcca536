//! Physical quantities decoded from reports and their unit conversions.
//!
//! Every quantity keeps one canonical unit internally (degrees Celsius,
//! knots, hectopascal, metres) and converts on demand.
//!
//! # Examples
//!
//! ```
//! use horde_weather::units::{Speed, SpeedUnit, Temperature, TemperatureUnit};
//!
//! let temp = Temperature::from_celsius(20.0);
//! assert!((temp.value_in(TemperatureUnit::Fahrenheit) - 68.0).abs() < 1e-9);
//!
//! let wind = Speed::new(10.0, SpeedUnit::MetersPerSecond);
//! assert!((wind.knots() - 19.438_444_924).abs() < 1e-6);
//! ```

use crate::error::{Result, WeatherError};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Temperature scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TemperatureUnit {
    /// Degrees Celsius
    Celsius,
    /// Degrees Fahrenheit
    Fahrenheit,
    /// Kelvin
    Kelvin,
}

impl TemperatureUnit {
    /// Display symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
            Self::Kelvin => "K",
        }
    }
}

/// A temperature, stored in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Temperature {
    celsius: f64,
}

impl Temperature {
    /// Creates a temperature from degrees Celsius.
    #[must_use]
    pub const fn from_celsius(celsius: f64) -> Self {
        Self { celsius }
    }

    /// Creates a temperature from a value in any supported scale.
    #[must_use]
    pub fn new(value: f64, unit: TemperatureUnit) -> Self {
        let celsius = match unit {
            TemperatureUnit::Celsius => value,
            TemperatureUnit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            TemperatureUnit::Kelvin => value - 273.15,
        };
        Self { celsius }
    }

    /// Degrees Celsius.
    #[must_use]
    pub const fn celsius(&self) -> f64 {
        self.celsius
    }

    /// Degrees Fahrenheit.
    #[must_use]
    pub fn fahrenheit(&self) -> f64 {
        self.celsius.mul_add(9.0 / 5.0, 32.0)
    }

    /// Value in the requested scale.
    #[must_use]
    pub fn value_in(&self, unit: TemperatureUnit) -> f64 {
        match unit {
            TemperatureUnit::Celsius => self.celsius,
            TemperatureUnit::Fahrenheit => self.fahrenheit(),
            TemperatureUnit::Kelvin => self.celsius + 273.15,
        }
    }
}

/// Speed units used in wind groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SpeedUnit {
    /// Knots (`KT`)
    Knots,
    /// Metres per second (`MPS`)
    MetersPerSecond,
    /// Kilometres per hour (`KMH`)
    KilometersPerHour,
    /// Statute miles per hour (`MPH`)
    MilesPerHour,
    /// Feet per second (`FPS`)
    FeetPerSecond,
}

impl SpeedUnit {
    const fn meters_per_second(self) -> f64 {
        match self {
            Self::Knots => 1852.0 / 3600.0,
            Self::MetersPerSecond => 1.0,
            Self::KilometersPerHour => 1.0 / 3.6,
            Self::MilesPerHour => 0.447_04,
            Self::FeetPerSecond => 0.3048,
        }
    }

    /// Reads the unit suffix of a wind group.
    #[must_use]
    pub fn from_report_code(code: &str) -> Option<Self> {
        match code {
            "KT" | "KTS" => Some(Self::Knots),
            "MPS" => Some(Self::MetersPerSecond),
            "KMH" | "KPH" => Some(Self::KilometersPerHour),
            "MPH" => Some(Self::MilesPerHour),
            "FPS" => Some(Self::FeetPerSecond),
            _ => None,
        }
    }

    /// Display symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Knots => "kt",
            Self::MetersPerSecond => "m/s",
            Self::KilometersPerHour => "km/h",
            Self::MilesPerHour => "mph",
            Self::FeetPerSecond => "ft/s",
        }
    }
}

/// A speed, stored in knots.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Speed {
    knots: f64,
}

impl Speed {
    /// Creates a speed from knots.
    #[must_use]
    pub const fn from_knots(knots: f64) -> Self {
        Self { knots }
    }

    /// Creates a speed from a value in any supported unit.
    #[must_use]
    pub fn new(value: f64, unit: SpeedUnit) -> Self {
        Self {
            knots: value * unit.meters_per_second() / SpeedUnit::Knots.meters_per_second(),
        }
    }

    /// Knots.
    #[must_use]
    pub const fn knots(&self) -> f64 {
        self.knots
    }

    /// Value in the requested unit.
    #[must_use]
    pub fn value_in(&self, unit: SpeedUnit) -> f64 {
        self.knots * SpeedUnit::Knots.meters_per_second() / unit.meters_per_second()
    }

    /// Beaufort force number (0 to 12).
    ///
    /// # Examples
    ///
    /// ```
    /// use horde_weather::units::Speed;
    ///
    /// assert_eq!(Speed::from_knots(0.5).beaufort(), 0);
    /// assert_eq!(Speed::from_knots(25.0).beaufort(), 6);
    /// assert_eq!(Speed::from_knots(80.0).beaufort(), 12);
    /// ```
    #[must_use]
    pub fn beaufort(&self) -> u8 {
        const LIMITS: [f64; 12] = [
            1.0, 4.0, 7.0, 11.0, 17.0, 22.0, 28.0, 34.0, 41.0, 48.0, 56.0, 64.0,
        ];
        LIMITS
            .iter()
            .position(|limit| self.knots < *limit)
            .map_or(12, |force| force as u8)
    }
}

/// Pressure units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PressureUnit {
    /// Hectopascal (millibar)
    Hectopascal,
    /// Inches of mercury
    InchesOfMercury,
    /// Millimetres of mercury
    MillimetersOfMercury,
    /// Standard atmospheres
    Atmosphere,
}

impl PressureUnit {
    const fn hectopascal(self) -> f64 {
        match self {
            Self::Hectopascal => 1.0,
            Self::InchesOfMercury => 33.863_886_666_7,
            Self::MillimetersOfMercury => 1.333_223_684,
            Self::Atmosphere => 1013.25,
        }
    }

    /// Display symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Hectopascal => "hPa",
            Self::InchesOfMercury => "inHg",
            Self::MillimetersOfMercury => "mmHg",
            Self::Atmosphere => "atm",
        }
    }
}

/// A pressure, stored in hectopascal.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Pressure {
    hectopascal: f64,
}

impl Pressure {
    /// Creates a pressure from hectopascal.
    #[must_use]
    pub const fn from_hectopascal(hectopascal: f64) -> Self {
        Self { hectopascal }
    }

    /// Creates a pressure from a value in any supported unit.
    #[must_use]
    pub fn new(value: f64, unit: PressureUnit) -> Self {
        Self {
            hectopascal: value * unit.hectopascal(),
        }
    }

    /// Hectopascal.
    #[must_use]
    pub const fn hectopascal(&self) -> f64 {
        self.hectopascal
    }

    /// Value in the requested unit.
    #[must_use]
    pub fn value_in(&self, unit: PressureUnit) -> f64 {
        self.hectopascal / unit.hectopascal()
    }
}

/// Distance units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DistanceUnit {
    /// Metres
    Meters,
    /// Kilometres
    Kilometers,
    /// Feet
    Feet,
    /// Statute miles
    StatuteMiles,
    /// Nautical miles
    NauticalMiles,
    /// Inches (precipitation, snow depth)
    Inches,
    /// Millimetres (precipitation)
    Millimeters,
}

impl DistanceUnit {
    const fn meters(self) -> f64 {
        match self {
            Self::Meters => 1.0,
            Self::Kilometers => 1000.0,
            Self::Feet => 0.3048,
            Self::StatuteMiles => 1609.344,
            Self::NauticalMiles => 1852.0,
            Self::Inches => 0.0254,
            Self::Millimeters => 0.001,
        }
    }

    /// Display symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Meters => "m",
            Self::Kilometers => "km",
            Self::Feet => "ft",
            Self::StatuteMiles => "mi",
            Self::NauticalMiles => "nmi",
            Self::Inches => "in",
            Self::Millimeters => "mm",
        }
    }
}

/// A distance or height, stored in metres.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Distance {
    meters: f64,
}

impl Distance {
    /// Creates a distance from metres.
    #[must_use]
    pub const fn from_meters(meters: f64) -> Self {
        Self { meters }
    }

    /// Creates a distance from a value in any supported unit.
    #[must_use]
    pub fn new(value: f64, unit: DistanceUnit) -> Self {
        Self {
            meters: value * unit.meters(),
        }
    }

    /// Metres.
    #[must_use]
    pub const fn meters(&self) -> f64 {
        self.meters
    }

    /// Value in the requested unit.
    #[must_use]
    pub fn value_in(&self, unit: DistanceUnit) -> f64 {
        self.meters / unit.meters()
    }
}

/// Display unit system, matching the `metric`/`standard` choice of the
/// configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum UnitSystem {
    /// °C, km/h, hPa, km, mm
    #[default]
    Metric,
    /// °F, mph, inHg, statute miles, inches
    Standard,
}

impl UnitSystem {
    /// Temperature display unit.
    #[must_use]
    pub const fn temperature(&self) -> TemperatureUnit {
        match self {
            Self::Metric => TemperatureUnit::Celsius,
            Self::Standard => TemperatureUnit::Fahrenheit,
        }
    }

    /// Wind speed display unit.
    #[must_use]
    pub const fn speed(&self) -> SpeedUnit {
        match self {
            Self::Metric => SpeedUnit::KilometersPerHour,
            Self::Standard => SpeedUnit::MilesPerHour,
        }
    }

    /// Pressure display unit.
    #[must_use]
    pub const fn pressure(&self) -> PressureUnit {
        match self {
            Self::Metric => PressureUnit::Hectopascal,
            Self::Standard => PressureUnit::InchesOfMercury,
        }
    }

    /// Visibility display unit.
    #[must_use]
    pub const fn distance(&self) -> DistanceUnit {
        match self {
            Self::Metric => DistanceUnit::Kilometers,
            Self::Standard => DistanceUnit::StatuteMiles,
        }
    }

    /// Cloud base display unit.
    #[must_use]
    pub const fn height(&self) -> DistanceUnit {
        match self {
            Self::Metric => DistanceUnit::Meters,
            Self::Standard => DistanceUnit::Feet,
        }
    }

    /// Precipitation and snow depth display unit.
    #[must_use]
    pub const fn precipitation(&self) -> DistanceUnit {
        match self {
            Self::Metric => DistanceUnit::Millimeters,
            Self::Standard => DistanceUnit::Inches,
        }
    }

    /// Configuration spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Standard => "standard",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "metric" | "si" => Ok(Self::Metric),
            "standard" | "imperial" | "us" => Ok(Self::Standard),
            _ => Err(WeatherError::InvalidUnitSystem {
                value: s.to_string(),
            }),
        }
    }
}

/// Relative humidity in percent from temperature and dew point.
///
/// # Examples
///
/// ```
/// use horde_weather::units::{relative_humidity, Temperature};
///
/// let rh = relative_humidity(Temperature::from_celsius(20.0), Temperature::from_celsius(20.0));
/// assert!((rh - 100.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn relative_humidity(temperature: Temperature, dew_point: Temperature) -> f64 {
    let t = temperature.celsius();
    let td = dew_point.celsius();
    let ratio = (112.0 - 0.1 * t + td) / 0.9f64.mul_add(t, 112.0);
    (100.0 * ratio.max(0.0).powi(8)).clamp(0.0, 100.0)
}

/// Wind chill for temperatures at or below 50 °F with wind above 3 mph.
#[must_use]
pub fn wind_chill(temperature: Temperature, wind: Speed) -> Option<Temperature> {
    let t = temperature.fahrenheit();
    let v = wind.value_in(SpeedUnit::MilesPerHour);
    if t > 50.0 || v <= 3.0 {
        return None;
    }
    let v16 = v.powf(0.16);
    let chill = 0.4275 * t * v16 + 0.6215f64.mul_add(t, 35.74) - 35.75 * v16;
    Some(Temperature::new(chill, TemperatureUnit::Fahrenheit))
}

/// Heat index for temperatures at or above 80 °F.
#[must_use]
pub fn heat_index(temperature: Temperature, humidity: f64) -> Option<Temperature> {
    let t = temperature.fahrenheit();
    if t < 80.0 {
        return None;
    }
    let r = humidity;
    let index = -42.379 + 2.049_015_23 * t + 10.143_331_27 * r
        - 0.224_755_41 * t * r
        - 6.837_83e-3 * t * t
        - 5.481_717e-2 * r * r
        + 1.228_74e-3 * t * t * r
        + 8.5282e-4 * t * r * r
        - 1.99e-6 * t * t * r * r;
    Some(Temperature::new(index, TemperatureUnit::Fahrenheit))
}

/// Apparent temperature: wind chill when cold and windy, heat index when
/// hot, the air temperature otherwise.
#[must_use]
pub fn felt_temperature(
    temperature: Temperature,
    dew_point: Option<Temperature>,
    wind: Option<Speed>,
) -> Temperature {
    if let Some(chill) = wind.and_then(|w| wind_chill(temperature, w)) {
        return chill;
    }
    dew_point
        .and_then(|dp| heat_index(temperature, relative_humidity(temperature, dp)))
        .unwrap_or(temperature)
}

/// 16-point compass name for a bearing in degrees.
///
/// # Examples
///
/// ```
/// use horde_weather::units::compass_direction;
///
/// assert_eq!(compass_direction(0), "N");
/// assert_eq!(compass_direction(225), "SW");
/// assert_eq!(compass_direction(350), "N");
/// ```
#[must_use]
pub fn compass_direction(degrees: u16) -> &'static str {
    const POINTS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];
    let index = ((f64::from(degrees % 360) / 22.5).round() as usize) % POINTS.len();
    POINTS[index]
}
