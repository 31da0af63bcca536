//! METAR and TAF aviation weather report decoding.
//!
//! Reports are split into groups by the [`tokenizer`], then matched against
//! ordered slot tables ([`grammar`]) whose rules drop out once they have
//! matched. Decoded values keep canonical units ([`units`]) and can be
//! rendered in either unit system through [`summary`].
//!
//! # Examples
//!
//! ```
//! use horde_weather::{parse_metar, UnitSystem, ObservationSummary};
//!
//! let metar = parse_metar("KJFK 011151Z 31012KT 10SM FEW250 M02/M12 A3021").unwrap();
//! assert!((metar.temperature.unwrap().celsius() + 2.0).abs() < 1e-9);
//!
//! let summary = ObservationSummary::from_metar(&metar, UnitSystem::Metric);
//! assert_eq!(summary.station, "KJFK");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod error;

pub mod conditions;
pub mod grammar;
pub mod metar;
pub mod remarks;
pub mod service;
pub mod source;
pub mod summary;
pub mod taf;
pub mod time;
pub mod tokenizer;
pub mod units;

pub use error::{Result, WeatherError};
pub use metar::{Metar, parse_metar};
pub use service::WeatherService;
pub use source::{NoaaSource, ReportSource, ReportType, StaticSource, StationId};
pub use summary::{ForecastSummary, ObservationSummary};
pub use taf::{Taf, parse_taf};
pub use time::ReportTime;
pub use units::UnitSystem;
