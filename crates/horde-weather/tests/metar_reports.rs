//! Decoding of complete observations as published by stations.

use horde_weather::conditions::{Bound, CloudCoverage, CloudType, Intensity, WindDirection};
use horde_weather::metar::{ReportKind, ReportModifier, TrendKind};
use horde_weather::remarks::{Precipitation, StationType, TendencyDirection};
use horde_weather::units::{DistanceUnit, PressureUnit, SpeedUnit};
use horde_weather::{ObservationSummary, UnitSystem, WeatherError, parse_metar};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn test_noaa_feed_observation_with_remarks() {
    let raw = "2024/01/15 14:56\n\
               KORD 151456Z 33015G27KT 3SM -SN BR BKN008 OVC015 M04/M06 A2986 \
               RMK AO2 PK WND 32031/1420 SLP119 P0003 60007 T10441061 58024 $\n";
    let metar = parse_metar(raw).unwrap();

    assert_eq!(metar.station, "KORD");
    assert_eq!(metar.kind, ReportKind::Metar);
    let wind = metar.conditions.wind.unwrap();
    assert_eq!(wind.direction, WindDirection::Degrees(330));
    assert!(close(wind.gust.unwrap().knots(), 27.0));
    assert_eq!(metar.conditions.weather.len(), 2);
    assert_eq!(metar.conditions.weather[0].intensity, Intensity::Light);
    assert_eq!(metar.conditions.clouds[1].coverage, CloudCoverage::Overcast);
    assert!(close(metar.temperature.unwrap().celsius(), -4.0));

    let remarks = &metar.remarks;
    assert_eq!(remarks.station_type, Some(StationType::AutomatedWithPrecipitation));
    assert!(close(remarks.sea_level_pressure.unwrap().hectopascal(), 1011.9));
    let Some(Precipitation::Amount(hourly)) = remarks.hourly_precipitation else {
        panic!("hourly precipitation missing");
    };
    assert!(close(hourly.value_in(DistanceUnit::Inches), 0.03));
    assert!(close(remarks.temperature.unwrap().celsius(), -4.4));
    assert!(close(remarks.dew_point.unwrap().celsius(), -6.1));
    let tendency = remarks.pressure_tendency.unwrap();
    assert_eq!(tendency.direction, TendencyDirection::Falling);
    assert!(close(tendency.change.hectopascal(), 2.4));
    assert!(remarks.maintenance_needed);
    assert_eq!(remarks.other, vec!["PK", "WND", "32031/1420"]);
    assert!(metar.unparsed.is_empty());
}

#[test]
fn test_european_observation_with_trend() {
    let metar = parse_metar(
        "METAR LOWW 011220Z 30012KT 270V330 5000 1200NE R29/P1500 TSRA FEW030CB BKN050 \
         22/17 Q1009 TEMPO FM1300 TL1400 3000 +TSRA BKN020CB=",
    )
    .unwrap();

    let vis = metar.conditions.visibility.as_ref().unwrap();
    assert!(close(vis.distance.meters(), 5000.0));
    let minimum = metar.conditions.minimum_visibility.as_ref().unwrap();
    assert_eq!(minimum.direction.as_deref(), Some("NE"));
    assert_eq!(metar.runways[0].bound, Bound::MoreThan);
    assert_eq!(metar.conditions.clouds[0].kind, Some(CloudType::Cumulonimbus));
    assert!(close(metar.pressure.unwrap().hectopascal(), 1009.0));

    let trend = &metar.trends[0];
    assert_eq!(trend.kind, TrendKind::Temporary);
    assert_eq!(trend.conditions.weather[0].intensity, Intensity::Heavy);
    assert_eq!(trend.conditions.clouds.len(), 1);
    assert!(metar.remarks.is_empty());
}

#[test]
fn test_automated_calm_observation_in_metres_per_second() {
    let metar = parse_metar("UUEE 010300Z AUTO 00000MPS 0600 R24/0550D FG VV002 M01/M01 Q1025 NOSIG").unwrap();
    assert_eq!(metar.modifier, Some(ReportModifier::Auto));
    assert!(metar.conditions.wind.unwrap().is_calm());
    assert_eq!(metar.conditions.clouds[0].coverage, CloudCoverage::VerticalVisibility);
    assert!(metar.no_significant_change);
}

#[test]
fn test_units_follow_the_report() {
    let metar = parse_metar("RJTT 010000Z 36010KMH 10KM SCT020 15/10 Q1020").unwrap();
    let wind = metar.conditions.wind.unwrap();
    assert!(close(wind.speed.value_in(SpeedUnit::KilometersPerHour), 10.0));
    let vis = metar.conditions.visibility.unwrap();
    assert!(close(vis.distance.value_in(DistanceUnit::Kilometers), 10.0));
    assert!(close(metar.pressure.unwrap().value_in(PressureUnit::Hectopascal), 1020.0));
}

#[test]
fn test_summary_in_standard_units() {
    let metar = parse_metar("KPHX 012151Z 24008KT 10SM FEW100 41/02 A2982").unwrap();
    let summary = ObservationSummary::from_metar(&metar, UnitSystem::Standard);
    let temperature = summary.temperature.unwrap();
    assert!(close(temperature.value, 105.8));
    assert!(summary.humidity.unwrap() < 15.0);
    assert_eq!(summary.conditions.visibility.as_deref(), Some("10.0 mi"));
}

#[test]
fn test_json_shape_of_record_and_summary() {
    let metar = parse_metar("KPHX 012151Z 24008KT 10SM FEW100 41/02 A2982").unwrap();

    let record = serde_json::to_value(&metar).unwrap();
    assert_eq!(record["station"], "KPHX");
    assert_eq!(record["kind"], "Metar");
    assert_eq!(record["no_significant_change"], false);
    assert!(record["unparsed"].as_array().unwrap().is_empty());
    assert!(record["conditions"]["clouds"].is_array());

    let summary = serde_json::to_value(ObservationSummary::from_metar(&metar, UnitSystem::Standard)).unwrap();
    assert_eq!(summary["station"], "KPHX");
    assert_eq!(summary["conditions"]["visibility"], "10.0 mi");
    assert!(close(summary["temperature"]["value"].as_f64().unwrap(), 105.8));
    assert!(summary["temperature"]["unit"].is_string());
    assert!(summary["trends"].as_array().unwrap().is_empty());
}

#[test]
fn test_rejects_reports_without_station() {
    assert!(matches!(parse_metar(""), Err(WeatherError::EmptyReport)));
    let err = parse_metar("151456Z 33015KT").unwrap_err();
    assert!(err.is_parse_error());
}
