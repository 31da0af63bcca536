//! Decoding of complete terminal forecasts.

use horde_weather::taf::{ChangeKind, ForecastStatus};
use horde_weather::units::DistanceUnit;
use horde_weather::{ForecastSummary, ReportTime, UnitSystem, parse_taf};

#[test]
fn test_us_forecast_with_from_groups() {
    let raw = "2024/05/01 11:30\n\
               TAF KBOS 011130Z 0112/0218 26012KT P6SM SCT050\n      \
               FM011800 29015G25KT P6SM BKN040\n      \
               FM020200 30008KT 4SM -SHRA OVC015\n        \
               TEMPO 0204/0208 2SM SHRA BR OVC008\n      \
               FM021400 32012KT P6SM SCT035=";
    let taf = parse_taf(raw).unwrap();

    assert_eq!(taf.station, "KBOS");
    assert_eq!(taf.periods.len(), 4);
    assert_eq!(taf.periods[2].from, ReportTime::new(Some(2), 2, 0));
    let tempo = &taf.periods[2].changes[0];
    assert_eq!(tempo.kind, ChangeKind::Temporary);
    assert_eq!(tempo.until, ReportTime::new(Some(2), 8, 0));
    assert_eq!(tempo.conditions.weather.len(), 2);
    let vis = tempo.conditions.visibility.as_ref().unwrap();
    assert!((vis.distance.value_in(DistanceUnit::StatuteMiles) - 2.0).abs() < 1e-9);
    assert!(taf.periods[3].changes.is_empty());
    assert!(taf.unparsed.is_empty());
}

#[test]
fn test_european_forecast_with_becoming_and_probability() {
    let taf = parse_taf(
        "TAF COR EHAM 011100Z 0112/0218 21012KT 9999 FEW025 \
         BECMG 0115/0117 25018G28KT \
         PROB30 TEMPO 0118/0122 26025G40KT 3500 +SHRA BKN012CB \
         PROB40 0203/0207 0700 FG",
    )
    .unwrap();

    assert!(taf.corrected);
    let changes = &taf.periods[0].changes;
    assert_eq!(changes.len(), 3);
    assert_eq!(changes[0].kind, ChangeKind::Becoming);
    assert_eq!((changes[1].kind, changes[1].probability), (ChangeKind::Temporary, Some(30)));
    assert_eq!((changes[2].kind, changes[2].probability), (ChangeKind::Probability, Some(40)));
    assert!(changes[1].conditions.wind.unwrap().gust.is_some());
}

#[test]
fn test_cancelled_forecast() {
    let taf = parse_taf("TAF AMD EGSS 011320Z 0113/0212 CNL").unwrap();
    assert!(taf.amended);
    assert_eq!(taf.status, Some(ForecastStatus::Cancelled));
}

#[test]
fn test_forecast_summary_in_standard_units() {
    let taf = parse_taf("TAF KDEN 011130Z 0112/0218 VRB05KT P6SM SKC TX27/0121Z TN09/0212Z").unwrap();
    let summary = ForecastSummary::from_taf(&taf, UnitSystem::Standard);
    let period = &summary.periods[0];
    assert_eq!(period.section.conditions.visibility.as_deref(), Some("more than 6.0 mi"));
    assert_eq!(period.section.conditions.clouds, vec!["clear sky"]);
    assert!((period.max_temperature.unwrap().value - 80.6).abs() < 1e-9);
    assert!(period.section.conditions.wind.as_deref().unwrap().starts_with("variable at"));
}
