use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use telemetry_geojson::convert::daytime::export_day_time_buckets;
use telemetry_geojson::convert::participant::export_participant;
use telemetry_geojson::convert::proximity::{ProximityFilter, export_proximity};
use telemetry_geojson::record::load_records;

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("telemetry_sample.txt")
}

fn read_geojson(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_load_skips_malformed_lines() {
    let (records, summary) = load_records(&fixture_path()).expect("fixture must load");

    // 7 valid lines; one short, one bad timestamp, one bad numeric
    assert_eq!(records.len(), 7);
    assert_eq!(summary.parsed, 7);
    assert_eq!(summary.too_few_fields, 1);
    assert_eq!(summary.bad_timestamps, 1);
    assert_eq!(summary.bad_numbers, 1);
}

#[test]
fn test_participant_pipeline() {
    let (records, _) = load_records(&fixture_path()).unwrap();

    let out = env::temp_dir().join("telemetry_geojson_it_participant.geojson");
    let _ = fs::remove_file(&out);

    let count = export_participant(&records, 1, &out).unwrap();
    assert_eq!(count, 3);

    let parsed = read_geojson(&out);
    assert_eq!(
        parsed["crs"]["properties"]["name"],
        "urn:ogc:def:crs:OGC:1.3:CRS84"
    );

    let features = parsed["features"].as_array().unwrap();
    assert_eq!(features[0]["geometry"]["distance"], 0.0);
    assert!(features[1]["geometry"]["distance"].as_f64().unwrap() > 0.0);
    assert_eq!(features[0]["properties"]["colour"], "red");
    assert!(features[0]["properties"]["HRV"].is_null());

    fs::remove_file(&out).unwrap();
}

#[test]
fn test_buckets_pipeline() {
    let (records, _) = load_records(&fixture_path()).unwrap();

    let dir = env::temp_dir().join("telemetry_geojson_it_buckets");
    let _ = fs::remove_dir_all(&dir);

    export_day_time_buckets(&records, &dir).unwrap();
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 28);

    let morning = read_geojson(&dir.join("monday_morning.geojson"));
    assert_eq!(morning["features"].as_array().unwrap().len(), 5);
    assert!(morning.get("crs").is_none());

    let midday = read_geojson(&dir.join("monday_midday.geojson"));
    assert_eq!(midday["features"].as_array().unwrap().len(), 1);
    assert_eq!(midday["features"][0]["properties"]["Activity"], "bus");

    let tuesday_night = read_geojson(&dir.join("tuesday_night.geojson"));
    assert_eq!(tuesday_night["features"].as_array().unwrap().len(), 1);

    // A bucket nothing falls into is still written, empty
    let empty = read_geojson(&dir.join("sunday_afternoon.geojson"));
    assert!(empty["features"].as_array().unwrap().is_empty());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_proximity_pipeline() {
    let (records, _) = load_records(&fixture_path()).unwrap();

    let out = env::temp_dir().join("telemetry_geojson_it_proximity.geojson");
    let _ = fs::remove_file(&out);

    let count = export_proximity(&records, &ProximityFilter::default(), &out).unwrap();

    // Participant 1 (2 windowed points near the reference) and participant 3
    // (one point at 08:00:00, inclusive boundary) survive; participant 2's
    // trip is entirely beyond the radius
    assert_eq!(count, 3);

    let parsed = read_geojson(&out);
    assert_eq!(
        parsed["crs"]["properties"]["name"],
        "urn:ogc:def:crs:OGC:1.3:CRS84"
    );

    let features = parsed["features"].as_array().unwrap();
    let participants: Vec<i64> = features
        .iter()
        .map(|f| f["properties"]["Participant"].as_i64().unwrap())
        .collect();
    assert_eq!(participants, vec![1, 1, 3]);

    fs::remove_file(&out).unwrap();
}
