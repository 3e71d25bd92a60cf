//! Collection assembly and GeoJSON file writing.

use anyhow::Result;
use geojson::{Feature, FeatureCollection, JsonObject, JsonValue};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// CRS name emitted on single-file outputs, matching the WGS84 default.
pub const CRS_NAME: &str = "urn:ogc:def:crs:OGC:1.3:CRS84";

fn crs_member() -> JsonValue {
    let mut props = JsonObject::new();
    props.insert("name".to_string(), CRS_NAME.into());

    let mut crs = JsonObject::new();
    crs.insert("type".to_string(), "name".into());
    crs.insert("properties".to_string(), props.into());
    crs.into()
}

/// Wraps features into a collection, optionally carrying the CRS block.
pub fn feature_collection(features: Vec<Feature>, with_crs: bool) -> FeatureCollection {
    let foreign_members = with_crs.then(|| {
        let mut members = JsonObject::new();
        members.insert("crs".to_string(), crs_member());
        members
    });

    FeatureCollection {
        bbox: None,
        features,
        foreign_members,
    }
}

/// Serializes a collection to `path` as UTF-8 JSON with 4-space indentation.
///
/// Creates parent directories as needed.
pub fn write_collection(path: &Path, collection: &FeatureCollection) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    debug!(path = %path.display(), features = collection.features.len(), "Writing collection");

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    collection.serialize(&mut serializer)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{Extras, to_feature};
    use crate::record::sample_record;
    use std::env;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_crs_present_when_requested() {
        let collection = feature_collection(vec![], true);
        let members = collection.foreign_members.as_ref().unwrap();
        assert_eq!(members["crs"]["type"], "name");
        assert_eq!(members["crs"]["properties"]["name"], CRS_NAME);
    }

    #[test]
    fn test_crs_absent_by_default() {
        let collection = feature_collection(vec![], false);
        assert!(collection.foreign_members.is_none());
    }

    #[test]
    fn test_write_empty_collection() {
        let path = temp_path("telemetry_geojson_test_empty.geojson");
        let _ = fs::remove_file(&path);

        write_collection(&path, &feature_collection(vec![], false)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["type"], "FeatureCollection");
        assert_eq!(parsed["features"].as_array().unwrap().len(), 0);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_uses_four_space_indent() {
        let path = temp_path("telemetry_geojson_test_indent.geojson");
        let _ = fs::remove_file(&path);

        let feature = to_feature(&sample_record(), Extras::default());
        write_collection(&path, &feature_collection(vec![feature], true)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.lines().any(|l| l.starts_with("    \"")));
        assert!(!content.lines().any(|l| l.starts_with("  \"")));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = temp_path("telemetry_geojson_test_nested");
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("deep").join("out.geojson");

        write_collection(&path, &feature_collection(vec![], false)).unwrap();
        assert!(path.exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_written_file_round_trips_crs() {
        let path = temp_path("telemetry_geojson_test_crs.geojson");
        let _ = fs::remove_file(&path);

        let feature = to_feature(&sample_record(), Extras::default());
        write_collection(&path, &feature_collection(vec![feature], true)).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["crs"]["properties"]["name"], CRS_NAME);
        assert_eq!(
            parsed["features"][0]["geometry"]["coordinates"][0],
            10.538761725
        );

        fs::remove_file(&path).unwrap();
    }
}
