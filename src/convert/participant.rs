//! Single-participant export with per-step distance annotations.

use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::colors::{ColorAssigner, ColorPolicy};
use crate::feature::{Extras, set_point_distance, to_feature};
use crate::geo::haversine;
use crate::output::{feature_collection, write_collection};
use crate::record::Record;

/// Exports all records of one participant as a single collection.
///
/// Each point's geometry carries a `distance` member: the haversine distance
/// in meters from the previously emitted point of the run, 0 for the first.
/// The collection includes the CRS block.
pub fn export_participant(records: &[Record], participant: i64, out: &Path) -> Result<usize> {
    let mut colours = ColorAssigner::new(ColorPolicy::Palette);
    let mut prev: Option<(f64, f64)> = None;
    let mut features = Vec::new();

    for record in records.iter().filter(|r| r.participant == participant) {
        let current = record.coordinates();
        let distance = match prev {
            Some((lon, lat)) => haversine(lon, lat, current.0, current.1),
            None => 0.0,
        };
        prev = Some(current);

        let colour = colours.colour(record.participant);
        let mut feature = to_feature(
            record,
            Extras {
                colour: Some(&colour),
                accumulated_distance: None,
            },
        );
        set_point_distance(&mut feature, distance);
        features.push(feature);
    }

    let count = features.len();
    write_collection(out, &feature_collection(features, true))?;

    info!(
        participant,
        features = count,
        path = %out.display(),
        "Participant export written"
    );
    Ok(count)
}
