//! Morning-window trip filtering by proximity to a reference point.
//!
//! Records inside the time window are grouped into one trip per participant,
//! in first-appearance order. A trip is kept iff any of its points lies
//! within the configured radius of the reference coordinate.

use anyhow::Result;
use chrono::NaiveTime;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use crate::colors::{ColorAssigner, ColorPolicy};
use crate::feature::{Extras, to_feature};
use crate::geo::haversine;
use crate::output::{feature_collection, write_collection};
use crate::record::Record;

/// Filter configuration; defaults reproduce the Braunschweig study setup.
#[derive(Debug, Clone)]
pub struct ProximityFilter {
    /// Reference coordinate as (longitude, latitude).
    pub reference: (f64, f64),
    /// Inclusive distance cutoff in meters.
    pub radius_m: f64,
    /// Inclusive start of the time-of-day window.
    pub window_start: NaiveTime,
    /// Inclusive end of the time-of-day window.
    pub window_end: NaiveTime,
}

impl Default for ProximityFilter {
    fn default() -> Self {
        ProximityFilter {
            reference: (10.538761725, 52.252495764),
            radius_m: 2000.0,
            window_start: NaiveTime::from_hms_opt(6, 30, 0).unwrap(),
            window_end: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        }
    }
}

impl ProximityFilter {
    /// Inclusive at both window boundaries.
    pub fn in_window(&self, time: NaiveTime) -> bool {
        time >= self.window_start && time <= self.window_end
    }

    /// Whether a point is within the radius (inclusive) of the reference.
    pub fn near_reference(&self, lon: f64, lat: f64) -> bool {
        haversine(self.reference.0, self.reference.1, lon, lat) <= self.radius_m
    }
}

/// One participant's ordered point sequence inside the time window.
struct Trip<'a> {
    participant: i64,
    records: Vec<&'a Record>,
}

/// Writes a single collection (with CRS block) of all trips that pass the
/// proximity filter. Returns the number of features written.
pub fn export_proximity(records: &[Record], filter: &ProximityFilter, out: &Path) -> Result<usize> {
    let mut colours = ColorAssigner::new(ColorPolicy::RandomHex);

    // Group windowed records into trips, preserving first-appearance order
    let mut trips: Vec<Trip> = Vec::new();
    let mut trip_index: HashMap<i64, usize> = HashMap::new();

    for record in records {
        if !filter.in_window(record.time_of_day()) {
            continue;
        }
        let index = *trip_index.entry(record.participant).or_insert_with(|| {
            trips.push(Trip {
                participant: record.participant,
                records: Vec::new(),
            });
            trips.len() - 1
        });
        trips[index].records.push(record);
    }

    let mut features = Vec::new();
    let mut kept = 0usize;

    for trip in &trips {
        let include = trip
            .records
            .iter()
            .any(|r| filter.near_reference(r.longitude, r.latitude));
        if !include {
            debug!(
                participant = trip.participant,
                points = trip.records.len(),
                "Trip excluded, no point near reference"
            );
            continue;
        }

        kept += 1;
        let colour = colours.colour(trip.participant);
        for record in &trip.records {
            features.push(to_feature(
                record,
                Extras {
                    colour: Some(&colour),
                    accumulated_distance: None,
                },
            ));
        }
    }

    let count = features.len();
    write_collection(out, &feature_collection(features, true))?;

    info!(
        trips = trips.len(),
        kept,
        features = count,
        path = %out.display(),
        "Proximity export written"
    );
    Ok(count)
}
