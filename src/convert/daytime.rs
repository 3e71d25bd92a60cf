//! Day-of-week × time-of-day bucketing with per-participant accumulated
//! distance.
//!
//! Every valid record lands in exactly one of 28 buckets (7 days × 4 slots);
//! all 28 files are written even when empty.

use anyhow::Result;
use chrono::{Datelike, Weekday};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use crate::colors::{ColorAssigner, ColorPolicy};
use crate::feature::{Extras, to_feature};
use crate::geo::haversine;
use crate::output::{feature_collection, write_collection};
use crate::record::Record;

/// The four time-of-day windows, hour-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeSlot {
    /// 05:00–08:59
    Morning,
    /// 09:00–14:59
    Midday,
    /// 15:00–19:59
    Afternoon,
    /// 20:00–04:59
    Night,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 4] = [
        TimeSlot::Morning,
        TimeSlot::Midday,
        TimeSlot::Afternoon,
        TimeSlot::Night,
    ];

    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=8 => TimeSlot::Morning,
            9..=14 => TimeSlot::Midday,
            15..=19 => TimeSlot::Afternoon,
            _ => TimeSlot::Night,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "morning",
            TimeSlot::Midday => "midday",
            TimeSlot::Afternoon => "afternoon",
            TimeSlot::Night => "night",
        }
    }
}

pub const DAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Per-participant accumulation state: last seen position and running sum.
#[derive(Debug, Default)]
struct Track {
    prev: Option<(f64, f64)>,
    accumulated: f64,
}

/// Buckets every record into `<out_dir>/<day>_<slot>.geojson`.
///
/// Accumulated distance is a running per-participant sum of step distances,
/// keyed by participant id, so it stays correct even when the input is not
/// grouped contiguously by participant. A warning is logged the first time
/// non-contiguous grouping is detected. Bucket files carry no CRS block.
pub fn export_day_time_buckets(records: &[Record], out_dir: &Path) -> Result<()> {
    let mut colours = ColorAssigner::new(ColorPolicy::Palette);
    let mut tracks: HashMap<i64, Track> = HashMap::new();
    let mut buckets: HashMap<(Weekday, TimeSlot), Vec<geojson::Feature>> = HashMap::new();

    let mut last_participant: Option<i64> = None;
    let mut warned_non_contiguous = false;

    for record in records {
        if last_participant != Some(record.participant)
            && tracks.contains_key(&record.participant)
            && !warned_non_contiguous
        {
            warn!(
                participant = record.participant,
                "Input is not grouped contiguously by participant; \
                 accumulated distances are tracked per participant id"
            );
            warned_non_contiguous = true;
        }
        last_participant = Some(record.participant);

        let colour = colours.colour(record.participant);

        let track = tracks.entry(record.participant).or_default();
        let current = record.coordinates();
        if let Some((lon, lat)) = track.prev {
            track.accumulated += haversine(lon, lat, current.0, current.1);
        }
        track.prev = Some(current);

        let feature = to_feature(
            record,
            Extras {
                colour: Some(&colour),
                accumulated_distance: Some(track.accumulated),
            },
        );

        let key = (record.timestamp.weekday(), TimeSlot::from_hour(record.hour()));
        buckets.entry(key).or_default().push(feature);
    }

    let mut written = 0usize;
    for day in DAYS {
        for slot in TimeSlot::ALL {
            let features = buckets.remove(&(day, slot)).unwrap_or_default();
            let path = out_dir.join(format!("{}_{}.geojson", day_name(day), slot.as_str()));
            write_collection(&path, &feature_collection(features, false))?;
            written += 1;
        }
    }

    info!(
        files = written,
        out_dir = %out_dir.display(),
        "Day/time bucket export written"
    );
    Ok(())
}
