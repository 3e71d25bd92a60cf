//! Telemetry record model and per-line validation.
//!
//! One record corresponds to one line of the study log: a timestamp, a
//! participant id, an activity label, physiological and event measures, and a
//! GPS position. Lines that fail validation are reported as a [`SkipReason`]
//! instead of aborting the run.

use anyhow::Result;
use chrono::{NaiveDateTime, NaiveTime, Timelike};
use csv::StringRecord;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// Minimum number of comma-separated fields a line must carry.
pub const MIN_FIELDS: usize = 25;

/// Timestamp layout used by the study log.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Typed projection of one telemetry line.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Raw timestamp string, carried verbatim into output properties.
    pub timestamp_raw: String,
    pub timestamp: NaiveDateTime,
    pub participant: i64,
    pub activity: String,

    pub hr_mad_filtered: Option<f64>,
    pub hrv: Option<f64>,
    pub stress: Option<f64>,
    pub satisfaction_journey: Option<f64>,

    pub latitude: f64,
    pub longitude: f64,

    pub event_delay: i64,
    pub event_disturbing_people: i64,
    pub event_negative_driving: i64,
    pub event_infrastructure: i64,
    pub event_positive_interaction: i64,
    pub event_media_entertainment: i64,
    pub event_reached: i64,
    pub event_discomfort: i64,
    pub event_comfortable: i64,
    pub event_beautiful: i64,

    pub emotion_open: Option<String>,
    pub event_free: Option<String>,
    pub mode_keepmoving: String,
    pub mode_button: Option<String>,
}

impl Record {
    /// Position as (longitude, latitude), the GeoJSON axis order.
    pub fn coordinates(&self) -> (f64, f64) {
        (self.longitude, self.latitude)
    }

    pub fn time_of_day(&self) -> NaiveTime {
        self.timestamp.time()
    }

    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }
}

/// Why a line was dropped instead of becoming a [`Record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Fewer than [`MIN_FIELDS`] comma-separated fields.
    TooFewFields(usize),
    /// A required numeric field failed to parse.
    BadNumber { index: usize, value: String },
    /// The timestamp did not match [`TIMESTAMP_FORMAT`].
    BadTimestamp(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooFewFields(n) => write!(f, "too few fields ({n})"),
            SkipReason::BadNumber { index, value } => {
                write!(f, "bad number in field {index}: {value:?}")
            }
            SkipReason::BadTimestamp(v) => write!(f, "bad timestamp: {v:?}"),
        }
    }
}

fn required(fields: &StringRecord, index: usize) -> Result<&str, SkipReason> {
    fields
        .get(index)
        .ok_or(SkipReason::TooFewFields(fields.len()))
}

fn parse_f64(fields: &StringRecord, index: usize) -> Result<f64, SkipReason> {
    let raw = required(fields, index)?;
    raw.parse().map_err(|_| SkipReason::BadNumber {
        index,
        value: raw.to_string(),
    })
}

fn parse_i64(fields: &StringRecord, index: usize) -> Result<i64, SkipReason> {
    let raw = required(fields, index)?;
    raw.parse().map_err(|_| SkipReason::BadNumber {
        index,
        value: raw.to_string(),
    })
}

/// Parses a float field where the sentinel `NA` means "not recorded".
fn parse_opt_f64(fields: &StringRecord, index: usize) -> Result<Option<f64>, SkipReason> {
    let raw = required(fields, index)?;
    if raw == "NA" {
        return Ok(None);
    }
    raw.parse().map(Some).map_err(|_| SkipReason::BadNumber {
        index,
        value: raw.to_string(),
    })
}

fn parse_opt_string(fields: &StringRecord, index: usize) -> Result<Option<String>, SkipReason> {
    let raw = required(fields, index)?;
    Ok(if raw == "NA" {
        None
    } else {
        Some(raw.to_string())
    })
}

/// Validates one line of the log.
///
/// Returns `Err(SkipReason)` for any line that the converters should drop:
/// too few fields, unparseable numerics, or a malformed timestamp. All three
/// conversion modes share this single validation path.
pub fn parse_record(fields: &StringRecord) -> Result<Record, SkipReason> {
    if fields.len() < MIN_FIELDS {
        return Err(SkipReason::TooFewFields(fields.len()));
    }

    let timestamp_raw = required(fields, 0)?.to_string();
    let timestamp = NaiveDateTime::parse_from_str(&timestamp_raw, TIMESTAMP_FORMAT)
        .map_err(|_| SkipReason::BadTimestamp(timestamp_raw.clone()))?;

    Ok(Record {
        timestamp,
        timestamp_raw,
        participant: parse_i64(fields, 1)?,
        activity: required(fields, 2)?.to_string(),
        hr_mad_filtered: parse_opt_f64(fields, 3)?,
        hrv: parse_opt_f64(fields, 4)?,
        stress: parse_opt_f64(fields, 5)?,
        satisfaction_journey: parse_opt_f64(fields, 6)?,
        latitude: parse_f64(fields, 7)?,
        longitude: parse_f64(fields, 8)?,
        // fields 9 (gender) and 10 (age) are not exported
        event_delay: parse_i64(fields, 11)?,
        event_disturbing_people: parse_i64(fields, 12)?,
        event_negative_driving: parse_i64(fields, 13)?,
        event_infrastructure: parse_i64(fields, 14)?,
        event_positive_interaction: parse_i64(fields, 15)?,
        event_media_entertainment: parse_i64(fields, 16)?,
        event_reached: parse_i64(fields, 17)?,
        event_discomfort: parse_i64(fields, 18)?,
        event_comfortable: parse_i64(fields, 19)?,
        event_beautiful: parse_i64(fields, 20)?,
        emotion_open: parse_opt_string(fields, 21)?,
        event_free: parse_opt_string(fields, 22)?,
        mode_keepmoving: required(fields, 23)?.to_string(),
        mode_button: parse_opt_string(fields, 24)?,
    })
}

/// Skip counters for one load pass.
#[derive(Debug, Default)]
pub struct LoadSummary {
    pub parsed: usize,
    pub too_few_fields: usize,
    pub bad_numbers: usize,
    pub bad_timestamps: usize,
}

impl LoadSummary {
    fn count(&mut self, reason: &SkipReason) {
        match reason {
            SkipReason::TooFewFields(_) => self.too_few_fields += 1,
            SkipReason::BadNumber { .. } => self.bad_numbers += 1,
            SkipReason::BadTimestamp(_) => self.bad_timestamps += 1,
        }
    }

    pub fn skipped(&self) -> usize {
        self.too_few_fields + self.bad_numbers + self.bad_timestamps
    }
}

/// Reads the whole log into memory, one pass, header line discarded.
///
/// Invalid lines are skipped with a logged reason; only I/O errors abort.
pub fn load_records(path: &Path) -> Result<(Vec<Record>, LoadSummary)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut records = Vec::new();
    let mut summary = LoadSummary::default();

    for (line_no, row) in reader.records().enumerate() {
        let row = row?;
        match parse_record(&row) {
            Ok(record) => {
                summary.parsed += 1;
                records.push(record);
            }
            Err(reason) => {
                summary.count(&reason);
                // +2: enumerate is 0-based and the header line was consumed
                debug!(line = line_no + 2, %reason, "Skipping line");
            }
        }
    }

    if summary.skipped() > 0 {
        warn!(
            parsed = summary.parsed,
            too_few_fields = summary.too_few_fields,
            bad_numbers = summary.bad_numbers,
            bad_timestamps = summary.bad_timestamps,
            "Some lines were skipped"
        );
    } else {
        info!(parsed = summary.parsed, "Log loaded");
    }

    Ok((records, summary))
}

/// Fully-populated record for use in unit tests across the crate.
#[cfg(test)]
pub(crate) fn sample_record() -> Record {
    parse_record(&StringRecord::from(tests::VALID_LINE.to_vec()))
        .expect("sample line must parse")
}
