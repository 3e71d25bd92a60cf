//! GeoJSON feature construction from telemetry records.

use geojson::{Feature, Geometry, JsonObject, JsonValue, Value};

use crate::record::Record;

/// Mode-specific extras carried next to the record fields.
#[derive(Debug, Default, Clone)]
pub struct Extras<'a> {
    /// `colour` property, from one of the [`crate::colors`] policies.
    pub colour: Option<&'a str>,
    /// `accumulated_distance` property in meters.
    pub accumulated_distance: Option<f64>,
}

/// Builds a Point feature whose properties are the typed projection of the
/// record, in field order, with `NA` sentinels rendered as `null`.
pub fn to_feature(record: &Record, extras: Extras<'_>) -> Feature {
    let mut props = JsonObject::new();
    let mut set = |key: &str, value: JsonValue| {
        props.insert(key.to_string(), value);
    };

    set("Timestamp", record.timestamp_raw.clone().into());
    set("Participant", record.participant.into());
    set("Activity", record.activity.clone().into());
    set("HR_mad_filtered", record.hr_mad_filtered.into());
    set("HRV", record.hrv.into());
    set("stress_xs", record.stress.into());
    set("satisfaction_journey_xs", record.satisfaction_journey.into());
    set("Event_Delay_xs", record.event_delay.into());
    set("Event_Disturbing_people_xs", record.event_disturbing_people.into());
    set("Event_Negative_Driving_xs", record.event_negative_driving.into());
    set("Event_Infrastructure_xs", record.event_infrastructure.into());
    set(
        "Event_Positive_Interaction_xs",
        record.event_positive_interaction.into(),
    );
    set(
        "Event_Media_Entertainment_xs",
        record.event_media_entertainment.into(),
    );
    set("Event_Reached_xs", record.event_reached.into());
    set("Event_Discomfort_xs", record.event_discomfort.into());
    set("Event_Comfortable_xs", record.event_comfortable.into());
    set("Event_Beautiful_xs", record.event_beautiful.into());
    set("emotion_open_xs", record.emotion_open.clone().into());
    set("Event_Free_xs", record.event_free.clone().into());
    set("Mode_keepmoving", record.mode_keepmoving.clone().into());
    set("ModeButton_xs", record.mode_button.clone().into());

    if let Some(colour) = extras.colour {
        set("colour", colour.into());
    }
    if let Some(distance) = extras.accumulated_distance {
        set("accumulated_distance", distance.into());
    }

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![
            record.longitude,
            record.latitude,
        ]))),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

/// Annotates the feature's geometry with a `distance` member in meters
/// (step distance from the previously emitted point).
pub fn set_point_distance(feature: &mut Feature, meters: f64) {
    if let Some(geometry) = feature.geometry.as_mut() {
        geometry
            .foreign_members
            .get_or_insert_with(JsonObject::new)
            .insert("distance".to_string(), meters.into());
    }
}
