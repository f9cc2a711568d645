//! The shore-survey record types.
//!
//! `Fix` and `Comment` compose a shared sighting layer (observation number,
//! date, time) with their own fields; the remaining types are single-layer.

use std::sync::Arc;

use fieldlog_model::{DefaultRule, ModelError, RecordType, Schema, Value};

use crate::fields;

pub struct SurveyTypes {
    pub station: Arc<RecordType>,
    pub theodolite: Arc<RecordType>,
    pub reference: Arc<RecordType>,
    pub observer: Arc<RecordType>,
    pub pod: Arc<RecordType>,
    pub fix: Arc<RecordType>,
    pub comment: Arc<RecordType>,
}

pub fn record_types() -> Result<SurveyTypes, ModelError> {
    let sighting = Schema::new([
        ("observation_num", fields::observation_num()?),
        ("date", fields::date()?),
        ("time", fields::time()?),
    ]);

    let station = Schema::new([
        ("id", fields::id()?),
        ("name", fields::name()?),
        ("latitude_degrees", fields::degrees()?),
        ("latitude_minutes", fields::coordinate_minutes()?),
        ("longitude_degrees", fields::degrees()?),
        ("longitude_minutes", fields::coordinate_minutes()?),
        ("elevation", fields::elevation()?),
        ("magnetic_declination", fields::angle_offset()?),
    ]);

    let theodolite = Schema::new([
        ("id", fields::id()?),
        ("name", fields::name()?),
        ("azimuth_offset", fields::angle_offset()?),
        ("declination_offset", fields::angle_offset()?),
    ]);

    let reference = Schema::new([
        ("id", fields::id()?),
        ("name", fields::name()?),
        ("azimuth", fields::azimuth()?),
    ]);

    let observer = Schema::new([
        ("initials", fields::initials()?),
        ("name", fields::name()?),
    ]);

    let pod = Schema::new([
        ("id", fields::id()?),
        ("num_whales", fields::count()?),
        ("num_calves", fields::count()?),
        ("num_singers", fields::count()?),
    ]);

    // Most fixes sight pods, so an unset object type defaults to Pod.
    let fix = Schema::new([
        ("declination", fields::declination()?),
        ("azimuth", fields::azimuth()?),
        ("object_type", fields::object_type()?),
        ("object_id", fields::id()?),
        ("behavioral_state", fields::behavioral_state()?),
    ])
    .with_defaults([DefaultRule::Constant {
        field: "object_type".to_string(),
        value: Value::Str("Pod".to_string()),
    }]);

    let comment = Schema::new([("id", fields::id()?), ("text", fields::text()?)]);

    Ok(SurveyTypes {
        station: Arc::new(RecordType::compose("Station", &[&station])?),
        theodolite: Arc::new(RecordType::compose("Theodolite", &[&theodolite])?),
        reference: Arc::new(RecordType::compose("Reference", &[&reference])?),
        observer: Arc::new(RecordType::compose("Observer", &[&observer])?),
        pod: Arc::new(RecordType::compose("Pod", &[&pod])?),
        fix: Arc::new(RecordType::compose("Fix", &[&sighting, &fix])?),
        comment: Arc::new(RecordType::compose("Comment", &[&sighting, &comment])?),
    })
}
