//! The field-type vocabulary of the shore-survey grammar.

use fieldlog_model::{FieldType, ModelError};

pub fn observation_num() -> Result<FieldType, ModelError> {
    FieldType::integer()
        .min(0)
        .doc("sequential observation number")
        .build()
}

pub fn date() -> Result<FieldType, ModelError> {
    FieldType::date().build()
}

pub fn time() -> Result<FieldType, ModelError> {
    FieldType::time().build()
}

/// Horizontal angle from true north, in `[0, 360)` degrees.
pub fn azimuth() -> Result<FieldType, ModelError> {
    FieldType::float()
        .category("angle")
        .units("degrees")
        .min(0.0)
        .max_exclusive(360.0)
        .build()
}

/// Vertical angle from the zenith. The theodolite reads past 90 degrees
/// when sighting below the horizon, so the range runs to 180.
pub fn declination() -> Result<FieldType, ModelError> {
    FieldType::float()
        .category("angle")
        .units("degrees")
        .min(0.0)
        .max(180.0)
        .build()
}

/// Signed instrument offset angle.
pub fn angle_offset() -> Result<FieldType, ModelError> {
    FieldType::float().category("angle").units("degrees").build()
}

pub fn object_type() -> Result<FieldType, ModelError> {
    FieldType::string()
        .values(["Pod", "Vessel", "Reference", "Buoy", "Other"])
        .translations([
            ("p", "Pod"),
            ("v", "Vessel"),
            ("r", "Reference"),
            ("b", "Buoy"),
        ])
        .build()
}

pub fn id() -> Result<FieldType, ModelError> {
    FieldType::integer().min(0).build()
}

pub fn count() -> Result<FieldType, ModelError> {
    FieldType::integer().min(0).default(0).build()
}

pub fn name() -> Result<FieldType, ModelError> {
    FieldType::string().build()
}

pub fn text() -> Result<FieldType, ModelError> {
    FieldType::string().build()
}

pub fn degrees() -> Result<FieldType, ModelError> {
    FieldType::integer().min(-180).max(180).build()
}

/// Coordinate minutes kept as decimal text, so survey positions echo with
/// the surveyor's original precision.
pub fn coordinate_minutes() -> Result<FieldType, ModelError> {
    FieldType::decimal()
        .min("0")
        .max_exclusive("60")
        .units("minutes")
        .build()
}

pub fn elevation() -> Result<FieldType, ModelError> {
    FieldType::decimal().units("meters").build()
}

pub fn behavioral_state() -> Result<FieldType, ModelError> {
    FieldType::string().build()
}

pub fn initials() -> Result<FieldType, ModelError> {
    FieldType::string().build()
}
