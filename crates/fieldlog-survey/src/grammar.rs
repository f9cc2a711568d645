//! The shore-survey document grammar.

use std::sync::Arc;

use fieldlog_format::{DocumentFormat, FieldFormatRegistry, FormatError, RecordFormat};
use fieldlog_io::GrammarRegistry;

use crate::records::record_types;

pub const GRAMMAR_NAME: &str = "Shore Survey Grammar 1.0";

/// Build the shore-survey document format.
///
/// Station, theodolite, reference, observer, and pod records are keyed by
/// their leading literal; fix and comment records carry their key in the
/// fourth token, after the observation number, date, and time.
pub fn document_format() -> Result<Arc<DocumentFormat>, FormatError> {
    let types = record_types()?;
    let registry = FieldFormatRegistry::default();

    let specs = [
        (
            &types.station,
            "Station* {id} {name} Lat {latitude_degrees} {latitude_minutes} \
             Lon {longitude_degrees} {longitude_minutes} El {elevation} \
             MagDec {magnetic_declination}",
        ),
        (
            &types.theodolite,
            "Theodolite* {id} {name} AzOffset {azimuth_offset} DecOffset {declination_offset}",
        ),
        (&types.reference, "Reference* {id} {name} Azimuth {azimuth}"),
        (&types.observer, "Observer* {initials} {name}"),
        (
            &types.pod,
            "Pod* {id} Whales {num_whales} Calves {num_calves} Singers {num_singers}",
        ),
        (
            &types.fix,
            "{observation_num:05} {date} {time} Fix* Dec {declination} Az {azimuth} \
             {object_type} {object_id} State {behavioral_state}",
        ),
        (
            &types.comment,
            "{observation_num:05} {date} {time} Comment* {id} {text}",
        ),
    ];

    let mut formats = Vec::with_capacity(specs.len());
    for (record_type, spec) in specs {
        formats.push(RecordFormat::from_spec(spec, record_type, &registry)?);
    }

    Ok(Arc::new(DocumentFormat::new(GRAMMAR_NAME, formats)?))
}

/// Register every survey grammar with a file-reading registry.
pub fn register_grammars(registry: &mut GrammarRegistry) -> Result<(), FormatError> {
    registry.register(document_format()?);
    Ok(())
}
