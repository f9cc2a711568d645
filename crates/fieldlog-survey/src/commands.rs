//! Survey commands: one-letter entries that expand into full records.

use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveTime};
use fieldlog_command::{CommandError, CommandInterpreter, CommandSpec};
use fieldlog_format::DocumentFormat;
use fieldlog_model::{DefaultRule, Value};

use crate::serial::SharedSerial;

/// Supplies the observation date and time for records entered by command.
pub type Clock = Arc<dyn Fn() -> (NaiveDate, NaiveTime) + Send + Sync>;

/// The wall clock, in local time.
pub fn local_clock() -> Clock {
    Arc::new(|| {
        let now = Local::now().naive_local();
        (now.date(), now.time())
    })
}

/// The standard survey command set.
///
/// `f` records a theodolite fix, `c` a comment, `p` a pod description. Fix
/// and comment numbering comes lazily from the shared serial generator, and
/// the date and time from the clock, so a command line only carries what the
/// observer actually typed.
pub fn command_specs(serial: &SharedSerial, clock: &Clock) -> Vec<CommandSpec> {
    let sighting_defaults = |serial: SharedSerial, clock: Clock| DefaultRule::JointProvider {
        fields: vec![
            "observation_num".to_string(),
            "date".to_string(),
            "time".to_string(),
        ],
        provider: Arc::new(move || {
            let number = serial.lock().map(|mut s| s.next_number()).unwrap_or(0);
            let (date, time) = clock();
            vec![Value::Int(number), Value::Date(date), Value::Time(time)]
        }),
    };

    vec![
        CommandSpec::new("f azimuth declination object_type object_id", "Fix")
            .with_defaults([sighting_defaults(Arc::clone(serial), Arc::clone(clock))]),
        CommandSpec::new("c text", "Comment").with_defaults([
            sighting_defaults(Arc::clone(serial), Arc::clone(clock)),
            DefaultRule::Constant {
                field: "id".to_string(),
                value: Value::Int(0),
            },
        ]),
        CommandSpec::new("p id num_whales num_calves num_singers", "Pod"),
    ]
}

/// Build the survey command interpreter against a document format.
pub fn interpreter(
    document_format: &DocumentFormat,
    serial: &SharedSerial,
    clock: &Clock,
) -> Result<CommandInterpreter, CommandError> {
    CommandInterpreter::new(document_format, command_specs(serial, clock))
}
