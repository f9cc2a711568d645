//! Per-field-type codecs between values and token text.
//!
//! Every codec supports two rendering modes. Display mode is what documents
//! persist: strings are escaped and quoted when they need it and a null
//! value renders as the `""` token. Editing mode is what text-entry UIs see:
//! strings are raw and a null value renders as the empty string. The two
//! modes have distinct null tokens, and each mode round-trips its own output.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use fieldlog_model::Value;

use crate::error::FormatError;
use crate::numeric::{FloatTemplate, IntTemplate};
use crate::token::NONE_TOKEN;

/// The editing-mode token for a null field value.
pub const EDITING_NONE: &str = "";

/// Rendering mode for field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Persisted/display form: escaped strings, `""` for null.
    #[default]
    Display,
    /// Raw form for direct text entry: unescaped strings, `` for null.
    Editing,
}

impl Mode {
    fn none_token(self) -> &'static str {
        match self {
            Mode::Display => NONE_TOKEN,
            Mode::Editing => EDITING_NONE,
        }
    }
}

/// A value-to-token codec for one field type.
#[derive(Debug, Clone)]
pub enum FieldFormat {
    Str(StringFormat),
    Decimal(DecimalFormat),
    Integer(IntegerFormat),
    Float(FloatFormat),
    Angle(AngleFormat),
    Date(DateFormat),
    Time(TimeFormat),
}

impl FieldFormat {
    pub fn format(&self, value: Option<&Value>, mode: Mode) -> String {
        match self {
            FieldFormat::Str(f) => f.format(value, mode),
            FieldFormat::Decimal(f) => f.format(value, mode),
            FieldFormat::Integer(f) => f.format(value, mode),
            FieldFormat::Float(f) => f.format(value, mode),
            FieldFormat::Angle(f) => f.format(value, mode),
            FieldFormat::Date(f) => f.format(value, mode),
            FieldFormat::Time(f) => f.format(value, mode),
        }
    }

    pub fn parse(&self, token: &str, mode: Mode) -> Result<Option<Value>, FormatError> {
        match self {
            FieldFormat::Str(f) => Ok(f.parse(token, mode)),
            FieldFormat::Decimal(f) => f.parse(token, mode),
            FieldFormat::Integer(f) => f.parse(token, mode),
            FieldFormat::Float(f) => f.parse(token, mode),
            FieldFormat::Angle(f) => f.parse(token, mode),
            FieldFormat::Date(f) => f.parse(token, mode),
            FieldFormat::Time(f) => f.parse(token, mode),
        }
    }

    /// Short text describing the expected entry form, for UI prompts.
    pub fn hint(&self) -> &'static str {
        match self {
            FieldFormat::Str(_) => "string",
            FieldFormat::Decimal(_) => "decimal",
            FieldFormat::Integer(_) => "integer",
            FieldFormat::Float(_) => "float",
            FieldFormat::Angle(_) => "ddd:mm:ss",
            FieldFormat::Date(_) => "m/d/yy",
            FieldFormat::Time(_) => "h:mm:ss",
        }
    }
}

fn is_none_token(token: &str, mode: Mode) -> bool {
    token == mode.none_token()
}

/// String codec. Display mode quotes and escapes when the value contains
/// whitespace, a backslash, or a quote, and renders the empty string as
/// `""`; editing mode passes the raw text through.
#[derive(Debug, Clone, Default)]
pub struct StringFormat;

impl StringFormat {
    pub fn format(&self, value: Option<&Value>, mode: Mode) -> String {
        let Some(value) = value else {
            return mode.none_token().to_string();
        };
        let s = match value {
            Value::Str(s) => s.clone(),
            other => other.to_string(),
        };
        match mode {
            Mode::Editing => s,
            Mode::Display => {
                if s.is_empty() {
                    "\"\"".to_string()
                } else if s.chars().any(|c| c.is_whitespace() || c == '\\' || c == '"') {
                    format!("\"{}\"", escape(&s))
                } else {
                    s
                }
            }
        }
    }

    pub fn parse(&self, token: &str, mode: Mode) -> Option<Value> {
        match mode {
            Mode::Editing => {
                if token == EDITING_NONE {
                    None
                } else {
                    Some(Value::Str(token.to_string()))
                }
            }
            Mode::Display => {
                if token == NONE_TOKEN {
                    None
                } else if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
                    // Content was checked during tokenization.
                    Some(Value::Str(unescape(&token[1..token.len() - 1])))
                } else {
                    Some(Value::Str(token.to_string()))
                }
            }
        }
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(s: &str) -> String {
    s.replace("\\\\", "\\").replace("\\\"", "\"")
}

/// Decimal codec: a verbatim passthrough of the decimal-literal text.
#[derive(Debug, Clone, Default)]
pub struct DecimalFormat;

impl DecimalFormat {
    pub fn format(&self, value: Option<&Value>, mode: Mode) -> String {
        match value {
            None => mode.none_token().to_string(),
            Some(Value::Decimal(s) | Value::Str(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn parse(&self, token: &str, mode: Mode) -> Result<Option<Value>, FormatError> {
        if is_none_token(token, mode) {
            return Ok(None);
        }
        if fieldlog_model::is_decimal_literal(token) {
            Ok(Some(Value::Decimal(token.to_string())))
        } else {
            Err(FormatError::BadDecimal {
                text: token.to_string(),
            })
        }
    }
}

#[derive(Debug, Clone)]
pub struct IntegerFormat {
    template: IntTemplate,
}

impl IntegerFormat {
    pub fn new(template: Option<&str>) -> Result<IntegerFormat, FormatError> {
        let template = match template {
            Some(template) => IntTemplate::parse(template)?,
            None => IntTemplate::Plain,
        };
        Ok(IntegerFormat { template })
    }

    pub fn format(&self, value: Option<&Value>, mode: Mode) -> String {
        match value {
            None => mode.none_token().to_string(),
            Some(value) => match value.as_int() {
                Some(i) => self.template.format(i),
                None => value.to_string(),
            },
        }
    }

    pub fn parse(&self, token: &str, mode: Mode) -> Result<Option<Value>, FormatError> {
        if is_none_token(token, mode) {
            return Ok(None);
        }
        token
            .parse::<i64>()
            .map(|i| Some(Value::Int(i)))
            .map_err(|_| FormatError::BadInteger {
                text: token.to_string(),
            })
    }
}

#[derive(Debug, Clone)]
pub struct FloatFormat {
    template: FloatTemplate,
}

impl FloatFormat {
    pub fn new(template: Option<&str>) -> Result<FloatFormat, FormatError> {
        let template = match template {
            Some(template) => FloatTemplate::parse(template)?,
            None => FloatTemplate::default(),
        };
        Ok(FloatFormat { template })
    }

    pub fn format(&self, value: Option<&Value>, mode: Mode) -> String {
        match value {
            None => mode.none_token().to_string(),
            Some(value) => match value.as_float() {
                Some(v) => self.template.format(v),
                None => value.to_string(),
            },
        }
    }

    pub fn parse(&self, token: &str, mode: Mode) -> Result<Option<Value>, FormatError> {
        if is_none_token(token, mode) {
            return Ok(None);
        }
        token
            .parse::<f64>()
            .map(|v| Some(Value::Float(v)))
            .map_err(|_| FormatError::BadFloat {
                text: token.to_string(),
            })
    }
}

/// Sexagesimal degrees codec for float fields: `[-]D:MM:SS`, seconds rounded
/// to the nearest integer with carry into minutes and degrees, so `:60`
/// never appears.
#[derive(Debug, Clone, Default)]
pub struct AngleFormat;

impl AngleFormat {
    pub fn format(&self, value: Option<&Value>, mode: Mode) -> String {
        let Some(value) = value else {
            return mode.none_token().to_string();
        };
        let Some(v) = value.as_float() else {
            return value.to_string();
        };
        let (sign, v) = if v < 0.0 { ("-", -v) } else { ("", v) };
        let total_seconds = (3600.0 * v).round() as i64;
        let seconds = total_seconds % 60;
        let total_minutes = total_seconds / 60;
        let minutes = total_minutes % 60;
        let degrees = total_minutes / 60;
        format!("{sign}{degrees}:{minutes:02}:{seconds:02}")
    }

    pub fn parse(&self, token: &str, mode: Mode) -> Result<Option<Value>, FormatError> {
        if is_none_token(token, mode) {
            return Ok(None);
        }
        let bad = || FormatError::BadAngle {
            text: token.to_string(),
        };
        let (negative, rest) = match token.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, token),
        };
        let mut parts = rest.split(':');
        let degrees = digits(parts.next(), 1, 3).ok_or_else(bad)?;
        let minutes = digits(parts.next(), 2, 2).ok_or_else(bad)?;
        let seconds = digits(parts.next(), 2, 2).ok_or_else(bad)?;
        if parts.next().is_some() {
            return Err(bad());
        }
        let mut v = degrees as f64 + minutes as f64 / 60.0 + seconds as f64 / 3600.0;
        if negative {
            v = -v;
        }
        Ok(Some(Value::Float(v)))
    }
}

/// Parse a component of `min..=max` ASCII digits.
fn digits(part: Option<&str>, min: usize, max: usize) -> Option<u32> {
    let part = part?;
    if part.len() < min || part.len() > max || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Date codec: `M/D/YY` with unpadded month and day and a two-digit year.
/// Parsing pivots two-digit years on 1970: `69` is 2069 and `70` is 1970.
#[derive(Debug, Clone, Default)]
pub struct DateFormat;

impl DateFormat {
    pub fn format(&self, value: Option<&Value>, mode: Mode) -> String {
        match value {
            None => mode.none_token().to_string(),
            Some(Value::Date(d)) => {
                format!("{}/{}/{:02}", d.month(), d.day(), d.year() % 100)
            }
            Some(other) => other.to_string(),
        }
    }

    pub fn parse(&self, token: &str, mode: Mode) -> Result<Option<Value>, FormatError> {
        if is_none_token(token, mode) {
            return Ok(None);
        }
        let bad = || FormatError::BadDate {
            text: token.to_string(),
        };
        let mut parts = token.split('/');
        let month = digits(parts.next(), 1, 2).ok_or_else(bad)?;
        let day = digits(parts.next(), 1, 2).ok_or_else(bad)?;
        let year = digits(parts.next(), 2, 2).ok_or_else(bad)?;
        if parts.next().is_some() {
            return Err(bad());
        }

        let year = year as i32 + if year < 70 { 2000 } else { 1900 };
        if month == 0 || month > 12 {
            return Err(FormatError::BadMonth);
        }
        let days = days_in_month(year, month);
        if day == 0 || day > days {
            return Err(FormatError::BadDay { year, month, days });
        }
        NaiveDate::from_ymd_opt(year, month, day)
            .map(|d| Some(Value::Date(d)))
            .ok_or_else(bad)
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
            if leap { 29 } else { 28 }
        }
    }
}

/// Time codec: `H:MM:SS` with an unpadded hour.
#[derive(Debug, Clone, Default)]
pub struct TimeFormat;

impl TimeFormat {
    pub fn format(&self, value: Option<&Value>, mode: Mode) -> String {
        match value {
            None => mode.none_token().to_string(),
            Some(Value::Time(t)) => {
                format!("{}:{:02}:{:02}", t.hour(), t.minute(), t.second())
            }
            Some(other) => other.to_string(),
        }
    }

    pub fn parse(&self, token: &str, mode: Mode) -> Result<Option<Value>, FormatError> {
        if is_none_token(token, mode) {
            return Ok(None);
        }
        let bad = || FormatError::BadTime {
            text: token.to_string(),
        };
        let mut parts = token.split(':');
        let hour = digits(parts.next(), 1, 2).ok_or_else(bad)?;
        let minute = digits(parts.next(), 2, 2).ok_or_else(bad)?;
        let second = digits(parts.next(), 2, 2).ok_or_else(bad)?;
        if parts.next().is_some() {
            return Err(bad());
        }
        if hour > 23 {
            return Err(FormatError::BadHour);
        }
        if minute > 59 {
            return Err(FormatError::BadMinute);
        }
        if second > 59 {
            return Err(FormatError::BadSecond);
        }
        NaiveTime::from_hms_opt(hour, minute, second)
            .map(|t| Some(Value::Time(t)))
            .ok_or_else(bad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_round_trip(format: &FieldFormat, value: Value, display: &str) {
        for mode in [Mode::Display, Mode::Editing] {
            assert_eq!(format.format(Some(&value), mode), display, "{value:?}");
            assert_eq!(
                format.parse(display, mode).expect("parse"),
                Some(value.clone()),
                "{display}"
            );
        }
    }

    fn assert_none_round_trip(format: &FieldFormat) {
        assert_eq!(format.format(None, Mode::Display), NONE_TOKEN);
        assert_eq!(format.format(None, Mode::Editing), EDITING_NONE);
        assert_eq!(format.parse(NONE_TOKEN, Mode::Display).expect("parse"), None);
        assert_eq!(format.parse(EDITING_NONE, Mode::Editing).expect("parse"), None);
        // The null token of the other mode does not parse as null.
        assert!(matches!(
            format.parse(EDITING_NONE, Mode::Display),
            Err(_) | Ok(Some(_))
        ));
    }

    fn str_value(s: &str) -> Value {
        Value::Str(s.to_string())
    }

    #[test]
    fn string_display_escaping() {
        let f = FieldFormat::Str(StringFormat);
        let cases = [
            ("Hello", "Hello"),
            ("Hello, world!", "\"Hello, world!\""),
            ("\\", "\"\\\\\""),
            ("\"", "\"\\\"\""),
            ("\\\"", "\"\\\\\\\"\""),
            ("\"\\", "\"\\\"\\\\\""),
            ("\"\"", "\"\\\"\\\"\""),
            ("\"Hello \\ World!\"", "\"\\\"Hello \\\\ World!\\\"\""),
        ];
        for (raw, displayed) in cases {
            assert_eq!(f.format(Some(&str_value(raw)), Mode::Display), displayed);
            assert_eq!(
                f.parse(displayed, Mode::Display).expect("parse"),
                Some(str_value(raw))
            );
            // Editing mode passes raw text through unchanged.
            assert_eq!(f.format(Some(&str_value(raw)), Mode::Editing), raw);
            assert_eq!(
                f.parse(raw, Mode::Editing).expect("parse"),
                Some(str_value(raw))
            );
        }
        // An unquoted value still parses if quotes were added by hand.
        assert_eq!(
            f.parse("\"Hello\"", Mode::Display).expect("parse"),
            Some(str_value("Hello"))
        );
        // The empty string displays as "" even though "" parses as null.
        assert_eq!(f.format(Some(&str_value("")), Mode::Display), "\"\"");
        assert_eq!(f.parse(NONE_TOKEN, Mode::Display).expect("parse"), None);
        assert_eq!(f.format(None, Mode::Display), NONE_TOKEN);
        assert_eq!(f.format(None, Mode::Editing), EDITING_NONE);
        assert_eq!(f.parse(EDITING_NONE, Mode::Editing).expect("parse"), None);
    }

    #[test]
    fn decimal_passthrough() {
        let f = FieldFormat::Decimal(DecimalFormat);
        for text in ["0", "-0", "12", "-123", "0.", "12.", "1.2", "-1.2", ".1", "-.1"] {
            assert_round_trip(&f, Value::Decimal(text.to_string()), text);
        }
        assert_none_round_trip(&f);
        for text in ["bobo", "--1", "1-2", "10:20:30", "10-", "..1", "1.."] {
            assert!(f.parse(text, Mode::Display).is_err(), "{text}");
            assert!(f.parse(text, Mode::Editing).is_err(), "{text}");
        }
    }

    #[test]
    fn integer_format_and_parse() {
        let f = FieldFormat::Integer(IntegerFormat::new(None).expect("format"));
        for (value, text) in [(0, "0"), (12, "12"), (-123, "-123")] {
            assert_round_trip(&f, Value::Int(value), text);
        }
        assert_none_round_trip(&f);
        assert_eq!(
            f.parse("-0", Mode::Display).expect("parse"),
            Some(Value::Int(0))
        );
        for text in ["bobo", "1.2", "--1", "1-2", "10:20:30"] {
            assert!(f.parse(text, Mode::Display).is_err(), "{text}");
        }

        let padded = FieldFormat::Integer(IntegerFormat::new(Some("05")).expect("format"));
        assert_eq!(padded.format(Some(&Value::Int(12)), Mode::Display), "00012");
        assert!(IntegerFormat::new(Some("no")).is_err());
    }

    #[test]
    fn float_format_and_parse() {
        let f = FieldFormat::Float(FloatFormat::new(None).expect("format"));
        for (value, text) in [
            (0.0, "0"),
            (12.0, "12"),
            (-123.0, "-123"),
            (0.1, "0.1"),
            (1.2, "1.2"),
            (-0.1, "-0.1"),
            (1.23456, "1.23456"),
            (1.234567891234567, "1.234567891234567"),
        ] {
            assert_round_trip(&f, Value::Float(value), text);
        }
        assert_none_round_trip(&f);
        assert_eq!(
            f.parse(".1", Mode::Display).expect("parse"),
            Some(Value::Float(0.1))
        );
        for text in ["bobo", "1.2.3", "--1", "1-2", "10:20:30"] {
            assert!(f.parse(text, Mode::Display).is_err(), "{text}");
        }

        let fixed = FieldFormat::Float(FloatFormat::new(Some(".5f")).expect("format"));
        assert_eq!(
            fixed.format(Some(&Value::Float(1.23456789)), Mode::Display),
            "1.23457"
        );
        assert!(FloatFormat::new(Some("nope")).is_err());
    }

    #[test]
    fn angle_format_and_parse() {
        let f = FieldFormat::Angle(AngleFormat);
        for (value, text) in [
            (0.0, "0:00:00"),
            (1.0, "1:00:00"),
            (1.25, "1:15:00"),
            (1.0 + 30.0 / 3600.0, "1:00:30"),
            (1.0 + 15.0 / 60.0 + 30.0 / 3600.0, "1:15:30"),
            (90.0, "90:00:00"),
            (360.0, "360:00:00"),
            (-1.5, "-1:30:00"),
        ] {
            assert_round_trip(&f, Value::Float(value), text);
        }
        assert_none_round_trip(&f);
        // Rounded fractional degrees.
        assert_eq!(f.format(Some(&Value::Float(1.0083)), Mode::Display), "1:00:30");
        assert_eq!(f.format(Some(&Value::Float(1.2583)), Mode::Display), "1:15:30");
        for text in ["bobo", "1.2.3", "--1", "1-2", "1.2", "10", "10:20", "10:20:30:40"] {
            assert!(f.parse(text, Mode::Display).is_err(), "{text}");
        }
    }

    #[test]
    fn angle_seconds_never_reach_sixty() {
        let f = FieldFormat::Angle(AngleFormat);
        // 0.016666... degrees is 59.99999... seconds; rounding must carry
        // into the minutes field instead of emitting 0:00:60.
        assert_eq!(
            f.format(Some(&Value::Float(0.01666666666)), Mode::Display),
            "0:01:00"
        );
    }

    #[test]
    fn date_format_and_parse() {
        let f = FieldFormat::Date(DateFormat);
        let date = |y, m, d| Value::Date(NaiveDate::from_ymd_opt(y, m, d).expect("date"));
        for (value, text) in [
            (date(1970, 1, 2), "1/2/70"),
            (date(2013, 1, 2), "1/2/13"),
            (date(2013, 10, 1), "10/1/13"),
            (date(2013, 1, 10), "1/10/13"),
            (date(2013, 10, 11), "10/11/13"),
            (date(1970, 1, 1), "1/1/70"),
            (date(2069, 12, 31), "12/31/69"),
            (date(2005, 3, 4), "3/4/05"),
        ] {
            assert_round_trip(&f, value, text);
        }
        assert_none_round_trip(&f);
        for text in [
            "bobo", "1", "1/2", "1/2/3/4", "1:23:45", "0/1/13", "13/1/13", "1/0/13", "1/32/13",
            "2/30/12", "1/2/12345",
        ] {
            assert!(f.parse(text, Mode::Display).is_err(), "{text}");
        }
        // 2012 is a leap year, 2013 is not.
        assert!(f.parse("2/29/12", Mode::Display).is_ok());
        assert!(f.parse("2/29/13", Mode::Display).is_err());
    }

    #[test]
    fn time_format_and_parse() {
        let f = FieldFormat::Time(TimeFormat);
        let time = |h, m, s| Value::Time(NaiveTime::from_hms_opt(h, m, s).expect("time"));
        for (value, text) in [
            (time(0, 0, 0), "0:00:00"),
            (time(23, 59, 59), "23:59:59"),
            (time(1, 23, 45), "1:23:45"),
        ] {
            assert_round_trip(&f, value, text);
        }
        assert_none_round_trip(&f);
        for text in [
            "bobo", "1", "1:2", "1:2:3:4", "1/23/45", "-1:00:00", "0:-1:00", "0:00:-1", "0:0:00",
            "0:00:0", "000:00:00", "0:000:00", "0:00:000", "24:00:00", "0:60:00", "0:00:60",
        ] {
            assert!(f.parse(text, Mode::Display).is_err(), "{text}");
        }
    }
}
