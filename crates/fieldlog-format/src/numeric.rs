//! Numeric formatting templates for integer and float field formats.
//!
//! A template is the `extra` text of a `{field:extra}` placeholder: `05`
//! zero-pads an integer to five digits; `.3f` renders a float with three
//! fixed fraction digits; `.16g` renders sixteen significant digits with
//! trailing zeros removed (the float default).

use crate::error::FormatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IntTemplate {
    Plain,
    ZeroPad(usize),
}

impl IntTemplate {
    pub(crate) fn parse(template: &str) -> Result<IntTemplate, FormatError> {
        let body = template.strip_suffix('d').unwrap_or(template);
        if body.is_empty() {
            return Ok(IntTemplate::Plain);
        }
        if body.starts_with('0') && body.bytes().all(|b| b.is_ascii_digit()) {
            let width = body.parse().map_err(|_| bad(template))?;
            return Ok(IntTemplate::ZeroPad(width));
        }
        Err(bad(template))
    }

    pub(crate) fn format(&self, v: i64) -> String {
        match *self {
            IntTemplate::Plain => v.to_string(),
            IntTemplate::ZeroPad(width) => format!("{v:0width$}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FloatTemplate {
    /// Significant digits, trailing zeros removed.
    General(usize),
    /// Fixed fraction digits.
    Fixed(usize),
}

impl FloatTemplate {
    pub(crate) fn parse(template: &str) -> Result<FloatTemplate, FormatError> {
        let body = template.strip_prefix('.').ok_or_else(|| bad(template))?;
        let (digits, fixed) = match body.strip_suffix('f') {
            Some(digits) => (digits, true),
            None => (body.strip_suffix('g').unwrap_or(body), false),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad(template));
        }
        let precision = digits.parse().map_err(|_| bad(template))?;
        if fixed {
            Ok(FloatTemplate::Fixed(precision))
        } else {
            Ok(FloatTemplate::General(precision))
        }
    }

    pub(crate) fn format(&self, v: f64) -> String {
        match *self {
            FloatTemplate::Fixed(precision) => format!("{v:.precision$}"),
            FloatTemplate::General(precision) => format_general(v, precision),
        }
    }
}

impl Default for FloatTemplate {
    fn default() -> Self {
        FloatTemplate::General(16)
    }
}

fn bad(template: &str) -> FormatError {
    FormatError::BadTemplate {
        template: template.to_string(),
    }
}

/// Render `v` with `precision` significant digits, choosing fixed or
/// scientific notation and stripping trailing zeros.
pub(crate) fn format_general(v: f64, precision: usize) -> String {
    let precision = precision.max(1);
    if !v.is_finite() {
        return v.to_string();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let exp_form = format!("{:.*e}", precision - 1, v);
    let Some((mantissa, exponent)) = exp_form.split_once('e') else {
        return exp_form;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return exp_form;
    };

    if exponent >= -4 && (exponent as i64) < precision as i64 {
        let fraction = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_trailing_zeros(format!("{v:.fraction$}"))
    } else {
        let mantissa = trim_trailing_zeros(mantissa.to_string());
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}

fn trim_trailing_zeros(s: String) -> String {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
