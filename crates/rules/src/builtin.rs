//! Built-in predicates.
//!
//! Every rule except `required` passes empty-like values (null, `""`, empty
//! bytes, empty map or sequence) so optional fields only fail when present.
//! `kind` is stricter: only null and `""` pass, an empty container must
//! still be of the expected kind.
//! Malformed arguments are hard errors, not validation failures.

use fieldguard_core::{Scalar, Value};

use crate::error::PredicateError;

type BuiltinFn = fn(&str, &Value, Option<&str>) -> Result<bool, PredicateError>;

/// Name → predicate for every built-in rule.
pub(crate) const BUILTINS: &[(&str, BuiltinFn)] = &[
    ("required", required),
    ("kind", kind),
    ("string", string),
    ("numeric", numeric),
    ("bool", boolean),
    ("min", min),
    ("max", max),
    ("len", len),
    ("min_len", min_len),
    ("max_len", max_len),
    ("between", between),
    ("in", one_of),
    ("not_in", not_one_of),
    ("alpha", alpha),
    ("alpha_num", alpha_num),
    ("email", email),
    ("url", url),
];

// ── Argument helpers ────────────────────────────────────────────────

fn require_arg(arg: Option<&str>) -> Result<&str, PredicateError> {
    match arg.map(str::trim) {
        Some(a) if !a.is_empty() => Ok(a),
        _ => Err(PredicateError::MissingArgument),
    }
}

fn number_arg(arg: Option<&str>) -> Result<f64, PredicateError> {
    let raw = require_arg(arg)?;
    raw.parse::<f64>()
        .map_err(|_| PredicateError::invalid(raw, "expected a number"))
}

fn length_arg(arg: Option<&str>) -> Result<usize, PredicateError> {
    let raw = require_arg(arg)?;
    raw.parse::<usize>()
        .map_err(|_| PredicateError::invalid(raw, "expected a non-negative integer"))
}

fn range_arg(arg: Option<&str>) -> Result<(f64, f64), PredicateError> {
    let raw = require_arg(arg)?;
    let (lo, hi) = raw
        .split_once(',')
        .ok_or_else(|| PredicateError::invalid(raw, "expected 'min,max'"))?;
    let lo: f64 = lo
        .trim()
        .parse()
        .map_err(|_| PredicateError::invalid(raw, "lower bound is not a number"))?;
    let hi: f64 = hi
        .trim()
        .parse()
        .map_err(|_| PredicateError::invalid(raw, "upper bound is not a number"))?;
    if lo > hi {
        return Err(PredicateError::invalid(raw, "lower bound exceeds upper bound"));
    }
    Ok((lo, hi))
}

fn list_arg(arg: Option<&str>) -> Result<Vec<&str>, PredicateError> {
    Ok(require_arg(arg)?.split(',').map(str::trim).collect())
}

/// The quantity `min`/`max`/`between` compare: the number itself for
/// numeric scalars, otherwise the length.
fn measure(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.length().map(|n| n as f64))
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::Scalar(Scalar::Bytes(_) | Scalar::Null) => None,
        Value::Scalar(s) => Some(s.to_string()),
        _ => None,
    }
}

// ── Presence and type ───────────────────────────────────────────────

fn required(_path: &str, value: &Value, _arg: Option<&str>) -> Result<bool, PredicateError> {
    Ok(!value.is_empty_like())
}

fn kind(_path: &str, value: &Value, arg: Option<&str>) -> Result<bool, PredicateError> {
    let expected = require_arg(arg)?;
    let ok = match expected {
        "string" => matches!(value, Value::Scalar(Scalar::String(_))),
        "int" => match value {
            Value::Scalar(Scalar::Int(_)) => true,
            Value::Scalar(Scalar::UInt(n)) => i64::try_from(*n).is_ok(),
            _ => false,
        },
        "uint" => match value {
            Value::Scalar(Scalar::UInt(_)) => true,
            Value::Scalar(Scalar::Int(n)) => *n >= 0,
            _ => false,
        },
        "float" => matches!(value, Value::Scalar(Scalar::Float(_))),
        "number" => value.as_f64().is_some(),
        "bool" => matches!(value, Value::Scalar(Scalar::Bool(_))),
        "bytes" => matches!(value, Value::Scalar(Scalar::Bytes(_))),
        "handle" => matches!(value, Value::Scalar(Scalar::Handle(_))),
        "null" => value.is_null(),
        "map" => matches!(value, Value::Map(_)),
        "sequence" => matches!(value, Value::Sequence(_)),
        "record" => matches!(value, Value::Record(_)),
        other => return Err(PredicateError::invalid(other, "unknown kind")),
    };
    Ok(ok || (expected != "null" && is_absent(value)))
}

/// Null and the empty string stand for "not supplied" in type checks.
/// Empty containers and empty bytes keep their kind.
fn is_absent(value: &Value) -> bool {
    match value {
        Value::Scalar(Scalar::Null) => true,
        Value::Scalar(Scalar::String(s)) => s.is_empty(),
        _ => false,
    }
}

fn string(_path: &str, value: &Value, _arg: Option<&str>) -> Result<bool, PredicateError> {
    Ok(value.is_empty_like() || matches!(value, Value::Scalar(Scalar::String(_))))
}

fn numeric(_path: &str, value: &Value, _arg: Option<&str>) -> Result<bool, PredicateError> {
    if value.is_empty_like() || value.as_f64().is_some() {
        return Ok(true);
    }
    Ok(value
        .as_str()
        .is_some_and(|s| s.trim().parse::<f64>().is_ok()))
}

fn boolean(_path: &str, value: &Value, _arg: Option<&str>) -> Result<bool, PredicateError> {
    Ok(value.is_empty_like() || matches!(value, Value::Scalar(Scalar::Bool(_))))
}

// ── Bounds ──────────────────────────────────────────────────────────

fn min(_path: &str, value: &Value, arg: Option<&str>) -> Result<bool, PredicateError> {
    let bound = number_arg(arg)?;
    if value.is_empty_like() {
        return Ok(true);
    }
    Ok(measure(value).is_some_and(|m| m >= bound))
}

fn max(_path: &str, value: &Value, arg: Option<&str>) -> Result<bool, PredicateError> {
    let bound = number_arg(arg)?;
    if value.is_empty_like() {
        return Ok(true);
    }
    Ok(measure(value).is_some_and(|m| m <= bound))
}

fn between(_path: &str, value: &Value, arg: Option<&str>) -> Result<bool, PredicateError> {
    let (lo, hi) = range_arg(arg)?;
    if value.is_empty_like() {
        return Ok(true);
    }
    Ok(measure(value).is_some_and(|m| m >= lo && m <= hi))
}

fn len(_path: &str, value: &Value, arg: Option<&str>) -> Result<bool, PredicateError> {
    let want = length_arg(arg)?;
    if value.is_empty_like() {
        return Ok(true);
    }
    Ok(value.length() == Some(want))
}

fn min_len(_path: &str, value: &Value, arg: Option<&str>) -> Result<bool, PredicateError> {
    let bound = length_arg(arg)?;
    if value.is_empty_like() {
        return Ok(true);
    }
    Ok(value.length().is_some_and(|n| n >= bound))
}

fn max_len(_path: &str, value: &Value, arg: Option<&str>) -> Result<bool, PredicateError> {
    let bound = length_arg(arg)?;
    if value.is_empty_like() {
        return Ok(true);
    }
    Ok(value.length().is_some_and(|n| n <= bound))
}

// ── Membership ──────────────────────────────────────────────────────

fn one_of(_path: &str, value: &Value, arg: Option<&str>) -> Result<bool, PredicateError> {
    let options = list_arg(arg)?;
    if value.is_empty_like() {
        return Ok(true);
    }
    Ok(text(value).is_some_and(|t| options.contains(&t.as_str())))
}

fn not_one_of(_path: &str, value: &Value, arg: Option<&str>) -> Result<bool, PredicateError> {
    let options = list_arg(arg)?;
    if value.is_empty_like() {
        return Ok(true);
    }
    Ok(text(value).map_or(true, |t| !options.contains(&t.as_str())))
}

// ── Formats ─────────────────────────────────────────────────────────

fn alpha(_path: &str, value: &Value, _arg: Option<&str>) -> Result<bool, PredicateError> {
    if value.is_empty_like() {
        return Ok(true);
    }
    Ok(value
        .as_str()
        .is_some_and(|s| s.chars().all(char::is_alphabetic)))
}

fn alpha_num(_path: &str, value: &Value, _arg: Option<&str>) -> Result<bool, PredicateError> {
    if value.is_empty_like() {
        return Ok(true);
    }
    Ok(value
        .as_str()
        .is_some_and(|s| s.chars().all(char::is_alphanumeric)))
}

fn email(_path: &str, value: &Value, _arg: Option<&str>) -> Result<bool, PredicateError> {
    if value.is_empty_like() {
        return Ok(true);
    }
    Ok(value.as_str().is_some_and(is_email))
}

fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !s.chars().any(char::is_whitespace)
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

fn url(_path: &str, value: &Value, _arg: Option<&str>) -> Result<bool, PredicateError> {
    if value.is_empty_like() {
        return Ok(true);
    }
    Ok(value.as_str().is_some_and(|s| {
        url::Url::parse(s).is_ok_and(|u| u.has_host() && matches!(u.scheme(), "http" | "https"))
    }))
}
