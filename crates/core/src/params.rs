//! Helpers for reading parameter overrides from a `serde_json::Value` object.
//!
//! A missing key or a value of the wrong JSON type yields the preset default,
//! so overrides never fail; range checks happen afterwards in
//! [`ParticleFieldParameters::validate`](crate::config::ParticleFieldParameters::validate).

use crate::color::Srgb;
use serde_json::Value;

/// Numeric override; integers are widened.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a `usize` from `params[name]`, returning `default` if missing,
/// negative, fractional, or of the wrong type.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// Extracts a hex color from `params[name]`, returning `default` if missing,
/// not a string, or not a valid `#rrggbb` value.
pub fn param_color(params: &Value, name: &str, default: Srgb) -> Srgb {
    params
        .get(name)
        .and_then(Value::as_str)
        .and_then(|hex| Srgb::from_hex(hex).ok())
        .unwrap_or(default)
}
