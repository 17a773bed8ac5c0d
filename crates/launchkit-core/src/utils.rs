//! Weekday and number normalization helpers.

use serde_json::Value as Json;

use crate::error::{LaunchctlError, Result};

/// Day-of-week names mapped to launchd's ordinals.
const WEEKDAYS: [(&str, i64); 7] = [
    ("sunday", 0),
    ("monday", 1),
    ("tuesday", 2),
    ("wednesday", 3),
    ("thursday", 4),
    ("friday", 5),
    ("saturday", 6),
];

/// Normalize a weekday given either as an English day name or as an integer.
///
/// Names are matched case-insensitively. Integers are returned unchanged with
/// no range check, so `7` (which launchd also reads as Sunday) passes through.
pub fn normalize_weekday(input: &Json) -> Result<i64> {
    match input {
        Json::String(name) => {
            let lower = name.to_lowercase();
            WEEKDAYS
                .iter()
                .find(|(day, _)| *day == lower)
                .map(|(_, ordinal)| *ordinal)
                .ok_or_else(|| LaunchctlError::InvalidWeekday(name.clone()))
        }
        Json::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(integral))
            .ok_or_else(|| LaunchctlError::InvalidWeekday(n.to_string())),
        other => Err(LaunchctlError::InvalidWeekday(other.to_string())),
    }
}

/// Coerce `input` to a number.
///
/// Numbers pass through, booleans become `0`/`1`, and strings are trimmed and
/// parsed. Everything else (including empty strings, arrays and objects)
/// yields `None`. A valid zero is `Some(0.0)`.
pub fn to_number(input: &Json) -> Option<f64> {
    let n = match input {
        Json::Number(n) => n.as_f64()?,
        Json::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Json::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Whether `input` is "empty" as a document: arrays and scalars always are,
/// objects are when they have no keys.
pub fn is_empty_document(input: &Json) -> bool {
    match input {
        Json::Object(map) => map.is_empty(),
        _ => true,
    }
}

/// `Some(n as i64)` when `n` is a finite whole number in range.
pub(crate) fn integral(n: f64) -> Option<i64> {
    if n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Some(n as i64)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "utils_tests.rs"]
mod tests;
