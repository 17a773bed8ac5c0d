//! `StartCalendarInterval` entries.

use serde::Serialize;
use serde_json::Value as Json;

use super::value::{Dictionary, Value};
use crate::error::{LaunchctlError, Result};
use crate::utils::{integral, is_empty_document, normalize_weekday, to_number};

/// One calendar trigger. An omitted field is a wildcard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CalendarInterval {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minute: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hour: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekday: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<i64>,
}

impl CalendarInterval {
    /// Validate a dynamic calendar interval.
    ///
    /// Unknown keys are ignored, but at least one of `Minute`, `Hour`, `Day`,
    /// `Weekday` or `Month` must be present.
    pub fn from_json(input: &Json) -> Result<Self> {
        let Json::Object(map) = input else {
            return Err(LaunchctlError::InvalidArgument(
                "Invalid calendar interval. Must be an object".to_string(),
            ));
        };
        if is_empty_document(input) {
            return Err(LaunchctlError::EmptyConstraint);
        }

        let interval = Self {
            minute: map.get("Minute").map(|v| calendar_number("Minute", v)).transpose()?,
            hour: map.get("Hour").map(|v| calendar_number("Hour", v)).transpose()?,
            day: map.get("Day").map(|v| calendar_number("Day", v)).transpose()?,
            weekday: map.get("Weekday").map(normalize_weekday).transpose()?,
            month: map.get("Month").map(|v| calendar_number("Month", v)).transpose()?,
        };

        if interval.is_wildcard() {
            return Err(LaunchctlError::EmptyConstraint);
        }
        Ok(interval)
    }

    /// Whether every field is a wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.minute.is_none()
            && self.hour.is_none()
            && self.day.is_none()
            && self.weekday.is_none()
            && self.month.is_none()
    }

    /// Render as a property-list dictionary.
    pub fn to_dictionary(&self) -> Dictionary {
        [
            ("Minute", self.minute),
            ("Hour", self.hour),
            ("Day", self.day),
            ("Weekday", self.weekday),
            ("Month", self.month),
        ]
        .into_iter()
        .filter_map(|(key, v)| v.map(|v| (key.to_string(), Value::Integer(v))))
        .collect()
    }
}

fn calendar_number(field: &str, value: &Json) -> Result<i64> {
    to_number(value)
        .and_then(integral)
        .ok_or_else(|| LaunchctlError::type_mismatch(field, "a number"))
}
