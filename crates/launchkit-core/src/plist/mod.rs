//! Job descriptor documents.
//!
//! [`JobDescriptor`] builds a launchd job definition field by field, checking
//! each value as it goes, and renders it as an XML property list. [`parse`]
//! reads such a list back into a [`Dictionary`].

mod calendar;
mod descriptor;
mod value;
mod xml;

pub use calendar::CalendarInterval;
pub use descriptor::{JobDescriptor, PROCESS_TYPES, SESSION_TYPES, START_CALENDAR_INTERVAL};
pub use value::{Dictionary, Value};
pub use xml::{parse, to_xml};

#[cfg(test)]
#[path = "plist_tests.rs"]
mod tests;
