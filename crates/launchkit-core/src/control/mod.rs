//! Job control.
//!
//! [`JobControl`] is the narrow capability that actually talks to the
//! service manager. [`Launchctl`] wraps it with argument checking and errno
//! classification, and [`AsyncLaunchctl`] exposes the same operations as
//! futures or completion callbacks.

mod async_facade;
mod capability;
mod facade;
mod types;

pub use async_facade::AsyncLaunchctl;
pub use capability::{JobControl, RawResult};
pub use facade::Launchctl;
pub use types::{
    JobAction, JobFilter, JobInfo, JobListing, LimitKind, LimitValue, Limits, LoadOptions,
    RawFailure, ResourceLimit, ResourceUsage, SessionType, SubmitRequest, UsageTarget,
};

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
