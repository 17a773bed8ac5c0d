//! # launchkit core
//!
//! Client-side model for launchd jobs.
//!
//! ## Features
//!
//! - Validating job descriptor builder with XML property-list output
//! - Calendar-interval accumulation with weekday names
//! - Stable errno classification
//! - Job-control facade (list, start, stop, load, unload, submit, limits,
//!   environment, umask, resource usage) over a pluggable capability
//! - Blocking, async and callback call shapes
//!
//! ## Usage
//!
//! ```rust,ignore
//! use launchkit_core::control::{JobFilter, Launchctl};
//! use launchkit_core::plist::JobDescriptor;
//!
//! let mut job = JobDescriptor::new();
//! job.set_label("com.example.backup")?
//!     .set_program("/usr/local/bin/backup")?
//!     .add_calendar_interval(serde_json::json!({"Hour": 3, "Weekday": "sunday"}))?;
//! std::fs::write("com.example.backup.plist", job.serialize())?;
//!
//! let ctl = Launchctl::new(backend);
//! ctl.load("com.example.backup.plist", &Default::default())?;
//! let jobs = ctl.list(&JobFilter::All)?;
//! ```

pub mod control;
pub mod errno;
pub mod error;
pub mod plist;
pub mod utils;

pub use errno::{classify, ClassifiedError};
pub use error::{LaunchctlError, Result};
