//! [`JobControl`](launchkit_core::control::JobControl) backed by the
//! `launchctl` executable.
//!
//! Each primitive runs one `launchctl` subcommand and parses its output.
//! Failures are reported as raw errno values for the facade to classify.

mod command;
mod parse;
mod rusage;

pub use command::{LaunchctlCommand, DEFAULT_BINARY};
pub use parse::{parse_environment, parse_failure_code, parse_job_table, parse_limits};
