//! # launchkit config
//!
//! Configuration for the `launchkit` command-line tool.

mod error;
mod loader;
mod schema;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
