//! Application glue module
//!
//! Persistent configuration for the command-line tool and library users.

mod config;

pub use config::{Config, ConfigError};
