//! Crate error type

use crate::app::ConfigError;
use crate::cluster::PatternError;
use crate::table::DecodeError;

/// Errors surfaced while building a typesetter or loading configuration
///
/// Text being measured never produces an error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("corrupt width table: {0}")]
    Decode(#[from] DecodeError),

    #[error("corrupt sequence patterns: {0}")]
    Pattern(#[from] PatternError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("unknown terminal profile '{0}'")]
    UnknownProfile(String),
}

pub type Result<T> = std::result::Result<T, Error>;
