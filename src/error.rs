//! Error types for the few fallible edges of the game: reading configuration and level content
//! from disk, and the breakable platform's internal consistency check. None of these are fatal;
//! callers log them and fall back to defaults.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read level content '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse level content: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid level content: {reason}")]
    Invalid { reason: String },
}

/// Internal inconsistency detected while advancing a breakable platform.
#[derive(Debug, Error, PartialEq)]
pub enum PlatformFault {
    #[error("{phase} timer at {timer} exceeds its duration of {limit} frames")]
    TimerOutOfRange {
        phase: &'static str,
        timer: u32,
        limit: u32,
    },
    #[error("platform geometry is not finite")]
    NonFiniteGeometry,
}
