//! Error types
//!
//! Rolling and counting never fail; these cover the edges where outside input
//! enters the engine (settings files and strictly parsed face values).

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a `GameConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("failed to write settings: {0}")]
    Serialize(#[from] ron::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Raised by strict face value parsing (user input), as opposed to the
/// clamping constructors used by the animation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FaceValueError {
    #[error("face value {0} is outside 1-6")]
    OutOfRange(i64),

    #[error("`{0}` is not a face value")]
    NotANumber(String),
}
