//! Unified error types for the adsift core library.
//!
//! Only the setup and persistence paths return errors: configuration
//! load/save, hex decoding of operator-supplied fixtures, and training-log
//! creation. The decode-and-decide pipeline itself never does: structural
//! decode failures drop the offending unit, invalid rules are skipped at
//! compile time, and an unreachable log sink is reported and swallowed.

use std::path::PathBuf;

use thiserror::Error;

/// The unified error type for all adsift operations.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A hex string could not be decoded into bytes.
    #[error("invalid hex string {text:?}: {reason}")]
    InvalidHex {
        /// The offending input.
        text: String,
        /// What made it undecodable.
        reason: &'static str,
    },

    /// The configuration file could not be read.
    #[error("failed to read config {}: {}", .path.display(), .source)]
    ConfigRead {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The configuration file exists but could not be parsed as TOML.
    #[error("failed to parse config {}: {}", .path.display(), .source)]
    ConfigParse {
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying TOML failure.
        source: toml::de::Error,
    },

    /// The configuration could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// A low-level I/O error, e.g. from the training-log sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized [`Result`] type for adsift operations.
pub type Result<T> = std::result::Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = FilterError::InvalidHex {
            text: "0G".into(),
            reason: "not a hex digit",
        };
        assert!(format!("{err}").contains("0G"));
        assert!(format!("{err}").contains("not a hex digit"));

        let err = FilterError::ConfigRead {
            path: PathBuf::from("/etc/adsift/filter.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(format!("{err}").contains("/etc/adsift/filter.toml"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: FilterError = io_err.into();
        assert!(matches!(err, FilterError::Io(_)));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<FilterError>();
        assert_sync::<FilterError>();
    }
}
