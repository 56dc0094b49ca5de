//! Error types for wwwhash_core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using wwwhash_core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while publishing.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred during file operations.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// A required input (bundle, template directory, entry point) is absent.
    #[error("Missing {what}: {path}")]
    MissingInput { what: &'static str, path: PathBuf },

    /// File content that must be text is not valid UTF-8.
    #[error("{path} is not valid UTF-8: {source}")]
    Encoding {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Template entry whose name cannot be represented as UTF-8.
    #[error("Invalid file name: {path}")]
    InvalidFileName { path: PathBuf },

    /// Publish configuration is unusable.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl Error {
    /// Create a MissingInput error.
    pub fn missing_input(what: &'static str, path: impl Into<PathBuf>) -> Self {
        Error::MissingInput {
            what,
            path: path.into(),
        }
    }

    /// Create an Encoding error.
    pub fn encoding(path: impl Into<PathBuf>, source: std::string::FromUtf8Error) -> Self {
        Error::Encoding {
            path: path.into(),
            source,
        }
    }

    /// Create an InvalidFileName error.
    pub fn invalid_file_name(path: impl Into<PathBuf>) -> Self {
        Error::InvalidFileName { path: path.into() }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Error::InvalidConfig {
            reason: reason.into(),
        }
    }
}

impl From<ignore::Error> for Error {
    fn from(err: ignore::Error) -> Self {
        // ignore::Error can wrap an io::Error or be a path error
        match err.io_error() {
            Some(io_err) => Error::Io {
                source: std::io::Error::new(io_err.kind(), io_err.to_string()),
            },
            None => Error::Io {
                source: std::io::Error::other(err.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_message() {
        let err = Error::missing_input("entry point", "root-template/index.html");
        assert_eq!(
            err.to_string(),
            "Missing entry point: root-template/index.html"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        match err {
            Error::Io { source } => {
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
