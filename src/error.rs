//! Error types shared across the scan pipeline.
//!
//! The discovery core is best-effort: a sample read past the end of the file
//! or an arithmetic failure inside the fit function only discards the
//! offending hypothesis and never surfaces here. What remains are the fatal
//! conditions a caller must handle.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal error conditions surfaced by the scan API.
///
/// Uses internally-tagged serialization (`#[serde(tag = "name")]`) so errors
/// written into diagnostics stay machine-readable.
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum ScanError {
    /// I/O operation failed (file open, map, read/write).
    #[error("IO error: {message}")]
    Io { message: String },

    /// Invalid session configuration (missing file, zero-size input,
    /// unusable thread count).
    #[error("Config error: {message}")]
    Config { message: String },

    /// Report file could not be serialized or deserialized.
    #[error("Report error: {message}")]
    Report { message: String },
}

/// Convert standard IO errors into the scan error type.
impl From<std::io::Error> for ScanError {
    fn from(error: std::io::Error) -> Self {
        ScanError::Io {
            message: error.to_string(),
        }
    }
}

/// Convert JSON errors into the scan error type.
impl From<serde_json::Error> for ScanError {
    fn from(error: serde_json::Error) -> Self {
        ScanError::Report {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = ScanError::Config {
            message: "thread count must be positive".to_string(),
        };

        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains(r#""name":"Config"#));
        assert!(json.contains(r#""message":"thread count must be positive"#));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let scan_error: ScanError = io_error.into();

        match scan_error {
            ScanError::Io { message } => {
                assert!(message.contains("file not found"));
            }
            _ => panic!("Wrong error variant"),
        }
    }
}
