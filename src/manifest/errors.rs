//! Manifest error types
//!
//! Unlike container errors these can come from outside the process (a file
//! edited by hand, a truncated write), so they carry enough context to say
//! which version is wrong.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::version::VersionId;

/// Result type for manifest operations
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Manifest errors
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to parse manifest: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Checksum mismatch for version {version}: expected {expected}, found {found}")]
    ChecksumMismatch {
        version: VersionId,
        expected: String,
        found: String,
    },

    #[error("Corrupt manifest: {0}")]
    Corrupt(String),

    #[error("Unsupported manifest format version {0}")]
    UnsupportedFormat(u8),
}

impl ManifestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ManifestError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(message: impl Into<String>) -> Self {
        ManifestError::Corrupt(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ManifestError::ChecksumMismatch {
            version: VersionId::new(2),
            expected: "crc32:00000001".into(),
            found: "crc32:00000002".into(),
        };
        assert_eq!(
            err.to_string(),
            "Checksum mismatch for version v2: expected crc32:00000001, found crc32:00000002"
        );
        assert_eq!(
            ManifestError::UnsupportedFormat(9).to_string(),
            "Unsupported manifest format version 9"
        );
    }

    #[test]
    fn test_io_error_has_source() {
        use std::error::Error;

        let err = ManifestError::io("/tmp/x", io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(err.to_string().contains("/tmp/x"));
        assert!(err.source().is_some());
    }
}
