//! Container error types
//!
//! Every failing call reports a typed condition. Validation always runs
//! before a version is forked, so any error here means the graph is exactly
//! as it was before the call.
//!
//! Error codes:
//! - FORK_VERSION_NOT_FOUND
//! - FORK_INDEX_OUT_OF_RANGE
//! - FORK_KEY_NOT_FOUND
//! - FORK_VALUE_NOT_FOUND
//! - FORK_EMPTY_CONTAINER
//! - FORK_CAPACITY_EXCEEDED

use std::fmt;

use thiserror::Error;

use crate::observability::Severity;
use crate::version::VersionId;

/// Result type for container and graph operations
pub type ContainerResult<T> = Result<T, ContainerError>;

/// Container errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    #[error("Version {version} does not exist")]
    VersionNotFound { version: VersionId },

    #[error("Index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Key {key} does not exist")]
    KeyNotFound { key: String },

    #[error("Value {value} not found")]
    ValueNotFound { value: String },

    #[error("Container is empty")]
    EmptyContainer,

    #[error("Capacity of {capacity} elements exceeded")]
    CapacityExceeded { capacity: usize },
}

impl ContainerError {
    /// Build a `KeyNotFound` from any debuggable key.
    pub fn key_not_found(key: &impl fmt::Debug) -> Self {
        ContainerError::KeyNotFound {
            key: format!("{:?}", key),
        }
    }

    /// Build a `ValueNotFound` from any debuggable value.
    pub fn value_not_found(value: &impl fmt::Debug) -> Self {
        ContainerError::ValueNotFound {
            value: format!("{:?}", value),
        }
    }

    /// Returns the stable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            ContainerError::VersionNotFound { .. } => ErrorCode::VersionNotFound,
            ContainerError::IndexOutOfRange { .. } => ErrorCode::IndexOutOfRange,
            ContainerError::KeyNotFound { .. } => ErrorCode::KeyNotFound,
            ContainerError::ValueNotFound { .. } => ErrorCode::ValueNotFound,
            ContainerError::EmptyContainer => ErrorCode::EmptyContainer,
            ContainerError::CapacityExceeded { .. } => ErrorCode::CapacityExceeded,
        }
    }

    /// Container errors never leave partial state behind.
    pub fn is_fatal(&self) -> bool {
        false
    }
}

/// Stable machine-readable codes for `ContainerError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    VersionNotFound,
    IndexOutOfRange,
    KeyNotFound,
    ValueNotFound,
    EmptyContainer,
    CapacityExceeded,
}

impl ErrorCode {
    /// Returns the string code
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::VersionNotFound => "FORK_VERSION_NOT_FOUND",
            ErrorCode::IndexOutOfRange => "FORK_INDEX_OUT_OF_RANGE",
            ErrorCode::KeyNotFound => "FORK_KEY_NOT_FOUND",
            ErrorCode::ValueNotFound => "FORK_VALUE_NOT_FOUND",
            ErrorCode::EmptyContainer => "FORK_EMPTY_CONTAINER",
            ErrorCode::CapacityExceeded => "FORK_CAPACITY_EXCEEDED",
        }
    }

    /// Severity used when a rejection is logged.
    pub fn severity(&self) -> Severity {
        Severity::Warn
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ContainerError::VersionNotFound {
                version: VersionId::new(3)
            }
            .code()
            .as_str(),
            "FORK_VERSION_NOT_FOUND"
        );
        assert_eq!(
            ContainerError::EmptyContainer.code(),
            ErrorCode::EmptyContainer
        );
        assert_eq!(
            ContainerError::CapacityExceeded { capacity: 4 }.code().to_string(),
            "FORK_CAPACITY_EXCEEDED"
        );
    }

    #[test]
    fn test_messages() {
        let err = ContainerError::VersionNotFound {
            version: VersionId::new(2),
        };
        assert_eq!(err.to_string(), "Version v2 does not exist");

        let err = ContainerError::IndexOutOfRange { index: 5, len: 3 };
        assert_eq!(err.to_string(), "Index 5 out of range for length 3");
    }

    #[test]
    fn test_key_rendered_with_debug() {
        let err = ContainerError::key_not_found(&"c");
        assert_eq!(err.to_string(), "Key \"c\" does not exist");

        let err = ContainerError::value_not_found(&10);
        assert_eq!(err.to_string(), "Value 10 not found");
    }

    #[test]
    fn test_nothing_is_fatal() {
        assert!(!ContainerError::EmptyContainer.is_fatal());
        assert!(!ContainerError::key_not_found(&1).is_fatal());
    }
}
