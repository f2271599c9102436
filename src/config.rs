//! Container configuration
//!
//! Shared by every adapter: an optional element capacity and an optional log
//! threshold. The default is unbounded and silent.

use serde::{Deserialize, Serialize};

use crate::observability::{Logger, Severity};

/// Configuration for a versioned container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// Maximum element count (default: unbounded)
    #[serde(default)]
    pub capacity: Option<usize>,

    /// Minimum severity written by the graph's logger (default: silent)
    #[serde(default)]
    pub log_level: Option<Severity>,
}

impl ContainerConfig {
    /// Create a config with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Default::default()
        }
    }

    /// Set the log threshold
    pub fn with_log_level(mut self, level: Severity) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Parse a config from JSON, filling absent fields with defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Logger honouring `log_level`
    pub fn logger(&self) -> Logger {
        Logger::new(self.log_level)
    }

    /// Returns true if `len` elements already fill the capacity
    pub fn is_full(&self, len: usize) -> bool {
        matches!(self.capacity, Some(cap) if len >= cap)
    }
}
