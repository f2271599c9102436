//! Observability subsystem
//!
//! This module provides:
//! - Structured logging (JSON lines)
//! - Typed lifecycle events
//! - Per-graph operational counters
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on history
//! 3. No background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```
//! use forkline::observability::{Event, Logger, MetricsRegistry, Severity};
//!
//! let logger = Logger::new(Some(Severity::Warn));
//! logger.event(Event::OperationRejected, &[("code", "FORK_INDEX_OUT_OF_RANGE")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_rejections();
//! assert_eq!(metrics.snapshot().rejections, 1);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{render, Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
