//! # Metrics module
//!
//! In-process observability for the dispatch pipeline: request totals,
//! status code counts, parse failures, busy workers, latency percentiles.

pub mod collector;

pub use collector::{MetricsCollector, MetricsSnapshot};
