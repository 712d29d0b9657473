//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logs: JSON in production, pretty output in development
//! - Metrics are cheap (atomic increments) and recorded even when the
//!   exporter is disabled
//! - The access log never blocks request processing

pub mod logging;
pub mod metrics;
