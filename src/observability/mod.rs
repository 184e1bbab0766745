//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via `tracing`; request IDs flow through every line
//! - Metrics are cheap (atomic increments) and scraped, not pushed

pub mod logging;
pub mod metrics;
