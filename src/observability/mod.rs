//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via the tracing crate throughout
//! - Metrics through the metrics facade, exported as Prometheus text
//! - Low-overhead updates; labels limited to method, status and upstream

pub mod logging;
pub mod metrics;
