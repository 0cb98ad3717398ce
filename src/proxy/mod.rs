//! The relay pipeline.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → routing (classify path, pick upstream base)
//!     → assets.rs  (static: cache lookup, GET on miss, populate cache)
//!     → api.rs     (dynamic: body rules, header transform, dispatch, translate)
//!     → outbound response
//! ```
//!
//! # Design Decisions
//! - One linear pass per request, a single branch at classification
//! - The cache is the only state shared between requests
//! - Upstream statuses are outcomes, not errors; only transport faults
//!   synthesize an error status

pub mod api;
pub mod assets;
pub mod headers;
