//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → classifier.rs (prefix check)
//!     → Return: RouteDecision { kind, upstream base }
//! ```
//!
//! # Design Decisions
//! - Two-way classification only: asset host or API host
//! - No regex, a single prefix comparison per request
//! - Deterministic: every path classifies, there is no no-match case

pub mod classifier;

pub use classifier::{RouteDecision, RouteKind, RouteTable};
