//! HTTP surface subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all route, middleware)
//!     → cors.rs (origin policy, consulted before the pipeline)
//!     → request_id.rs (stamp X-Request-ID)
//!     → proxy pipeline
//!     → response to client
//! ```

pub mod cors;
pub mod request_id;
pub mod server;

pub use request_id::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
