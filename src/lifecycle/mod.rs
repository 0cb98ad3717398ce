//! Process lifecycle.
//!
//! Startup is plain wiring in `main`; this module owns the other end,
//! coordinated shutdown of long-running tasks.

pub mod shutdown;

pub use shutdown::{Shutdown, ShutdownListener};
