//! Transparent relay for a split analytics provider.
//!
//! Inbound traffic on a single public endpoint is classified per path and
//! forwarded to one of two upstream hosts: the dynamic API host or the
//! static asset host. Asset responses are cached in memory with a fixed TTL.

pub mod cache;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod routing;
pub mod transport;

pub use config::schema::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
