//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all relay handler
//! - Wire up middleware (request ID, tracing, timeout, CORS)
//! - Bind the server to a listener and run until shutdown
//! - Dispatch each request through classification into the pipeline

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::cache::AssetCache;
use crate::config::schema::RelayConfig;
use crate::config::validation::ValidationError;
use crate::http::{cors, request_id, X_REQUEST_ID};
use crate::lifecycle::ShutdownListener;
use crate::observability::metrics;
use crate::proxy::{api, assets};
use crate::routing::{RouteKind, RouteTable};
use crate::transport::{HttpTransport, Transport, TransportError};

/// Application state injected into the relay handler.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub cache: AssetCache,
    pub transport: Arc<dyn Transport>,
    pub max_body_bytes: usize,
}

/// Failure to assemble a server from its config.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new server with the production transport.
    pub fn new(config: RelayConfig) -> Result<Self, StartupError> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::from_config(
            &config.upstream,
            &config.timeouts,
        )?);
        Self::with_transport(config, transport)
    }

    /// Create a new server around an explicit transport.
    pub fn with_transport(
        config: RelayConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, StartupError> {
        let routes = Arc::new(RouteTable::from_config(&config.upstream)?);
        let cache = AssetCache::new(Duration::from_secs(config.cache.ttl_secs));

        let state = AppState {
            routes,
            cache,
            transport,
            max_body_bytes: config.listener.max_body_bytes,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(relay_handler))
            .route("/", any(relay_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(request_id::set_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(request_id::propagate_layer())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    )))
                    .layer(cors::layer(&config.cors)),
            )
    }

    /// Run the server on the given listener until shutdown is signalled.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownListener,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Main relay handler: classify, then run the matching pipeline.
async fn relay_handler(
    State(state): State<AppState>,
    ConnectInfo(client_addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let start = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let (parts, body) = request.into_parts();
    let method = parts.method.to_string();
    let decision = state.routes.decide(parts.uri.path());

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %parts.uri.path(),
        kind = ?decision.kind,
        "relaying request"
    );

    let (response, upstream_label) = match decision.kind {
        RouteKind::StaticAsset => (
            assets::serve(&state, decision.upstream_base, &parts.uri).await,
            "assets",
        ),
        RouteKind::ApiCall => (
            api::forward(&state, decision.upstream_base, parts, body, Some(client_addr)).await,
            "api",
        ),
    };

    metrics::record_request(&method, response.status().as_u16(), upstream_label, start);
    response.into_response()
}
