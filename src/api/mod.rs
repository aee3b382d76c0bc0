//! # Controller HTTP surface
//!
//! Routes exposed by the Parka controller.
//!
//! ## Endpoints
//!
//! - `POST /scale/{service}/{replicas}` - Manually scale a managed deployment
//! - `GET /status/{service}` - Pod phase, replica count, and activity for a service
//! - `GET /healthz` - Controller liveness
//! - `/{service}` and `/{service}/*path` (any method) - Reverse proxy to the
//!   service backend, activating the deployment first if it is parked
//!
//! ## Example
//!
//! ```no_run
//! use parka::api::{create_router, AppState};
//! use parka::config::ParkaConfig;
//! use parka::manager::ServiceManager;
//! use parka::orchestrator::KubectlClient;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(ParkaConfig::default());
//! let manager = Arc::new(ServiceManager::new(
//!     Arc::clone(&config),
//!     Arc::new(KubectlClient::new()),
//! ));
//!
//! let state = Arc::new(AppState::new(manager, config));
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All errors are returned as a JSON envelope:
//! ```json
//! {
//!   "error": {
//!     "message": "service 'vllm' not ready after 120s",
//!     "type": "service_unavailable",
//!     "code": "activation_timeout"
//!   }
//! }
//! ```

mod error;
mod health;
mod proxy;
mod scale;
mod status;

pub use error::{ApiError, ApiErrorBody};

use crate::config::ParkaConfig;
use crate::manager::ServiceManager;
use axum::{
    routing::{any, get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Maximum request body size (10 MB).
pub(crate) const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Shared application state accessible to all handlers.
pub struct AppState {
    pub manager: Arc<ServiceManager>,
    pub config: Arc<ParkaConfig>,
    pub http_client: reqwest::Client,
}

impl AppState {
    /// Create new application state with the given manager and configuration.
    pub fn new(manager: Arc<ServiceManager>, config: Arc<ParkaConfig>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.proxy.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.proxy.connect_timeout_seconds))
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            manager,
            config,
            http_client,
        }
    }
}

/// Create the main router with all endpoints configured.
///
/// Static routes win over the catch-all proxy, so `/scale/...`, `/status/...`
/// and `/healthz` are never forwarded to a backend.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health::handle))
        .route("/status/:service", get(status::handle))
        .route("/scale/:service/:replicas", post(scale::handle))
        .route("/:service", any(proxy::handle_root))
        .route("/:service/*path", any(proxy::handle))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .with_state(state)
}
