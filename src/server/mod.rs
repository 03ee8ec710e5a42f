//! HTTP surface and server lifecycle for the health endpoint.
//!
//! # Responsibilities
//! - Build the axum Router exposing the configured path
//! - Run one check cycle per request and render it as JSON
//! - Serve until the shutdown signal fires, then drain within the grace
//!   period
//! - Combine serve-path and shutdown-path errors, dropping neither

use std::future::IntoFuture;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, oneshot};
use tower_http::trace::TraceLayer;

use crate::config::HealthcheckConfig;
use crate::error::{LifecycleError, MultiError};
use crate::probe::checker::Checker;
use crate::probe::Resource;

/// Application state injected into the handler.
#[derive(Clone)]
struct AppState {
    checker: Arc<Checker>,
}

/// The health endpoint service.
///
/// Construct from a [`HealthcheckConfig`], register resources, then hand it
/// a shutdown receiver via [`Healthcheck::run`] or [`Healthcheck::serve`].
pub struct Healthcheck {
    config: HealthcheckConfig,
    resources: Vec<Arc<dyn Resource>>,
}

impl Healthcheck {
    /// Create a service from a config, with no resources registered yet.
    pub fn new(config: HealthcheckConfig) -> Self {
        let mut config = config;
        config.normalize();
        Self {
            config,
            resources: Vec::new(),
        }
    }

    /// Override the listen port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Override the endpoint path. Empty paths are ignored.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        if !path.is_empty() {
            self.config.path = path;
            self.config.normalize();
        }
        self
    }

    /// Override the per-check timeout. Zero is ignored, the default stays.
    pub fn with_check_timeout_secs(mut self, secs: u64) -> Self {
        if secs > 0 {
            self.config.check_timeout_secs = secs;
        }
        self
    }

    /// Override the shutdown grace period. Zero is ignored.
    pub fn with_shutdown_grace_secs(mut self, secs: u64) -> Self {
        if secs > 0 {
            self.config.shutdown_grace_secs = secs;
        }
        self
    }

    /// Set the concurrent-probe limit. Non-positive means unlimited.
    pub fn with_concurrency(mut self, limit: i64) -> Self {
        self.config.concurrency = limit;
        self
    }

    /// Register a resource. Registration order is probe start order.
    pub fn with_resource(mut self, resource: Arc<dyn Resource>) -> Self {
        self.resources.push(resource);
        self
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &HealthcheckConfig {
        &self.config
    }

    /// Build the axum router serving the health endpoint.
    pub fn router(&self) -> Router {
        let checker = Arc::new(Checker::new(
            self.resources.clone(),
            self.config.check_timeout(),
            self.config.concurrency,
        ));

        Router::new()
            .route(&self.config.path, get(health_handler))
            .with_state(AppState { checker })
            .layer(TraceLayer::new_for_http())
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn run(
        self,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), MultiError<LifecycleError>> {
        let addr = self.config.bind_address();
        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => listener,
            Err(e) => {
                let mut errors = MultiError::new();
                errors.push(LifecycleError::Bind(e));
                return errors.into_result();
            }
        };

        self.serve(listener, shutdown).await
    }

    /// Serve on an already-bound listener until the shutdown signal fires.
    ///
    /// On signal the listener stops accepting and in-flight requests get the
    /// configured grace period to finish. Returns only once serving has
    /// stopped and shutdown handling is complete, with any errors from
    /// either path combined.
    pub async fn serve(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), MultiError<LifecycleError>> {
        let grace = self.config.shutdown_grace();

        if let Ok(addr) = listener.local_addr() {
            tracing::info!(
                address = %addr,
                path = %self.config.path,
                resources = self.resources.len(),
                "Health endpoint starting"
            );
        }

        let (drain_tx, drain_rx) = oneshot::channel::<()>();
        let server = axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                let _ = drain_rx.await;
            })
            .into_future();
        tokio::pin!(server);

        let mut errors = MultiError::new();

        tokio::select! {
            result = &mut server => {
                // The server stopped on its own; nothing left to drain.
                if let Err(e) = result {
                    errors.push(LifecycleError::Serve(e));
                }
            }
            _ = shutdown.recv() => {
                tracing::info!("Shutdown signal received, draining in-flight requests");
                let _ = drain_tx.send(());
                match tokio::time::timeout(grace, &mut server).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => errors.push(LifecycleError::Serve(e)),
                    Err(_) => errors.push(LifecycleError::GraceElapsed(grace)),
                }
            }
        }

        tracing::info!("Health endpoint stopped");
        errors.into_result()
    }
}

/// Handler for the health endpoint: one check cycle per request.
///
/// Always `200 OK` with the JSON report; the only non-200 path is a
/// serialization failure, reported as a plain-text 500.
async fn health_handler(State(state): State<AppState>) -> Response {
    let report = state.checker.check().await;

    match serde_json::to_vec(&report) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize health report");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
