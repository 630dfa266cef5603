//! HTTP routes.
//!
//! Thin translation layer: decode and validate the body, call the
//! registry, map the outcome to a status code.

use std::future::Future;
use std::net::SocketAddr;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use chrono::{DateTime, Utc};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use lanotifica_protocol::{
    DISMISS_PATH, DismissRequest, HEALTH_PATH, HealthResponse, NOTIFICATION_PATH,
    NotificationRequest, StatusResponse, decode_body,
};

use crate::error::{ServerError, ServerResult};
use crate::registry::NotificationRegistry;

/// State shared by every request.
#[derive(Clone)]
pub struct AppState {
    registry: NotificationRegistry,
    started_at: DateTime<Utc>,
}

impl AppState {
    /// Creates the state around a registry.
    pub fn new(registry: NotificationRegistry) -> Self {
        Self {
            registry,
            started_at: Utc::now(),
        }
    }

    /// Seconds since the state was created.
    pub fn uptime_seconds(&self) -> u64 {
        let duration = Utc::now() - self.started_at;
        duration.num_seconds().max(0) as u64
    }
}

/// Builds the relay router.
///
/// Both notification paths accept POST (send) and DELETE (dismiss); any
/// other method gets 405.
pub fn router(state: AppState) -> Router {
    let notification = post(send_notification).delete(dismiss_notification);

    Router::new()
        .route(NOTIFICATION_PATH, notification.clone())
        .route(DISMISS_PATH, notification)
        .route(HEALTH_PATH, get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// POST: show a notification.
async fn send_notification(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StatusResponse>, ServerError> {
    let request: NotificationRequest = decode_body(&body)?;
    request.validate()?;

    if let Err(e) = state.registry.send(&request).await {
        error!(error = %e, key = %request.key, "Failed to send notification");
        return Err(e);
    }
    Ok(Json(StatusResponse::sent()))
}

/// DELETE: dismiss a tracked notification.
async fn dismiss_notification(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StatusResponse>, ServerError> {
    let request: DismissRequest = decode_body(&body)?;
    request.validate()?;

    if let Err(e) = state.registry.dismiss(&request.key).await {
        error!(error = %e, key = %request.key, "Failed to dismiss notification");
        return Err(e);
    }
    Ok(Json(StatusResponse::dismissed()))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(
        env!("CARGO_PKG_VERSION"),
        state.uptime_seconds(),
        state.registry.active_count().await,
    ))
}

/// HTTP listener bound to the relay address.
pub struct HttpServer {
    listener: TcpListener,
    app: Router,
}

impl HttpServer {
    /// Binds `addr` and prepares the router.
    pub async fn bind(addr: SocketAddr, state: AppState) -> ServerResult<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "Relay listening");
        Ok(Self {
            listener,
            app: router(state),
        })
    }

    /// Returns the bound address.
    pub fn local_addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves requests until `shutdown` completes, then drains in-flight requests.
    pub async fn run_until_shutdown<S>(self, shutdown: S) -> ServerResult<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                info!("Shutdown signal received");
            })
            .await?;
        Ok(())
    }
}
