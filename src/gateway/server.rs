use crate::app_config::AppConfig;
use crate::gateway::domain::{Registration, RegistrationReply};
use crate::gateway::registry::{LookupError, Registry, RegistryError};
use crate::readiness::{self, ReadyEvent};
use crate::shutdown;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};
use uuid::Uuid;

const EVENT_STREAM: HeaderValue = HeaderValue::from_static("text/event-stream");

#[derive(Debug)]
pub struct GatewayState {
    registry: RwLock<Registry>,
    client: Client,
}

impl GatewayState {
    pub fn new() -> Self {
        GatewayState {
            registry: RwLock::new(Registry::new()),
            client: Client::new(),
        }
    }
}

impl Default for GatewayState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/oic/d", get(devices))
        .route("/api/oic/p", get(platforms))
        .route("/api/oic/res", get(resources))
        .route("/api/oic/*path", get(query_resource).put(update_resource))
        .route("/api/registry", post(register))
        .route("/api/registry/:di", delete(unregister))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the discovery gateway and serves it until SIGINT/SIGTERM. The
/// actual port is announced on stdout once the listener is bound, so a
/// parent process can configure port 0 and read the handshake instead of
/// sleeping.
#[instrument(skip_all)]
pub async fn serve(config: &AppConfig) -> Result<(), GatewayError> {
    let listener = TcpListener::bind((config.gateway().host(), config.gateway().port())).await?;
    let port = listener.local_addr()?.port();
    info!("📡 Gateway listening on {}:{}", config.gateway().host(), port);

    readiness::announce(&ReadyEvent::Listening { port })?;

    let state = Arc::new(GatewayState::new());
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown::termination_signal())
        .await?;

    info!("📡 Gateway stopped");
    Ok(())
}

async fn health() -> &'static str {
    "OK"
}

async fn devices(State(state): State<Arc<GatewayState>>) -> Response {
    Json(state.registry.read().await.device_entries()).into_response()
}

async fn platforms(State(state): State<Arc<GatewayState>>) -> Response {
    Json(state.registry.read().await.platform_entries()).into_response()
}

async fn resources(State(state): State<Arc<GatewayState>>) -> Response {
    Json(state.registry.read().await.resource_entries()).into_response()
}

async fn register(State(state): State<Arc<GatewayState>>, Json(registration): Json<Registration>) -> Response {
    let di = registration.di;
    let href = registration.profile.resource.resource_path.clone();

    match state.registry.write().await.register(registration) {
        Ok(()) => {
            info!(%di, "📡 Registered resource '{}'", href);
            (StatusCode::CREATED, Json(RegistrationReply { di })).into_response()
        }
        Err(error @ RegistryError::AlreadyRegistered { .. }) => {
            warn!("⚠️ Rejected registration for '{}': {}", href, error);
            (StatusCode::CONFLICT, error.to_string()).into_response()
        }
    }
}

async fn unregister(State(state): State<Arc<GatewayState>>, Path(di): Path<Uuid>) -> Response {
    match state.registry.write().await.unregister(&di) {
        Some(registration) => {
            info!(%di, "🗑️ Unregistered resource '{}'", registration.profile.resource.resource_path);
            StatusCode::NO_CONTENT.into_response()
        }
        None => (StatusCode::NOT_FOUND, format!("no registration for device '{di}'")).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct ResourceQuery {
    di: Option<Uuid>,
    obs: Option<u8>,
}

async fn query_resource(
    State(state): State<Arc<GatewayState>>,
    Path(path): Path<String>,
    Query(query): Query<ResourceQuery>,
    headers: HeaderMap,
) -> Response {
    let href = format!("/{path}");
    let target = match resolve(&state, &href, query.di).await {
        Ok(target) => target,
        Err(response) => return response,
    };

    if query.obs == Some(1) || accepts_event_stream(&headers) {
        observe(&state, target).await
    } else {
        let request = state.client.get(&target.url);
        relay(&state, target, request).await
    }
}

async fn update_resource(
    State(state): State<Arc<GatewayState>>,
    Path(path): Path<String>,
    Query(query): Query<ResourceQuery>,
    Json(payload): Json<serde_json::Value>,
) -> Response {
    let href = format!("/{path}");
    let target = match resolve(&state, &href, query.di).await {
        Ok(target) => target,
        Err(response) => return response,
    };

    let request = state.client.put(&target.url).json(&payload);
    relay(&state, target, request).await
}

/// A resolved proxy destination: the owning device and the absolute URL of
/// its private endpoint.
struct ProxyTarget {
    di: Uuid,
    url: String,
}

async fn resolve(state: &GatewayState, href: &str, di: Option<Uuid>) -> Result<ProxyTarget, Response> {
    let registry = state.registry.read().await;
    match registry.find(href, di) {
        Ok(registration) => Ok(ProxyTarget {
            di: registration.di,
            url: format!("{}{}", registration.endpoint, href),
        }),
        Err(error @ LookupError::NotFound { .. }) => Err((StatusCode::NOT_FOUND, error.to_string()).into_response()),
        Err(error @ LookupError::AmbiguousPath { .. }) => Err((StatusCode::BAD_REQUEST, error.to_string()).into_response()),
    }
}

async fn relay(state: &GatewayState, target: ProxyTarget, request: reqwest::RequestBuilder) -> Response {
    let upstream = match request.send().await {
        Ok(upstream) => upstream,
        Err(error) => return upstream_failure(state, target, error).await,
    };

    let status = upstream.status();
    let content_type = upstream
        .headers()
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    match upstream.bytes().await {
        Ok(body) => (status, [(CONTENT_TYPE, content_type)], body).into_response(),
        Err(error) => (StatusCode::BAD_GATEWAY, format!("simulator response failed: {error}")).into_response(),
    }
}

/// Proxies the simulator's notification stream to the caller unchanged.
async fn observe(state: &GatewayState, target: ProxyTarget) -> Response {
    let request = state.client.get(&target.url).header(ACCEPT, EVENT_STREAM);
    let upstream = match request.send().await {
        Ok(upstream) => upstream,
        Err(error) => return upstream_failure(state, target, error).await,
    };

    let status = upstream.status();
    let content_type = upstream.headers().get(CONTENT_TYPE).cloned().unwrap_or(EVENT_STREAM);
    (status, [(CONTENT_TYPE, content_type)], Body::from_stream(upstream.bytes_stream())).into_response()
}

/// A connection failure means the owning process died without unregistering;
/// the stale registration is pruned so discovery stops reporting it.
async fn upstream_failure(state: &GatewayState, target: ProxyTarget, error: reqwest::Error) -> Response {
    if error.is_connect() {
        warn!(di = %target.di, "🧹 Simulator endpoint unreachable, pruning its registration: {}", error);
        state.registry.write().await.unregister(&target.di);
        return (StatusCode::NOT_FOUND, format!("no registration for device '{}'", target.di)).into_response();
    }

    warn!(di = %target.di, "⚠️ Relaying to the simulator failed: {}", error);
    (StatusCode::BAD_GATEWAY, format!("simulator request failed: {error}")).into_response()
}

fn accepts_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("text/event-stream"))
}

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("gateway i/o error: {0}")]
    Io(#[from] std::io::Error),
}
