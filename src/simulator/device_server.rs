use crate::app_config::AppConfig;
use crate::domain::DeviceProfile;
use crate::gateway::domain::Registration;
use crate::readiness::{self, ReadyEvent};
use crate::shutdown;
use crate::simulator::client::GatewayClient;
use crate::simulator::handler::{ResourceHandler, UpdateError};
use crate::simulator::observers::{NotifyStyle, ObserverHub};
use axum::extract::State;
use axum::http::header::ACCEPT;
use axum::http::{HeaderMap, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_stream::wrappers::BroadcastStream;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};
use uuid::Uuid;

struct SimulatorState {
    handler: Arc<dyn ResourceHandler>,
    hub: ObserverHub,
}

/// Runs one simulated device until SIGINT/SIGTERM: binds a private loopback
/// endpoint, registers the resource with the gateway, serves retrieves,
/// updates and observe streams, and unregisters before exiting.
///
/// Gateway-facing failures are logged and never abort the process; a
/// simulator whose registration failed keeps serving but never announces
/// readiness.
#[instrument(skip_all, fields(href = %profile.resource.resource_path))]
pub async fn run(
    config: &AppConfig,
    profile: DeviceProfile,
    handler: Arc<dyn ResourceHandler>,
    style: NotifyStyle,
) -> Result<(), SimulatorError> {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
    let endpoint = format!("http://{}", listener.local_addr()?);
    let href = profile.resource.resource_path.clone();
    info!("🔌 Simulator endpoint bound at {}", endpoint);

    let state = Arc::new(SimulatorState {
        handler: Arc::clone(&handler),
        hub: ObserverHub::new(Arc::clone(&handler), style),
    });
    let app = router(&href, state);

    let di = Uuid::new_v4();
    let registration = Registration {
        di,
        pi: Uuid::new_v4(),
        profile,
        properties: handler.retrieve().await,
        endpoint: endpoint.clone(),
    };

    let client = GatewayClient::new(&config.gateway().url());
    match client.register(&registration).await {
        Ok(reply) => {
            info!("📡 Registering '{}' with the gateway… OK", href);
            readiness::announce(&ReadyEvent::Registered {
                di: reply.di,
                href: href.clone(),
                endpoint: endpoint.clone(),
            })?;
        }
        Err(error) => warn!("⚠️ Registering '{}' with the gateway failed: {}", href, error),
    }

    let grace_period = config.simulator().grace_period();
    let shutdown = {
        let href = href.clone();
        async move {
            shutdown::termination_signal().await;
            info!("👋 Caught a termination signal, unregistering '{}'", href);
            if let Err(error) = client.unregister(&di).await {
                warn!("⚠️ Unregistering '{}' failed: {}", href, error);
            }
            tokio::time::sleep(grace_period).await;
        }
    };

    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("👋 Simulator for '{}' stopped", href);
    Ok(())
}

fn router(href: &str, state: Arc<SimulatorState>) -> Router {
    Router::new()
        .route(href, get(retrieve).put(update))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Plain retrieves answer with the current representation; a request
/// accepting `text/event-stream` subscribes to notifications instead, with
/// the current representation as the first event.
async fn retrieve(State(state): State<Arc<SimulatorState>>, headers: HeaderMap) -> Response {
    if !accepts_event_stream(&headers) {
        return Json(state.handler.retrieve().await).into_response();
    }

    let receiver = state.hub.subscribe().await;
    let initial = state.handler.retrieve().await;
    let events = stream::iter([initial])
        .chain(BroadcastStream::new(receiver).filter_map(|item| async move { item.ok() }))
        .map(|value| Event::default().json_data(&value));

    Sse::new(events).keep_alive(KeepAlive::default()).into_response()
}

async fn update(State(state): State<Arc<SimulatorState>>, Json(payload): Json<Value>) -> Response {
    match state.handler.update(payload).await {
        Ok(representation) => {
            state.hub.on_update().await;
            Json(representation).into_response()
        }
        Err(error @ UpdateError::NotSupported) => (StatusCode::METHOD_NOT_ALLOWED, error.to_string()).into_response(),
        Err(error @ UpdateError::InvalidPayload { .. }) => (StatusCode::BAD_REQUEST, error.to_string()).into_response(),
    }
}

fn accepts_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("text/event-stream"))
}

#[derive(Error, Debug)]
pub enum SimulatorError {
    #[error("simulator i/o error: {0}")]
    Io(#[from] std::io::Error),
}
