//! Axum-based HTTP boundary shim.
//!
//! The core never touches a socket; this optional module wires a
//! [`ProtocolAdapter`] into an axum `Router` with the usual boundary
//! hygiene:
//! - request body size limit (64KB) — webhook turns are small
//! - request timeout (30s) to prevent slow-loris stalls
//! - a `/health` route for probes
//!
//! Everything conversational still flows through the adapter; this file
//! only translates between axum types and the plain boundary structs.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

use crate::adapter::{ProtocolAdapter, WebhookRequest};
use crate::router::HandlerTable;

/// Maximum request body size (64KB).
pub const MAX_BODY_SIZE: usize = 65_536;
/// Request timeout (30s).
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Shared state for the axum handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub adapter: Arc<ProtocolAdapter>,
    pub table: Arc<HandlerTable>,
}

/// Build the fulfillment router: `POST /fulfillment` for turns, `GET
/// /health` for probes.
pub fn router(adapter: Arc<ProtocolAdapter>, table: Arc<HandlerTable>) -> Router {
    let state = GatewayState { adapter, table };
    Router::new()
        .route("/health", get(handle_health))
        .route("/fulfillment", post(handle_fulfillment))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ))
}

/// Bind and serve until the process is stopped.
pub async fn serve(
    addr: SocketAddr,
    adapter: Arc<ProtocolAdapter>,
    table: Arc<HandlerTable>,
) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "fulfillment gateway listening");
    axum::serve(listener, router(adapter, table)).await?;
    Ok(())
}

/// GET /health — always public, no secrets leaked.
async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// POST /fulfillment — one conversational turn.
async fn handle_fulfillment(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> axum::response::Response {
    let mut request = WebhookRequest::new(body.to_vec());
    for (name, value) in &headers {
        if let Ok(value) = value.to_str() {
            request.headers.insert(name.as_str(), value);
        }
    }

    let reply = state.adapter.handle(&request, &state.table).await;

    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, reply.body).into_response();
    for (name, value) in &reply.headers {
        if let (Ok(name), Ok(value)) = (
            axum::http::HeaderName::try_from(name.as_str()),
            axum::http::HeaderValue::try_from(value.as_str()),
        ) {
            response.headers_mut().insert(name, value);
        }
    }
    response
}
