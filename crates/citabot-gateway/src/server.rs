// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook HTTP server built on axum.
//!
//! Exposes the Telegram webhook entry point plus the health and root
//! endpoints the keep-alive self-ping targets.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use axum::{
    Router,
    routing::{get, post},
};
use citabot_core::{CitabotError, DeliveryHealth, InboundEvent};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Queue feeding the dispatch loop.
    pub inbound_tx: mpsc::Sender<InboundEvent>,
    /// False until the webhook is registered; the webhook endpoint
    /// answers 409 while unset so Telegram retries later.
    pub ready: Arc<AtomicBool>,
    /// Delivery health shared with the supervisor.
    pub health: Arc<DeliveryHealth>,
    /// In polling mode /health only signals process liveness, never 503.
    pub liveness_only: bool,
}

/// Builds the gateway router. Split out so handler tests can drive it
/// without binding a socket.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/webhook", post(handlers::post_webhook))
        .route("/health", get(handlers::get_health))
        .route("/", get(handlers::get_root))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `host:port` and serves until `cancel` fires.
pub async fn start_server(
    host: &str,
    port: u16,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), CitabotError> {
    let app = router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CitabotError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| CitabotError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_state_is_clone() {
        let (tx, _rx) = mpsc::channel(1);
        let state = GatewayState {
            inbound_tx: tx,
            ready: Arc::new(AtomicBool::new(false)),
            health: Arc::new(DeliveryHealth::new()),
            liveness_only: false,
        };
        let _cloned = state.clone();
    }
}
