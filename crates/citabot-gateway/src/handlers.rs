// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP handlers for the webhook entry point and health endpoints.

use std::sync::atomic::Ordering;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use citabot_telegram::convert::update_to_event;
use teloxide::types::Update;
use tracing::{debug, warn};

use crate::server::GatewayState;

/// POST /webhook
///
/// Telegram push delivery. Answers 409 until the webhook registration
/// completes so Telegram re-delivers once the bot is ready, 400 for
/// payloads that are not a usable update, and 200 once the event is
/// queued. A queued event always counts as delivery activity.
pub async fn post_webhook(State(state): State<GatewayState>, body: Bytes) -> Response {
    if !state.ready.load(Ordering::SeqCst) {
        return (StatusCode::CONFLICT, "initializing").into_response();
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, "rejecting malformed webhook payload");
            return (StatusCode::BAD_REQUEST, "malformed update").into_response();
        }
    };

    let Some(event) = update_to_event(&update) else {
        debug!(update_id = update.id.0, "rejecting unusable update kind");
        return (StatusCode::BAD_REQUEST, "unsupported update").into_response();
    };

    state.health.record_activity();
    state.health.mark_healthy();

    if state.inbound_tx.send(event).await.is_err() {
        warn!("dispatch queue closed, dropping webhook update");
        return (StatusCode::INTERNAL_SERVER_ERROR, "dispatcher unavailable").into_response();
    }

    (StatusCode::OK, "ok").into_response()
}

/// GET /health
///
/// Readiness for the hosting platform. In webhook mode this reflects
/// the supervisor's verdict; in polling mode only process liveness.
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    if state.liveness_only || state.health.is_healthy() {
        (StatusCode::OK, "ok").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy").into_response()
    }
}

/// GET /
///
/// Informational status text. The hit counts as delivery activity so
/// uptime monitors pointed at the root keep an idle deployment quiet.
/// The supervisor's keep-alive self-ping goes to `/health`, not here.
pub async fn get_root(State(state): State<GatewayState>) -> Response {
    state.health.record_activity();
    (StatusCode::OK, "citabot is running").into_response()
}
