// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event dispatch loop.
//!
//! Pulls inbound events off the shared queue and hands each to a
//! spawned task that locks its conversation, runs the engine, and sends
//! the replies. Locking per conversation keeps events for one chat in
//! order without ever blocking other chats.

use std::sync::Arc;

use citabot_core::{ChatTransport, EventKind, InboundEvent};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::engine::DialogueEngine;
use crate::store::ConversationStore;

/// Runs until the queue closes or `cancel` fires. In-flight event
/// tasks finish on their own after the loop returns.
pub async fn run_dispatcher(
    mut rx: mpsc::Receiver<InboundEvent>,
    store: Arc<ConversationStore>,
    engine: Arc<DialogueEngine>,
    transport: Arc<dyn ChatTransport>,
    cancel: CancellationToken,
) {
    info!("dispatcher started");

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => {
                info!("dispatcher stopping");
                return;
            }
            event = rx.recv() => match event {
                Some(event) => event,
                None => {
                    info!("inbound queue closed, dispatcher stopping");
                    return;
                }
            },
        };

        let conversation = store.get_or_create(event.chat);
        let engine = engine.clone();
        let transport = transport.clone();

        tokio::spawn(async move {
            // Stop the client's button spinner before doing any work.
            if let EventKind::Callback { id, .. } = &event.kind
                && let Err(e) = transport.acknowledge_callback(id).await
            {
                debug!(error = %e, "callback acknowledgement failed");
            }

            let mut conv = conversation.lock().await;
            let replies = engine.handle(&mut conv, &event.kind).await;
            drop(conv);

            for reply in replies {
                if let Err(e) = transport.send(event.chat, reply).await {
                    warn!(error = %e, chat = %event.chat, "failed to send reply");
                }
            }
        });
    }
}
