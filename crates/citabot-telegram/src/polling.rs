// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-polling delivery loop.
//!
//! Used when no public URL is available for webhook delivery. Pulls
//! updates with `getUpdates`, converts them to inbound events, and feeds
//! the shared dispatch queue. Activity is recorded on the same health
//! object the webhook path uses, so the supervisor ladder works
//! unchanged.

use std::sync::Arc;
use std::time::Duration;

use citabot_core::{DeliveryHealth, InboundEvent};
use teloxide::prelude::*;
use teloxide::types::AllowedUpdate;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::TelegramApi;
use crate::convert::update_to_event;

/// Pause after a failed `getUpdates` call before retrying.
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Polling knobs, taken from the telegram config section.
#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    /// Long-poll hold time passed to `getUpdates`.
    pub timeout_secs: u32,
    /// Pause between successive polls.
    pub interval_ms: u64,
}

/// Runs the polling loop until `cancel` fires.
///
/// Deletes any registered webhook first (dropping the backlog), since
/// Telegram refuses `getUpdates` while a webhook is bound.
pub async fn run_polling(
    api: TelegramApi,
    health: Arc<DeliveryHealth>,
    tx: mpsc::Sender<InboundEvent>,
    options: PollOptions,
    cancel: CancellationToken,
) {
    use citabot_core::DeliveryEndpoint as _;

    if let Err(e) = api.unregister(true).await {
        warn!(error = %e, "could not remove webhook before polling; continuing");
    }

    info!(
        timeout_secs = options.timeout_secs,
        "starting Telegram long polling"
    );

    let mut offset: i32 = 0;

    loop {
        let request = api
            .bot()
            .get_updates()
            .offset(offset)
            .timeout(options.timeout_secs)
            .allowed_updates([AllowedUpdate::Message, AllowedUpdate::CallbackQuery]);

        let updates = tokio::select! {
            _ = cancel.cancelled() => {
                info!("polling loop stopping");
                return;
            }
            result = request => result,
        };

        match updates {
            Ok(updates) => {
                health.mark_healthy();
                for update in updates {
                    offset = update.id.0 as i32 + 1;
                    let Some(event) = update_to_event(&update) else {
                        debug!(update_id = update.id.0, "dropping unusable update");
                        continue;
                    };
                    health.record_activity();
                    if tx.send(event).await.is_err() {
                        warn!("dispatch queue closed, stopping polling loop");
                        return;
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "getUpdates failed, backing off");
                health.mark_unhealthy();
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(POLL_ERROR_BACKOFF) => {}
                }
            }
        }

        if options.interval_ms > 0 {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(Duration::from_millis(options.interval_ms)) => {}
            }
        }
    }
}
