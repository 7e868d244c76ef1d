// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery-resilience supervisor.
//!
//! A fixed-interval background task that keeps the free-tier host awake
//! with a self-ping and, when the delivery pipe has been silent too
//! long, actively probes the chat platform. Probe failures climb a
//! ladder: webhook re-registration first, full engine reinitialization
//! once the failure counter reaches its cap.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use citabot_core::{CitabotError, DeliveryHealth, IdentityProbe};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Recovery actions the supervisor can demand of the bot engine.
#[async_trait]
pub trait EngineControl: Send + Sync {
    /// Re-binds the webhook without touching conversations.
    async fn re_register(&self) -> Result<(), CitabotError>;

    /// Full teardown and fresh start, conversations included.
    async fn reinitialize(&self) -> Result<(), CitabotError>;
}

/// Supervisor knobs, taken from the supervisor config section.
#[derive(Debug, Clone)]
pub struct SupervisorOptions {
    pub interval: Duration,
    pub inactivity_threshold: Duration,
    pub max_webhook_retries: u32,
    /// Self-ping target; `None` disables the anti-hibernation ping.
    pub ping_url: Option<String>,
}

pub struct Supervisor {
    options: SupervisorOptions,
    health: Arc<DeliveryHealth>,
    probe: Arc<dyn IdentityProbe>,
    control: Arc<dyn EngineControl>,
    http: reqwest::Client,
}

impl Supervisor {
    pub fn new(
        options: SupervisorOptions,
        health: Arc<DeliveryHealth>,
        probe: Arc<dyn IdentityProbe>,
        control: Arc<dyn EngineControl>,
    ) -> Self {
        Self {
            options,
            health,
            probe,
            control,
            http: reqwest::Client::new(),
        }
    }

    /// Runs cycles at the configured interval until `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.options.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately; skip it so a fresh
        // deployment is not probed before it has seen any traffic.
        interval.tick().await;

        info!(
            interval_secs = self.options.interval.as_secs(),
            "supervisor started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("supervisor stopping");
                    return;
                }
                _ = interval.tick() => self.cycle().await,
            }
        }
    }

    /// One supervision cycle. All failures are absorbed here; the task
    /// itself never dies.
    pub async fn cycle(&self) {
        self.self_ping().await;

        let idle = self.health.idle_seconds();
        if idle < self.options.inactivity_threshold.as_secs() as i64 {
            debug!(idle_secs = idle, "recent activity, no probe needed");
            return;
        }

        warn!(idle_secs = idle, "delivery has been silent, probing bot");
        match self.probe.identity().await {
            Ok(username) => {
                info!(%username, "probe ok, bot reachable");
                self.health.mark_healthy();
                self.health.reset_failures();
            }
            Err(e) => {
                self.health.mark_unhealthy();
                let failures = self.health.record_failure();
                if failures >= self.options.max_webhook_retries {
                    error!(error = %e, failures, "probe failed at retry cap, reinitializing engine");
                    if let Err(e) = self.control.reinitialize().await {
                        error!(error = %e, "engine reinitialization failed");
                    }
                    self.health.reset_failures();
                } else {
                    warn!(error = %e, failures, "probe failed, re-registering webhook");
                    if let Err(e) = self.control.re_register().await {
                        error!(error = %e, "webhook re-registration failed");
                    }
                }
            }
        }

        // Stamp regardless of outcome so one silent stretch triggers
        // at most one probe per threshold window.
        self.health.record_activity();
    }

    async fn self_ping(&self) {
        let Some(url) = self.options.ping_url.as_deref() else {
            return;
        };
        match self.http.get(url).send().await {
            Ok(response) => debug!(status = %response.status(), "keep-alive ping sent"),
            Err(e) => warn!(error = %e, "keep-alive ping failed"),
        }
    }
}
