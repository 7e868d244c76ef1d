// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `citabot serve` command implementation.
//!
//! Wires the adapters together: Telegram transport, Google Calendar
//! gateway, the axum webhook surface, the dialogue dispatcher, and the
//! resilience supervisor, all sharing one delivery-health record and
//! one cancellation token.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use citabot_agent::{
    BotEngine, ConversationStore, DialogueEngine, Supervisor, SupervisorOptions,
    install_signal_handler, run_dispatcher,
};
use citabot_config::{CitabotConfig, DeliveryMode, validate_for_serve};
use citabot_core::{ChatTransport, CitabotError, DeliveryHealth};
use citabot_gateway::GatewayState;
use citabot_telegram::TelegramApi;
use citabot_telegram::polling::{PollOptions, run_polling};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Capacity of the inbound event queue between delivery and dispatch.
const INBOUND_QUEUE_SIZE: usize = 512;

/// Grace period for in-flight event tasks after the dispatcher stops.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Runs the `citabot serve` command until a shutdown signal arrives.
pub async fn run_serve(config: CitabotConfig) -> Result<(), CitabotError> {
    init_tracing(&config.agent.log_level);
    info!("starting citabot serve");

    if let Err(errors) = validate_for_serve(&config) {
        for error in &errors {
            eprintln!("error: {error}");
        }
        return Err(CitabotError::Config(format!(
            "{} configuration problem(s), see above",
            errors.len()
        )));
    }

    let token = config
        .telegram
        .bot_token
        .as_deref()
        .ok_or_else(|| CitabotError::Config("telegram.bot_token is not set".into()))?;
    let telegram = TelegramApi::new(token)?;

    let http = reqwest::Client::new();
    let calendar = Arc::new(citabot_calendar::from_config(&config, http)?);

    let health = Arc::new(DeliveryHealth::new());
    let ready = Arc::new(AtomicBool::new(false));
    let store = Arc::new(ConversationStore::new());
    let engine = Arc::new(DialogueEngine::new(
        calendar,
        config.calendar.default_duration_minutes,
    ));
    let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_QUEUE_SIZE);

    let cancel = install_signal_handler();
    let polling = config.telegram.mode == DeliveryMode::Polling;

    // HTTP surface: webhook ingress plus health/root, in both modes.
    let gateway_state = GatewayState {
        inbound_tx: inbound_tx.clone(),
        ready: ready.clone(),
        health: health.clone(),
        liveness_only: polling,
    };
    {
        let host = config.server.host.clone();
        let port = config.server.port;
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = citabot_gateway::start_server(&host, port, gateway_state, cancel).await
            {
                error!(error = %e, "gateway server exited");
            }
        });
    }

    let external_url = config
        .server
        .external_url
        .as_deref()
        .map(|url| url.trim_end_matches('/').to_string());
    let webhook_url = match (polling, &external_url) {
        (false, Some(base)) => Some(format!("{base}/webhook")),
        _ => None,
    };

    let bot_engine = Arc::new(BotEngine::new(
        Arc::new(telegram.clone()),
        store.clone(),
        ready.clone(),
        webhook_url,
        Duration::from_secs(config.supervisor.reregister_pause_secs),
    ));
    bot_engine.initialize().await?;

    if polling {
        let api = telegram.clone();
        let health = health.clone();
        let tx = inbound_tx.clone();
        let options = PollOptions {
            timeout_secs: config.telegram.poll_timeout_secs,
            interval_ms: config.telegram.poll_interval_ms,
        };
        let cancel = cancel.clone();
        tokio::spawn(run_polling(api, health, tx, options, cancel));
        info!("delivery mode: polling");
    } else {
        info!("delivery mode: webhook");
    }

    if config.supervisor.enabled {
        let supervisor = Supervisor::new(
            SupervisorOptions {
                interval: Duration::from_secs(config.supervisor.interval_secs),
                inactivity_threshold: Duration::from_secs(
                    config.supervisor.inactivity_threshold_secs,
                ),
                max_webhook_retries: config.supervisor.max_webhook_retries,
                ping_url: external_url.map(|base| format!("{base}/health")),
            },
            health.clone(),
            Arc::new(telegram.clone()),
            bot_engine.clone(),
        );
        let cancel = cancel.clone();
        tokio::spawn(async move { supervisor.run(cancel).await });
    } else {
        info!("supervisor disabled by configuration");
    }

    let transport: Arc<dyn ChatTransport> = Arc::new(telegram);
    run_dispatcher(inbound_rx, store, engine, transport, cancel.clone()).await;

    // Stop accepting new updates, then let in-flight tasks wind down.
    if let Err(e) = bot_engine.teardown().await {
        warn!(error = %e, "webhook teardown failed during shutdown");
    }
    tokio::time::sleep(SHUTDOWN_GRACE).await;
    info!("citabot stopped");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("citabot={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
