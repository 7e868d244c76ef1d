// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Citabot booking bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Citabot configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CitabotConfig {
    /// Bot identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Telegram bot integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Calendar service settings.
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// HTTP server settings (webhook ingress + liveness).
    #[serde(default)]
    pub server: ServerConfig,

    /// Resilience supervisor settings.
    #[serde(default)]
    pub supervisor: SupervisorConfig,
}

/// Bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the bot.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "citabot".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// How inbound chat events are delivered to the dialogue engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Telegram pushes each update to the `/webhook` ingress endpoint.
    #[default]
    Webhook,
    /// Citabot long-polls Telegram's `getUpdates`.
    Polling,
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Required at serve time.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Delivery strategy for inbound events.
    #[serde(default)]
    pub mode: DeliveryMode,

    /// Long-poll wait per `getUpdates` call, in seconds (pull mode).
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u32,

    /// Minimum delay between `getUpdates` calls, in milliseconds (pull mode).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            mode: DeliveryMode::default(),
            poll_timeout_secs: default_poll_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_poll_timeout_secs() -> u32 {
    25
}

fn default_poll_interval_ms() -> u64 {
    500
}

/// Calendar service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CalendarConfig {
    /// Google Calendar identifier to book appointments into.
    #[serde(default)]
    pub calendar_id: Option<String>,

    /// Service-account credential: either the JSON document inline or a
    /// path to a JSON key file.
    #[serde(default)]
    pub service_account: Option<String>,

    /// IANA time-zone label submitted with every appointment instant.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,

    /// Appointment length used when the user does not specify one.
    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: i64,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            calendar_id: None,
            service_account: None,
            time_zone: default_time_zone(),
            default_duration_minutes: default_duration_minutes(),
        }
    }
}

fn default_time_zone() -> String {
    "America/Mexico_City".to_string()
}

fn default_duration_minutes() -> i64 {
    30
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Externally reachable base URL (e.g. the hosting platform's public
    /// URL). Required in webhook mode; also the self-ping target.
    #[serde(default)]
    pub external_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            external_url: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Resilience supervisor configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SupervisorConfig {
    /// Whether the supervisor loop runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seconds between supervisor cycles.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Seconds without inbound activity before an active health probe runs.
    #[serde(default = "default_inactivity_threshold_secs")]
    pub inactivity_threshold_secs: u64,

    /// Consecutive probe failures tolerated before a full reinitialization.
    #[serde(default = "default_max_webhook_retries")]
    pub max_webhook_retries: u32,

    /// Pause between webhook unregister and re-register, in seconds.
    #[serde(default = "default_reregister_pause_secs")]
    pub reregister_pause_secs: u64,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            interval_secs: default_interval_secs(),
            inactivity_threshold_secs: default_inactivity_threshold_secs(),
            max_webhook_retries: default_max_webhook_retries(),
            reregister_pause_secs: default_reregister_pause_secs(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    600
}

fn default_inactivity_threshold_secs() -> u64 {
    1800
}

fn default_max_webhook_retries() -> u32 {
    3
}

fn default_reregister_pause_secs() -> u64 {
    1
}
