// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Citabot configuration system.

use citabot_config::model::{CitabotConfig, DeliveryMode};
use citabot_config::{load_config, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_citabot_config() {
    let toml = r#"
[agent]
name = "test-bot"
log_level = "debug"

[telegram]
bot_token = "123:ABC"
mode = "polling"
poll_timeout_secs = 10
poll_interval_ms = 250

[calendar]
calendar_id = "primary"
service_account = "/tmp/sa.json"
time_zone = "Europe/Madrid"
default_duration_minutes = 45

[server]
host = "127.0.0.1"
port = 8080
external_url = "https://bot.example.com"

[supervisor]
enabled = false
interval_secs = 120
inactivity_threshold_secs = 300
max_webhook_retries = 5
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "test-bot");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.telegram.bot_token.as_deref(), Some("123:ABC"));
    assert_eq!(config.telegram.mode, DeliveryMode::Polling);
    assert_eq!(config.telegram.poll_timeout_secs, 10);
    assert_eq!(config.telegram.poll_interval_ms, 250);
    assert_eq!(config.calendar.calendar_id.as_deref(), Some("primary"));
    assert_eq!(config.calendar.time_zone, "Europe/Madrid");
    assert_eq!(config.calendar.default_duration_minutes, 45);
    assert_eq!(config.server.port, 8080);
    assert_eq!(
        config.server.external_url.as_deref(),
        Some("https://bot.example.com")
    );
    assert!(!config.supervisor.enabled);
    assert_eq!(config.supervisor.interval_secs, 120);
    assert_eq!(config.supervisor.inactivity_threshold_secs, 300);
    assert_eq!(config.supervisor.max_webhook_retries, 5);
}

/// Empty TOML yields the compiled defaults.
#[test]
fn empty_toml_yields_defaults() {
    let config = load_config_from_str("").expect("empty TOML is valid");
    let defaults = CitabotConfig::default();
    assert_eq!(config.agent.name, defaults.agent.name);
    assert_eq!(config.telegram.mode, DeliveryMode::Webhook);
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.supervisor.interval_secs, 600);
}

/// Unknown keys are rejected rather than silently ignored.
#[test]
fn unknown_field_is_rejected() {
    let toml = r#"
[telegram]
bot_tokn = "typo"
"#;
    let err = load_config_from_str(toml).expect_err("typo key should fail");
    assert!(err.to_string().contains("bot_tokn"), "error was: {err}");
}

/// Environment variables override file values, with underscore-containing
/// keys mapped correctly.
#[test]
fn env_vars_override_with_correct_key_mapping() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("CITABOT_TELEGRAM_BOT_TOKEN", "999:ENV");
        jail.set_env("CITABOT_SERVER_EXTERNAL_URL", "https://env.example.com");
        jail.set_env("CITABOT_SUPERVISOR_MAX_WEBHOOK_RETRIES", "7");

        let config = load_config()?;
        assert_eq!(config.telegram.bot_token.as_deref(), Some("999:ENV"));
        assert_eq!(
            config.server.external_url.as_deref(),
            Some("https://env.example.com")
        );
        assert_eq!(config.supervisor.max_webhook_retries, 7);
        Ok(())
    });
}

/// An invalid delivery mode string fails loudly.
#[test]
fn invalid_mode_is_rejected() {
    let toml = r#"
[telegram]
mode = "carrier-pigeon"
"#;
    assert!(load_config_from_str(toml).is_err());
}
