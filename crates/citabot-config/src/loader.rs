// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./citabot.toml` > `~/.config/citabot/citabot.toml`
//! > `/etc/citabot/citabot.toml` with environment variable overrides via the
//! `CITABOT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::CitabotConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/citabot/citabot.toml` (system-wide)
/// 3. `~/.config/citabot/citabot.toml` (user XDG config)
/// 4. `./citabot.toml` (local directory)
/// 5. `CITABOT_*` environment variables
pub fn load_config() -> Result<CitabotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CitabotConfig::default()))
        .merge(Toml::file("/etc/citabot/citabot.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("citabot/citabot.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("citabot.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<CitabotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CitabotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CitabotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CitabotConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `CITABOT_TELEGRAM_BOT_TOKEN` must map to
/// `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("CITABOT_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: CITABOT_CALENDAR_SERVICE_ACCOUNT -> "calendar_service_account"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("calendar_", "calendar.", 1)
            .replacen("server_", "server.", 1)
            .replacen("supervisor_", "supervisor.", 1);
        mapped.into()
    })
}
