// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic validation beyond what serde can express.
//!
//! Deserialization catches type errors and unknown keys; this module checks
//! the cross-field requirements the `serve` command depends on.

use crate::model::{CitabotConfig, DeliveryMode};

/// Validates the configuration for running `citabot serve`.
///
/// Returns every problem found, not just the first, so the user can fix
/// them in one pass.
pub fn validate_for_serve(config: &CitabotConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    match config.telegram.bot_token.as_deref() {
        None => errors.push(
            "telegram.bot_token is required (set CITABOT_TELEGRAM_BOT_TOKEN or the config key)"
                .to_string(),
        ),
        Some("") => errors.push("telegram.bot_token cannot be empty".to_string()),
        Some(_) => {}
    }

    if config.calendar.calendar_id.as_deref().is_none_or(str::is_empty) {
        errors.push("calendar.calendar_id is required".to_string());
    }

    if config.calendar.service_account.as_deref().is_none_or(str::is_empty) {
        errors.push(
            "calendar.service_account is required (inline JSON or a key file path)".to_string(),
        );
    }

    if config.calendar.default_duration_minutes <= 0 {
        errors.push("calendar.default_duration_minutes must be positive".to_string());
    }

    if config.telegram.mode == DeliveryMode::Webhook
        && config.server.external_url.as_deref().is_none_or(str::is_empty)
    {
        errors.push("server.external_url is required in webhook mode".to_string());
    }

    if config.supervisor.max_webhook_retries == 0 {
        errors.push("supervisor.max_webhook_retries must be at least 1".to_string());
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
