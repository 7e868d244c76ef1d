// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Calendar gateway for the Citabot booking bot.
//!
//! Implements the `CalendarGateway` trait against the Calendar v3 events
//! API using a service-account identity. No credentials or tokens ever
//! leave this crate.

pub mod auth;
pub mod client;
pub mod types;

pub use auth::{ServiceAccountKey, TokenSource, load_service_account};
pub use client::GoogleCalendar;

use citabot_config::CitabotConfig;
use citabot_core::CitabotError;

/// Builds the calendar gateway from validated configuration.
///
/// Expects `calendar.calendar_id` and `calendar.service_account` to be
/// present; `validate_for_serve` guarantees this before serving starts.
pub fn from_config(
    config: &CitabotConfig,
    http: reqwest::Client,
) -> Result<GoogleCalendar, CitabotError> {
    let calendar_id = config
        .calendar
        .calendar_id
        .as_deref()
        .ok_or_else(|| CitabotError::Config("calendar.calendar_id is not set".into()))?;
    let key_source = config
        .calendar
        .service_account
        .as_deref()
        .ok_or_else(|| CitabotError::Config("calendar.service_account is not set".into()))?;

    let key = load_service_account(key_source)?;
    let tokens = TokenSource::new(key, http.clone());

    Ok(GoogleCalendar::new(
        http,
        tokens,
        calendar_id,
        config.calendar.time_zone.clone(),
    ))
}
