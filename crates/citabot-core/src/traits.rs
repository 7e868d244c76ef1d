// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits at the seams between the dialogue core and the outside world.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::CitabotError;
use crate::types::{Appointment, AppointmentId, ChatId, Reply};

/// External calendar service boundary.
///
/// Stateless and conversation-agnostic; safe to share across all
/// conversations. Performs no retries -- callers decide whether to
/// re-prompt the user.
#[async_trait]
pub trait CalendarGateway: Send + Sync {
    /// Creates an appointment and returns its service-assigned identifier.
    ///
    /// The end instant is `start + duration_minutes`; both instants are
    /// submitted with the gateway's fixed time-zone label.
    async fn create(
        &self,
        subject: &str,
        description: &str,
        start: NaiveDateTime,
        duration_minutes: i64,
    ) -> Result<AppointmentId, CitabotError>;

    /// Removes the appointment. Fails if the identifier is unknown.
    async fn delete(&self, id: &AppointmentId) -> Result<(), CitabotError>;

    /// Lists upcoming appointments, soonest first, at most `max` entries.
    async fn list_upcoming(&self, max: usize) -> Result<Vec<Appointment>, CitabotError>;
}

/// Outbound side of the chat platform.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Sends one reply (text, optionally with an inline keyboard) to a chat.
    async fn send(&self, chat: ChatId, reply: Reply) -> Result<(), CitabotError>;

    /// Acknowledges a button-selection callback so the client stops showing
    /// a progress indicator. Default: no-op for transports without the concept.
    async fn acknowledge_callback(&self, _callback_id: &str) -> Result<(), CitabotError> {
        Ok(())
    }
}

/// Push-delivery registration boundary (webhook bind/unbind).
#[async_trait]
pub trait DeliveryEndpoint: Send + Sync {
    /// Binds the external entry URL as the platform's push target.
    async fn register(&self, url: &str) -> Result<(), CitabotError>;

    /// Unbinds the push target. `drop_pending` discards any backlog the
    /// platform queued while no endpoint was bound.
    async fn unregister(&self, drop_pending: bool) -> Result<(), CitabotError>;
}

/// Lightweight "who am I" probe against the chat platform, used by the
/// resilience supervisor as its active health check.
#[async_trait]
pub trait IdentityProbe: Send + Sync {
    /// Returns the bot's platform identity on success.
    async fn identity(&self) -> Result<String, CitabotError>;
}
