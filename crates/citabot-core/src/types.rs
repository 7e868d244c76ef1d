// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Citabot workspace.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Identifies one chat party. Unique per Telegram chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque appointment identifier owned by the external calendar service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppointmentId(pub String);

impl std::fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One inbound unit from the chat platform.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    /// Chat the event originates from.
    pub chat: ChatId,
    /// Event payload.
    pub kind: EventKind,
}

/// Payload of an inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A slash command, including the leading `/` (e.g. `/start`).
    Command(String),
    /// Free-form message text.
    Text(String),
    /// An inline-button selection. `id` is the platform callback id used
    /// for acknowledgement; `data` is the button payload.
    Callback { id: String, data: String },
}

impl EventKind {
    /// The payload-free classification used by the dialogue transition table.
    pub fn class(&self) -> EventClass {
        match self {
            EventKind::Command(_) => EventClass::Command,
            EventKind::Text(_) => EventClass::Text,
            EventKind::Callback { .. } => EventClass::Callback,
        }
    }
}

/// Payload-free event classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum EventClass {
    Command,
    Text,
    Callback,
}

/// A single inline button: visible label plus the callback payload it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub data: String,
}

impl Button {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// An outbound reply: text, optionally with an inline keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Rows of inline buttons, outer Vec is rows.
    pub keyboard: Option<Vec<Vec<Button>>>,
}

impl Reply {
    /// Plain text reply.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    /// Text reply with an inline keyboard.
    pub fn with_keyboard(text: impl Into<String>, keyboard: Vec<Vec<Button>>) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

/// An appointment as seen through the calendar gateway. Never cached
/// beyond the processing of a single dialogue step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: AppointmentId,
    pub subject: String,
    pub description: String,
    /// Start instant in the calendar's configured time zone.
    pub start: NaiveDateTime,
    pub duration_minutes: i64,
}
