// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Citabot booking bot.
//!
//! Provides the foundational trait definitions, error type, delivery health
//! record, and common types used throughout the Citabot workspace.

pub mod error;
pub mod health;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::CitabotError;
pub use health::DeliveryHealth;
pub use traits::{CalendarGateway, ChatTransport, DeliveryEndpoint, IdentityProbe};
pub use types::{
    Appointment, AppointmentId, Button, ChatId, EventClass, EventKind, InboundEvent, Reply,
};
