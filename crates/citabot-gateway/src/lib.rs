// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook and health HTTP surface for the Citabot booking bot.
//!
//! One small axum app: the Telegram webhook entry point, the hosting
//! platform's health probe, and the root endpoint the keep-alive
//! self-ping hits.

pub mod handlers;
pub mod server;

pub use server::{GatewayState, router, start_server};
