// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Citabot booking bot.

use thiserror::Error;

/// The primary error type used across all Citabot adapter traits and core operations.
#[derive(Debug, Error)]
pub enum CitabotError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Calendar gateway errors (authentication, quota, network, unknown appointment).
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Chat delivery errors (send failure, webhook registration, malformed payload).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CitabotError {
    /// Shorthand for a gateway error with a wrapped source.
    pub fn gateway(message: impl Into<String>) -> Self {
        CitabotError::Gateway {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a channel error without a source.
    pub fn channel(message: impl Into<String>) -> Self {
        CitabotError::Channel {
            message: message.into(),
            source: None,
        }
    }
}
