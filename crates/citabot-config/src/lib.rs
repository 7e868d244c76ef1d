// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Citabot booking bot.
//!
//! TOML files merged through Figment (defaults < system < XDG < local),
//! with `CITABOT_`-prefixed environment variable overrides on top.

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{CitabotConfig, DeliveryMode};
pub use validation::validate_for_serve;
