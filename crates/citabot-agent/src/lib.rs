// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dialogue engine, dispatcher, and resilience supervisor for the
//! Citabot booking bot.
//!
//! The modules split along the two halves of the design:
//! - Dialogue: [`dialog`] (states + transition table), [`engine`]
//!   (conversation logic), [`store`] and [`dispatch`] (per-conversation
//!   serialization and fan-out).
//! - Resilience: [`supervisor`] (health ladder), [`lifecycle`]
//!   (webhook bind/unbind + reinit), [`shutdown`] (signals).

pub mod dialog;
pub mod dispatch;
pub mod engine;
pub mod lifecycle;
pub mod shutdown;
pub mod store;
pub mod supervisor;

pub use dialog::{Conversation, DialogState};
pub use dispatch::run_dispatcher;
pub use engine::DialogueEngine;
pub use lifecycle::BotEngine;
pub use shutdown::install_signal_handler;
pub use store::ConversationStore;
pub use supervisor::{EngineControl, Supervisor, SupervisorOptions};
