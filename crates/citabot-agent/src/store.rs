// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory conversation store.
//!
//! One entry per chat, each behind its own async mutex so events for
//! the same chat are processed strictly in order while distinct chats
//! never contend. Nothing survives a restart.

use std::sync::Arc;

use citabot_core::ChatId;
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::dialog::Conversation;

#[derive(Default)]
pub struct ConversationStore {
    conversations: DashMap<ChatId, Arc<Mutex<Conversation>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the conversation for `chat`, creating it at the menu
    /// state on first contact.
    pub fn get_or_create(&self, chat: ChatId) -> Arc<Mutex<Conversation>> {
        self.conversations
            .entry(chat)
            .or_insert_with(|| Arc::new(Mutex::new(Conversation::new(chat))))
            .clone()
    }

    /// Drops every conversation. Used by full reinitialization.
    pub fn clear(&self) {
        self.conversations.clear();
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}
