// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion between Telegram updates and Citabot inbound events.

use citabot_core::{ChatId, EventKind, InboundEvent};
use teloxide::types::{Update, UpdateKind};

/// Maps one Telegram update to an inbound event.
///
/// Returns `None` for updates the dialogue has no use for: non-text
/// messages, callbacks without an originating message, and update kinds
/// other than messages and callback queries.
pub fn update_to_event(update: &Update) -> Option<InboundEvent> {
    match &update.kind {
        UpdateKind::Message(msg) => {
            let text = msg.text()?;
            let kind = if text.starts_with('/') {
                EventKind::Command(text.to_string())
            } else {
                EventKind::Text(text.to_string())
            };
            Some(InboundEvent {
                chat: ChatId(msg.chat.id.0),
                kind,
            })
        }
        UpdateKind::CallbackQuery(query) => {
            let chat = query.message.as_ref().map(|m| m.chat().id)?;
            let data = query.data.clone()?;
            Some(InboundEvent {
                chat: ChatId(chat.0),
                kind: EventKind::Callback {
                    id: query.id.0.clone(),
                    data,
                },
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update_from_json(json: serde_json::Value) -> Update {
        // Round-trip through a string: teloxide's flatten-based Update
        // deserializer does not survive serde_json::from_value.
        serde_json::from_str(&json.to_string()).expect("valid update fixture")
    }

    fn text_update(text: &str) -> Update {
        update_from_json(serde_json::json!({
            "update_id": 1,
            "message": {
                "message_id": 10,
                "date": 1717243200,
                "chat": {"id": 42, "type": "private", "first_name": "Ana"},
                "from": {"id": 42, "is_bot": false, "first_name": "Ana"},
                "text": text
            }
        }))
    }

    #[test]
    fn plain_text_maps_to_text_event() {
        let event = update_to_event(&text_update("2025-06-01 14:00")).expect("mapped");
        assert_eq!(event.chat, ChatId(42));
        assert_eq!(event.kind, EventKind::Text("2025-06-01 14:00".into()));
    }

    #[test]
    fn slash_prefix_maps_to_command() {
        let event = update_to_event(&text_update("/start")).expect("mapped");
        assert_eq!(event.kind, EventKind::Command("/start".into()));
    }

    #[test]
    fn callback_query_maps_with_id_and_data() {
        let update = update_from_json(serde_json::json!({
            "update_id": 2,
            "callback_query": {
                "id": "cbq-77",
                "from": {"id": 42, "is_bot": false, "first_name": "Ana"},
                "chat_instance": "ci",
                "data": "book",
                "message": {
                    "message_id": 11,
                    "date": 1717243200,
                    "chat": {"id": 42, "type": "private", "first_name": "Ana"},
                    "text": "What would you like to do?"
                }
            }
        }));
        let event = update_to_event(&update).expect("mapped");
        assert_eq!(event.chat, ChatId(42));
        assert_eq!(
            event.kind,
            EventKind::Callback {
                id: "cbq-77".into(),
                data: "book".into()
            }
        );
    }

    #[test]
    fn callback_without_message_is_dropped() {
        let update = update_from_json(serde_json::json!({
            "update_id": 3,
            "callback_query": {
                "id": "cbq-78",
                "from": {"id": 42, "is_bot": false, "first_name": "Ana"},
                "chat_instance": "ci",
                "data": "book"
            }
        }));
        assert!(update_to_event(&update).is_none());
    }

    #[test]
    fn non_text_message_is_dropped() {
        let update = update_from_json(serde_json::json!({
            "update_id": 4,
            "message": {
                "message_id": 12,
                "date": 1717243200,
                "chat": {"id": 42, "type": "private", "first_name": "Ana"},
                "from": {"id": 42, "is_bot": false, "first_name": "Ana"},
                "sticker": {
                    "file_id": "f", "file_unique_id": "fu",
                    "type": "regular",
                    "width": 512, "height": 512,
                    "is_animated": false, "is_video": false
                }
            }
        }));
        assert!(update_to_event(&update).is_none());
    }
}
