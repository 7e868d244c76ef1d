// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dialogue states, per-conversation data, and the transition table.
//!
//! The table is the single source of truth for which `(state, event
//! class)` pairs are meaningful. Any pair absent from it is invalid
//! input: the engine leaves state and draft untouched and emits a
//! corrective prompt.

use chrono::NaiveDateTime;
use citabot_core::{Appointment, ChatId, EventClass};
use strum::Display;

/// Dialogue position of one conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum DialogState {
    /// At the main menu, waiting for an action button.
    ChoosingAction,
    /// Booking: waiting for a start instant.
    EnteringDate,
    /// Booking: waiting for yes/no on the parsed instant.
    ConfirmingDate,
    /// Booking: waiting for `subject / description` text.
    EnteringName,
    /// Rescheduling: waiting for an appointment button.
    SelectingEvent,
    /// Rescheduling: waiting for the replacement start instant.
    EnteringNewDate,
}

/// Identifies the engine routine that services one table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// Slash commands; `/start` resets from anywhere.
    StartCommand,
    /// Menu button presses, including `cancel:<id>` selections.
    Menu,
    /// Free text at the menu; re-shows the menu.
    MenuText,
    EnterDate,
    ConfirmDate,
    EnterName,
    SelectEvent,
    EnterNewDate,
}

/// One row of the transition table.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    pub state: DialogState,
    pub class: EventClass,
    pub handler: Handler,
}

const fn row(state: DialogState, class: EventClass, handler: Handler) -> Transition {
    Transition {
        state,
        class,
        handler,
    }
}

/// Every meaningful `(state, class)` pair. Commands route to the same
/// handler from every state so `/start` is a global reset.
pub static TRANSITIONS: &[Transition] = &[
    row(
        DialogState::ChoosingAction,
        EventClass::Command,
        Handler::StartCommand,
    ),
    row(
        DialogState::ChoosingAction,
        EventClass::Callback,
        Handler::Menu,
    ),
    row(
        DialogState::ChoosingAction,
        EventClass::Text,
        Handler::MenuText,
    ),
    row(
        DialogState::EnteringDate,
        EventClass::Command,
        Handler::StartCommand,
    ),
    row(
        DialogState::EnteringDate,
        EventClass::Text,
        Handler::EnterDate,
    ),
    row(
        DialogState::ConfirmingDate,
        EventClass::Command,
        Handler::StartCommand,
    ),
    row(
        DialogState::ConfirmingDate,
        EventClass::Text,
        Handler::ConfirmDate,
    ),
    row(
        DialogState::EnteringName,
        EventClass::Command,
        Handler::StartCommand,
    ),
    row(
        DialogState::EnteringName,
        EventClass::Text,
        Handler::EnterName,
    ),
    row(
        DialogState::SelectingEvent,
        EventClass::Command,
        Handler::StartCommand,
    ),
    row(
        DialogState::SelectingEvent,
        EventClass::Callback,
        Handler::SelectEvent,
    ),
    row(
        DialogState::EnteringNewDate,
        EventClass::Command,
        Handler::StartCommand,
    ),
    row(
        DialogState::EnteringNewDate,
        EventClass::Text,
        Handler::EnterNewDate,
    ),
];

/// Table lookup; `None` means invalid input for the current state.
pub fn lookup(state: DialogState, class: EventClass) -> Option<Handler> {
    TRANSITIONS
        .iter()
        .find(|t| t.state == state && t.class == class)
        .map(|t| t.handler)
}

/// Mutable per-conversation scratch space for the flow in progress.
#[derive(Debug, Clone, Default)]
pub struct BookingDraft {
    /// Parsed but not yet confirmed start instant.
    pub start: Option<NaiveDateTime>,
    /// Appointments offered as reschedule targets, keyed by button data.
    pub candidates: Vec<Appointment>,
    /// Appointment chosen for rescheduling.
    pub selected: Option<Appointment>,
    /// True once the old appointment was deleted, so a retry after a
    /// failed re-create does not delete twice.
    pub old_removed: bool,
}

impl BookingDraft {
    pub fn clear(&mut self) {
        *self = BookingDraft::default();
    }
}

/// One chat's dialogue position and draft.
#[derive(Debug, Clone)]
pub struct Conversation {
    pub chat: ChatId,
    pub state: DialogState,
    pub draft: BookingDraft,
}

impl Conversation {
    pub fn new(chat: ChatId) -> Self {
        Self {
            chat,
            state: DialogState::ChoosingAction,
            draft: BookingDraft::default(),
        }
    }

    /// Terminal transition: back to the menu with nothing pending.
    pub fn reset(&mut self) {
        self.state = DialogState::ChoosingAction;
        self.draft.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_enumeration_of_state_and_class_pairs() {
        use DialogState::*;
        use EventClass::*;
        use Handler as H;

        // Every (state, class) combination and its routing; `None`
        // rows are invalid input for that state.
        let expected: [(DialogState, EventClass, Option<Handler>); 18] = [
            (ChoosingAction, Command, Some(H::StartCommand)),
            (ChoosingAction, Text, Some(H::MenuText)),
            (ChoosingAction, Callback, Some(H::Menu)),
            (EnteringDate, Command, Some(H::StartCommand)),
            (EnteringDate, Text, Some(H::EnterDate)),
            (EnteringDate, Callback, None),
            (ConfirmingDate, Command, Some(H::StartCommand)),
            (ConfirmingDate, Text, Some(H::ConfirmDate)),
            (ConfirmingDate, Callback, None),
            (EnteringName, Command, Some(H::StartCommand)),
            (EnteringName, Text, Some(H::EnterName)),
            (EnteringName, Callback, None),
            (SelectingEvent, Command, Some(H::StartCommand)),
            (SelectingEvent, Text, None),
            (SelectingEvent, Callback, Some(H::SelectEvent)),
            (EnteringNewDate, Command, Some(H::StartCommand)),
            (EnteringNewDate, Text, Some(H::EnterNewDate)),
            (EnteringNewDate, Callback, None),
        ];

        for (state, class, handler) in expected {
            assert_eq!(
                lookup(state, class),
                handler,
                "routing for ({state}, {class})"
            );
        }
    }

    #[test]
    fn every_state_accepts_commands() {
        let states = [
            DialogState::ChoosingAction,
            DialogState::EnteringDate,
            DialogState::ConfirmingDate,
            DialogState::EnteringName,
            DialogState::SelectingEvent,
            DialogState::EnteringNewDate,
        ];
        for state in states {
            assert_eq!(
                lookup(state, EventClass::Command),
                Some(Handler::StartCommand),
                "commands must be routable from {state}"
            );
        }
    }

    #[test]
    fn table_has_no_duplicate_pairs() {
        for (i, a) in TRANSITIONS.iter().enumerate() {
            for b in &TRANSITIONS[i + 1..] {
                assert!(
                    !(a.state == b.state && a.class == b.class),
                    "duplicate entry for ({}, {})",
                    a.state,
                    a.class
                );
            }
        }
    }

    #[test]
    fn text_entry_states_accept_text_only_plus_commands() {
        for state in [
            DialogState::EnteringDate,
            DialogState::ConfirmingDate,
            DialogState::EnteringName,
            DialogState::EnteringNewDate,
        ] {
            assert!(lookup(state, EventClass::Text).is_some());
            assert!(lookup(state, EventClass::Callback).is_none());
        }
    }

    #[test]
    fn selecting_event_ignores_free_text() {
        assert!(lookup(DialogState::SelectingEvent, EventClass::Text).is_none());
        assert_eq!(
            lookup(DialogState::SelectingEvent, EventClass::Callback),
            Some(Handler::SelectEvent)
        );
    }

    #[test]
    fn reset_returns_to_menu_and_clears_draft() {
        let mut conv = Conversation::new(ChatId(1));
        conv.state = DialogState::EnteringName;
        conv.draft.start = Some(
            NaiveDateTime::parse_from_str("2025-06-01 14:00", "%Y-%m-%d %H:%M").expect("datetime"),
        );
        conv.reset();
        assert_eq!(conv.state, DialogState::ChoosingAction);
        assert!(conv.draft.start.is_none());
        assert!(conv.draft.candidates.is_empty());
    }
}
