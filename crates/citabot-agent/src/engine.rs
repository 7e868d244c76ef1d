// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The dialogue engine.
//!
//! Pure conversation logic over the transition table: takes the current
//! [`Conversation`] and one inbound event, mutates the conversation,
//! and returns the replies to send. Calendar access goes through the
//! [`CalendarGateway`] trait; gateway failures become an apology and
//! leave the dialogue state unchanged so the user can retry.

use std::sync::Arc;

use chrono::NaiveDateTime;
use citabot_core::{Appointment, Button, CalendarGateway, EventKind, Reply};
use tracing::{debug, info, warn};

use crate::dialog::{Conversation, DialogState, Handler, lookup};

/// The only accepted date input format.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Upper bound on appointments shown in list/cancel/reschedule menus.
const MAX_LISTED: usize = 10;

const DATE_PROMPT: &str =
    "Please send me the date and time as YYYY-MM-DD HH:MM (for example 2025-06-01 14:00).";
const NAME_PROMPT: &str =
    "What is the appointment about? Send the subject, optionally followed by / and a description (for example: Dentist / checkup).";
const GATEWAY_APOLOGY: &str =
    "Sorry, I could not reach the calendar right now. Please try again in a moment.";

/// Drives one dialogue step at a time. Shared across all conversations;
/// holds no per-conversation state.
pub struct DialogueEngine {
    gateway: Arc<dyn CalendarGateway>,
    default_duration_minutes: i64,
}

impl DialogueEngine {
    pub fn new(gateway: Arc<dyn CalendarGateway>, default_duration_minutes: i64) -> Self {
        Self {
            gateway,
            default_duration_minutes,
        }
    }

    /// Processes one event against one conversation.
    ///
    /// Never fails outward; every parsed event yields at least one reply.
    pub async fn handle(&self, conv: &mut Conversation, kind: &EventKind) -> Vec<Reply> {
        let Some(handler) = lookup(conv.state, kind.class()) else {
            debug!(chat = %conv.chat, state = %conv.state, class = %kind.class(),
                "event class not valid in this state");
            return vec![self.invalid_input(conv)];
        };

        match (handler, kind) {
            (Handler::StartCommand, EventKind::Command(command)) => {
                self.on_command(conv, command)
            }
            (Handler::Menu, EventKind::Callback { data, .. }) => self.on_menu(conv, data).await,
            (Handler::MenuText, EventKind::Text(_)) => {
                vec![
                    Reply::text("Please use the buttons below to choose an action."),
                    main_menu(),
                ]
            }
            (Handler::EnterDate, EventKind::Text(text)) => self.on_date(conv, text),
            (Handler::ConfirmDate, EventKind::Text(text)) => self.on_confirm(conv, text).await,
            (Handler::EnterName, EventKind::Text(text)) => self.on_name(conv, text).await,
            (Handler::SelectEvent, EventKind::Callback { data, .. }) => {
                self.on_select(conv, data)
            }
            (Handler::EnterNewDate, EventKind::Text(text)) => self.on_new_date(conv, text).await,
            // lookup() pairs handler and class, so payload always matches.
            _ => vec![self.invalid_input(conv)],
        }
    }

    fn on_command(&self, conv: &mut Conversation, command: &str) -> Vec<Reply> {
        if command == "/start" || command.starts_with("/start ") {
            conv.reset();
            return vec![Reply::with_keyboard(
                "Hi! I can manage your appointments. What would you like to do?",
                menu_rows(),
            )];
        }
        vec![Reply::text(
            "I only understand /start. Send /start to begin.",
        )]
    }

    async fn on_menu(&self, conv: &mut Conversation, data: &str) -> Vec<Reply> {
        if let Some(id) = data.strip_prefix("cancel:") {
            return self.cancel_appointment(conv, id).await;
        }

        match data {
            "book" => {
                conv.state = DialogState::EnteringDate;
                vec![Reply::text(DATE_PROMPT)]
            }
            "list" => self.list_appointments().await,
            "cancel" => self.offer_cancellation().await,
            "reschedule" => self.offer_reschedule(conv).await,
            other => {
                debug!(chat = %conv.chat, data = other, "unknown menu selection");
                vec![self.invalid_input(conv)]
            }
        }
    }

    async fn list_appointments(&self) -> Vec<Reply> {
        match self.gateway.list_upcoming(MAX_LISTED).await {
            Ok(appointments) if appointments.is_empty() => {
                vec![Reply::text("You have no upcoming appointments.")]
            }
            Ok(appointments) => {
                let mut lines = vec!["Your upcoming appointments:".to_string()];
                for (i, appointment) in appointments.iter().enumerate() {
                    lines.push(format!(
                        "{}. {} — {}",
                        i + 1,
                        appointment.subject,
                        appointment.start.format(DATE_FORMAT)
                    ));
                }
                vec![Reply::text(lines.join("\n"))]
            }
            Err(e) => {
                warn!(error = %e, "listing appointments failed");
                vec![Reply::text(GATEWAY_APOLOGY)]
            }
        }
    }

    async fn offer_cancellation(&self) -> Vec<Reply> {
        match self.gateway.list_upcoming(MAX_LISTED).await {
            Ok(appointments) if appointments.is_empty() => {
                vec![Reply::text("You have no upcoming appointments to cancel.")]
            }
            Ok(appointments) => {
                let rows = appointment_rows(&appointments, "cancel");
                vec![Reply::with_keyboard(
                    "Which appointment should I cancel?",
                    rows,
                )]
            }
            Err(e) => {
                warn!(error = %e, "listing appointments for cancellation failed");
                vec![Reply::text(GATEWAY_APOLOGY)]
            }
        }
    }

    async fn cancel_appointment(&self, conv: &mut Conversation, id: &str) -> Vec<Reply> {
        match self
            .gateway
            .delete(&citabot_core::AppointmentId(id.to_string()))
            .await
        {
            Ok(()) => {
                info!(chat = %conv.chat, appointment = id, "appointment cancelled");
                vec![Reply::text("Done, the appointment is cancelled.")]
            }
            Err(e) => {
                warn!(error = %e, appointment = id, "cancellation failed");
                vec![Reply::text(GATEWAY_APOLOGY)]
            }
        }
    }

    async fn offer_reschedule(&self, conv: &mut Conversation) -> Vec<Reply> {
        match self.gateway.list_upcoming(MAX_LISTED).await {
            Ok(appointments) if appointments.is_empty() => {
                vec![Reply::text(
                    "You have no upcoming appointments to reschedule.",
                )]
            }
            Ok(appointments) => {
                let rows = appointment_rows(&appointments, "select");
                conv.draft.candidates = appointments;
                conv.state = DialogState::SelectingEvent;
                vec![Reply::with_keyboard(
                    "Which appointment should I move?",
                    rows,
                )]
            }
            Err(e) => {
                warn!(error = %e, "listing appointments for reschedule failed");
                vec![Reply::text(GATEWAY_APOLOGY)]
            }
        }
    }

    fn on_date(&self, conv: &mut Conversation, text: &str) -> Vec<Reply> {
        match parse_date(text) {
            Some(start) => {
                conv.draft.start = Some(start);
                conv.state = DialogState::ConfirmingDate;
                vec![Reply::text(format!(
                    "Book it for {}? (yes/no)",
                    start.format(DATE_FORMAT)
                ))]
            }
            None => vec![Reply::text(format!(
                "I could not read that date. {DATE_PROMPT}"
            ))],
        }
    }

    async fn on_confirm(&self, conv: &mut Conversation, text: &str) -> Vec<Reply> {
        match text.trim().to_lowercase().as_str() {
            "yes" | "si" | "sí" => {
                conv.state = DialogState::EnteringName;
                vec![Reply::text(NAME_PROMPT)]
            }
            "no" => {
                conv.draft.start = None;
                conv.state = DialogState::EnteringDate;
                vec![Reply::text(format!("Alright, let's try again. {DATE_PROMPT}"))]
            }
            _ => vec![Reply::text("Please answer yes or no.")],
        }
    }

    async fn on_name(&self, conv: &mut Conversation, text: &str) -> Vec<Reply> {
        let Some(start) = conv.draft.start else {
            // Draft lost its instant; restart the flow rather than guess.
            conv.reset();
            return vec![
                Reply::text("Something went wrong with that booking, let's start over."),
                main_menu(),
            ];
        };

        let (subject, description) = split_subject(text);
        match self
            .gateway
            .create(&subject, &description, start, self.default_duration_minutes)
            .await
        {
            Ok(id) => {
                info!(chat = %conv.chat, appointment = %id, subject, "appointment booked");
                conv.reset();
                vec![
                    Reply::text(format!(
                        "Booked: {} on {}.",
                        subject,
                        start.format(DATE_FORMAT)
                    )),
                    main_menu(),
                ]
            }
            Err(e) => {
                warn!(error = %e, chat = %conv.chat, "booking failed");
                vec![Reply::text(format!(
                    "{GATEWAY_APOLOGY} Send the name again to retry."
                ))]
            }
        }
    }

    fn on_select(&self, conv: &mut Conversation, data: &str) -> Vec<Reply> {
        let Some(id) = data.strip_prefix("select:") else {
            return vec![self.invalid_input(conv)];
        };

        let Some(selected) = conv
            .draft
            .candidates
            .iter()
            .find(|a| a.id.0 == id)
            .cloned()
        else {
            return vec![Reply::text(
                "That appointment is no longer on offer. Please pick one of the buttons above.",
            )];
        };

        conv.draft.selected = Some(selected);
        conv.draft.old_removed = false;
        conv.state = DialogState::EnteringNewDate;
        vec![Reply::text(format!("When should it be instead? {DATE_PROMPT}"))]
    }

    async fn on_new_date(&self, conv: &mut Conversation, text: &str) -> Vec<Reply> {
        let Some(start) = parse_date(text) else {
            return vec![Reply::text(format!(
                "I could not read that date. {DATE_PROMPT}"
            ))];
        };

        let Some(selected) = conv.draft.selected.clone() else {
            conv.reset();
            return vec![
                Reply::text("Something went wrong with that reschedule, let's start over."),
                main_menu(),
            ];
        };

        // Delete then create; not atomic. A failure between the two
        // leaves the slot empty, and old_removed keeps a retry from
        // deleting twice.
        if !conv.draft.old_removed {
            if let Err(e) = self.gateway.delete(&selected.id).await {
                warn!(error = %e, appointment = %selected.id, "reschedule delete failed");
                return vec![Reply::text(format!(
                    "{GATEWAY_APOLOGY} Send the date again to retry."
                ))];
            }
            conv.draft.old_removed = true;
        }

        match self
            .gateway
            .create(
                &selected.subject,
                &selected.description,
                start,
                selected.duration_minutes,
            )
            .await
        {
            Ok(id) => {
                info!(chat = %conv.chat, appointment = %id, "appointment rescheduled");
                conv.reset();
                vec![
                    Reply::text(format!(
                        "Moved: {} is now on {}.",
                        selected.subject,
                        start.format(DATE_FORMAT)
                    )),
                    main_menu(),
                ]
            }
            Err(e) => {
                warn!(error = %e, chat = %conv.chat, "reschedule create failed");
                vec![Reply::text(format!(
                    "{GATEWAY_APOLOGY} Send the date again to retry."
                ))]
            }
        }
    }

    /// Corrective prompt for input the current state has no use for.
    fn invalid_input(&self, conv: &Conversation) -> Reply {
        match conv.state {
            DialogState::ChoosingAction => {
                Reply::with_keyboard("Please pick one of the actions below.", menu_rows())
            }
            DialogState::EnteringDate | DialogState::EnteringNewDate => Reply::text(DATE_PROMPT),
            DialogState::ConfirmingDate => Reply::text("Please answer yes or no."),
            DialogState::EnteringName => Reply::text(NAME_PROMPT),
            DialogState::SelectingEvent => {
                Reply::text("Please pick one of the appointments above, or send /start.")
            }
        }
    }
}

/// The main-menu reply shown after every completed flow.
pub fn main_menu() -> Reply {
    Reply::with_keyboard("What would you like to do?", menu_rows())
}

fn menu_rows() -> Vec<Vec<Button>> {
    vec![
        vec![
            Button::new("Book an appointment", "book"),
            Button::new("My appointments", "list"),
        ],
        vec![
            Button::new("Cancel", "cancel"),
            Button::new("Reschedule", "reschedule"),
        ],
    ]
}

fn appointment_rows(appointments: &[Appointment], prefix: &str) -> Vec<Vec<Button>> {
    appointments
        .iter()
        .map(|a| {
            vec![Button::new(
                format!("{} — {}", a.subject, a.start.format(DATE_FORMAT)),
                format!("{prefix}:{}", a.id.0),
            )]
        })
        .collect()
}

/// Parses the fixed `YYYY-MM-DD HH:MM` input format.
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

/// Splits `subject / description` on the first slash. The description
/// is empty when absent.
pub fn split_subject(text: &str) -> (String, String) {
    match text.split_once('/') {
        Some((subject, description)) => {
            (subject.trim().to_string(), description.trim().to_string())
        }
        None => (text.trim().to_string(), String::new()),
    }
}
