// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end dialogue flows through the public crate API: events in,
//! replies and gateway calls out, with the dispatcher in the loop.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use citabot_agent::{ConversationStore, DialogueEngine, run_dispatcher};
use citabot_core::{
    Appointment, AppointmentId, CalendarGateway, ChatId, ChatTransport, CitabotError, EventKind,
    InboundEvent, Reply,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct FakeCalendar {
    created: Mutex<Vec<(String, String, NaiveDateTime)>>,
    deleted: Mutex<Vec<String>>,
}

#[async_trait]
impl CalendarGateway for FakeCalendar {
    async fn create(
        &self,
        subject: &str,
        description: &str,
        start: NaiveDateTime,
        _duration_minutes: i64,
    ) -> Result<AppointmentId, CitabotError> {
        let mut created = self.created.lock().expect("lock");
        created.push((subject.to_string(), description.to_string(), start));
        Ok(AppointmentId(format!("ev{}", created.len())))
    }

    async fn delete(&self, id: &AppointmentId) -> Result<(), CitabotError> {
        self.deleted.lock().expect("lock").push(id.0.clone());
        Ok(())
    }

    async fn list_upcoming(&self, _max: usize) -> Result<Vec<Appointment>, CitabotError> {
        Ok(vec![])
    }
}

#[derive(Default)]
struct FakeTransport {
    sent: Mutex<Vec<(ChatId, Reply)>>,
}

#[async_trait]
impl ChatTransport for FakeTransport {
    async fn send(&self, chat: ChatId, reply: Reply) -> Result<(), CitabotError> {
        self.sent.lock().expect("lock").push((chat, reply));
        Ok(())
    }
}

fn text_event(chat: i64, text: &str) -> InboundEvent {
    InboundEvent {
        chat: ChatId(chat),
        kind: EventKind::Text(text.into()),
    }
}

fn callback_event(chat: i64, data: &str) -> InboundEvent {
    InboundEvent {
        chat: ChatId(chat),
        kind: EventKind::Callback {
            id: "cb".into(),
            data: data.into(),
        },
    }
}

#[tokio::test]
async fn full_booking_through_the_dispatcher() {
    let calendar = Arc::new(FakeCalendar::default());
    let transport = Arc::new(FakeTransport::default());
    let store = Arc::new(ConversationStore::new());
    let engine = Arc::new(DialogueEngine::new(calendar.clone(), 30));
    let (tx, rx) = mpsc::channel(16);
    let cancel = CancellationToken::new();

    let dispatcher = tokio::spawn(run_dispatcher(
        rx,
        store,
        engine,
        transport.clone(),
        cancel.clone(),
    ));

    let script = [
        InboundEvent {
            chat: ChatId(9),
            kind: EventKind::Command("/start".into()),
        },
        callback_event(9, "book"),
        text_event(9, "2025-06-01 14:00"),
        text_event(9, "yes"),
        text_event(9, "Dentist / checkup"),
    ];
    for event in script {
        tx.send(event).await.expect("send");
        // Events for one chat are serialized by the conversation lock,
        // but give each spawned task time to run so the script stays
        // in order end to end.
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    cancel.cancel();
    dispatcher.await.expect("dispatcher");

    let created = calendar.created.lock().expect("lock").clone();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].0, "Dentist");
    assert_eq!(created[0].1, "checkup");
    assert_eq!(
        created[0].2,
        NaiveDateTime::parse_from_str("2025-06-01 14:00", "%Y-%m-%d %H:%M").expect("date")
    );

    let sent = transport.sent.lock().expect("lock");
    assert!(
        sent.iter()
            .any(|(chat, reply)| *chat == ChatId(9) && reply.text.contains("Booked")),
        "user sees a booking confirmation"
    );
}

#[tokio::test]
async fn unknown_chat_gets_a_conversation_automatically() {
    let calendar = Arc::new(FakeCalendar::default());
    let transport = Arc::new(FakeTransport::default());
    let store = Arc::new(ConversationStore::new());
    let engine = Arc::new(DialogueEngine::new(calendar, 30));
    let (tx, rx) = mpsc::channel(16);
    let cancel = CancellationToken::new();

    let dispatcher = tokio::spawn(run_dispatcher(
        rx,
        store.clone(),
        engine,
        transport.clone(),
        cancel.clone(),
    ));

    // First contact is free text, not /start; the bot still answers.
    tx.send(text_event(5, "hello")).await.expect("send");
    tokio::time::sleep(Duration::from_millis(50)).await;

    cancel.cancel();
    dispatcher.await.expect("dispatcher");

    assert_eq!(store.len(), 1);
    assert!(!transport.sent.lock().expect("lock").is_empty());
}
