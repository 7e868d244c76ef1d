// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Google Calendar v3 events API.

use serde::{Deserialize, Serialize};

/// A dateTime + timeZone pair as the events API expects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    /// Local wall-clock instant, `YYYY-MM-DDTHH:MM:SS`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    /// IANA time-zone label the instant is expressed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// Request body for event insertion.
#[derive(Debug, Clone, Serialize)]
pub struct EventResource {
    pub summary: String,
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

/// The subset of the insert response we care about.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedEvent {
    pub id: String,
}

/// Response body for event listing.
#[derive(Debug, Clone, Deserialize)]
pub struct EventList {
    #[serde(default)]
    pub items: Vec<EventItem>,
}

/// One listed event. All-day events carry `start.date` instead of
/// `start.dateTime` and are skipped by the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct EventItem {
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start: Option<EventDateTime>,
    #[serde(default)]
    pub end: Option<EventDateTime>,
}

/// Error envelope returned by the API on failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub code: i64,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_resource_serializes_camel_case() {
        let body = EventResource {
            summary: "Dentist".into(),
            description: "checkup".into(),
            start: EventDateTime {
                date_time: Some("2025-06-01T14:00:00".into()),
                time_zone: Some("America/Mexico_City".into()),
            },
            end: EventDateTime {
                date_time: Some("2025-06-01T14:30:00".into()),
                time_zone: Some("America/Mexico_City".into()),
            },
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["start"]["dateTime"], "2025-06-01T14:00:00");
        assert_eq!(json["start"]["timeZone"], "America/Mexico_City");
        assert_eq!(json["end"]["dateTime"], "2025-06-01T14:30:00");
    }

    #[test]
    fn event_list_tolerates_missing_fields() {
        let json = r#"{"items":[{"id":"ev1"},{"id":"ev2","summary":"Dentist","start":{"dateTime":"2025-06-01T14:00:00-06:00"}}]}"#;
        let list: EventList = serde_json::from_str(json).expect("parse");
        assert_eq!(list.items.len(), 2);
        assert!(list.items[0].start.is_none());
        assert_eq!(list.items[1].summary.as_deref(), Some("Dentist"));
    }

    #[test]
    fn empty_list_body_parses() {
        let list: EventList = serde_json::from_str("{}").expect("parse");
        assert!(list.items.is_empty());
    }
}
