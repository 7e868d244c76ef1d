// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Google Calendar v3 events API.

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use citabot_core::{Appointment, AppointmentId, CalendarGateway, CitabotError};
use tracing::debug;

use crate::auth::TokenSource;
use crate::types::{ApiErrorResponse, CreatedEvent, EventDateTime, EventList, EventResource};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Wire format for event instants, local wall-clock with no offset; the
/// accompanying timeZone field supplies the zone.
const WIRE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Google Calendar backed implementation of [`CalendarGateway`].
pub struct GoogleCalendar {
    http: reqwest::Client,
    tokens: TokenSource,
    base_url: String,
    calendar_id: String,
    time_zone: String,
}

impl GoogleCalendar {
    pub fn new(
        http: reqwest::Client,
        tokens: TokenSource,
        calendar_id: impl Into<String>,
        time_zone: impl Into<String>,
    ) -> Self {
        Self {
            http,
            tokens,
            base_url: DEFAULT_BASE_URL.to_string(),
            calendar_id: calendar_id.into(),
            time_zone: time_zone.into(),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{}/events", self.base_url, self.calendar_id)
    }

    fn wire_datetime(&self, instant: NaiveDateTime) -> EventDateTime {
        EventDateTime {
            date_time: Some(instant.format(WIRE_DATETIME_FORMAT).to_string()),
            time_zone: Some(self.time_zone.clone()),
        }
    }

    /// Maps a non-success response into a gateway error, preferring the
    /// API's own error message when the body carries one.
    async fn error_from_response(
        operation: &str,
        response: reqwest::Response,
    ) -> CitabotError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if let Ok(parsed) = serde_json::from_str::<ApiErrorResponse>(&body) {
            return CitabotError::gateway(format!(
                "calendar {operation} failed: {} ({})",
                parsed.error.message, parsed.error.code
            ));
        }

        CitabotError::gateway(format!("calendar {operation} returned {status}: {body}"))
    }
}

#[async_trait]
impl CalendarGateway for GoogleCalendar {
    async fn create(
        &self,
        subject: &str,
        description: &str,
        start: NaiveDateTime,
        duration_minutes: i64,
    ) -> Result<AppointmentId, CitabotError> {
        let token = self.tokens.access_token().await?;
        let end = start + Duration::minutes(duration_minutes);

        let body = EventResource {
            summary: subject.to_string(),
            description: description.to_string(),
            start: self.wire_datetime(start),
            end: self.wire_datetime(end),
        };

        debug!(subject, %start, duration_minutes, "creating calendar event");

        let response = self
            .http
            .post(self.events_url())
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .map_err(|e| CitabotError::Gateway {
                message: format!("calendar create request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        if !response.status().is_success() {
            return Err(Self::error_from_response("create", response).await);
        }

        let created: CreatedEvent = response.json().await.map_err(|e| CitabotError::Gateway {
            message: format!("calendar create response unreadable: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(AppointmentId(created.id))
    }

    async fn delete(&self, id: &AppointmentId) -> Result<(), CitabotError> {
        let token = self.tokens.access_token().await?;

        debug!(event_id = %id, "deleting calendar event");

        let response = self
            .http
            .delete(format!("{}/{}", self.events_url(), id))
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| CitabotError::Gateway {
                message: format!("calendar delete request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        if !response.status().is_success() {
            return Err(Self::error_from_response("delete", response).await);
        }

        Ok(())
    }

    async fn list_upcoming(&self, max: usize) -> Result<Vec<Appointment>, CitabotError> {
        let token = self.tokens.access_token().await?;
        let time_min = chrono::Utc::now().to_rfc3339();

        let response = self
            .http
            .get(self.events_url())
            .bearer_auth(&token)
            .query(&[
                ("timeMin", time_min.as_str()),
                ("maxResults", &max.to_string()),
                ("singleEvents", "true"),
                ("orderBy", "startTime"),
            ])
            .send()
            .await
            .map_err(|e| CitabotError::Gateway {
                message: format!("calendar list request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        if !response.status().is_success() {
            return Err(Self::error_from_response("list", response).await);
        }

        let list: EventList = response.json().await.map_err(|e| CitabotError::Gateway {
            message: format!("calendar list response unreadable: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(list
            .items
            .into_iter()
            .filter_map(item_to_appointment)
            .collect())
    }
}

/// Converts one listed event into an [`Appointment`]. Returns `None` for
/// all-day events and entries without a parseable start instant.
fn item_to_appointment(item: crate::types::EventItem) -> Option<Appointment> {
    let start_raw = item.start.as_ref()?.date_time.as_deref()?;
    let start = parse_wire_datetime(start_raw)?;

    let duration_minutes = item
        .end
        .as_ref()
        .and_then(|end| end.date_time.as_deref())
        .and_then(parse_wire_datetime)
        .map(|end| (end - start).num_minutes())
        .filter(|minutes| *minutes > 0)
        .unwrap_or(30);

    Some(Appointment {
        id: AppointmentId(item.id),
        subject: item.summary.unwrap_or_default(),
        description: item.description.unwrap_or_default(),
        start,
        duration_minutes,
    })
}

/// Parses an event instant, tolerating both the offset-suffixed form the
/// API returns (`2025-06-01T14:00:00-06:00`) and the bare local form.
fn parse_wire_datetime(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(with_offset) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, WIRE_DATETIME_FORMAT).ok()
}
