//! Google Calendar REST client.
//!
//! Implements [`RemoteCalendar`] against the Calendar v3 API on the
//! owner's primary calendar. The client holds no credential state; the
//! access token travels with each call.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, StatusCode};
use serde_json::json;

use crate::error::SyncError;
use crate::storage::CredentialRecord;
use crate::sync::remote::{NewRemoteEvent, RemoteCalendar, RemoteDelete, RemoteEvent};
use crate::sync::types::SyncWindow;

const GOOGLE_CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";

/// Upper bound on any single provider call. A stalled call is cut off
/// here and surfaces as a network error, which the per-item isolation
/// in the sync phases treats like any other failed call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Stateless Google Calendar v3 client.
pub struct GoogleCalendarClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl GoogleCalendarClient {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
            base_url: GOOGLE_CALENDAR_API.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Client pointed at a non-default API root (used in tests).
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Override the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/primary/events", self.base_url)
    }
}

impl Default for GoogleCalendarClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteCalendar for GoogleCalendarClient {
    async fn list(
        &self,
        window: &SyncWindow,
        credential: &CredentialRecord,
    ) -> Result<Vec<RemoteEvent>, SyncError> {
        let response = self
            .http
            .get(self.events_url())
            .timeout(self.timeout)
            .query(&[
                ("timeMin", window.start.to_rfc3339()),
                ("timeMax", window.end.to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .bearer_auth(&credential.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Remote(format!("list failed ({status}): {body}")));
        }

        let body: serde_json::Value = response.json().await?;
        let items = body["items"].as_array().cloned().unwrap_or_default();

        // Entries missing an id, title or either time are dropped, not errors.
        Ok(items.iter().filter_map(parse_remote_event).collect())
    }

    async fn insert(
        &self,
        event: &NewRemoteEvent,
        credential: &CredentialRecord,
    ) -> Result<RemoteEvent, SyncError> {
        let response = self
            .http
            .post(self.events_url())
            .timeout(self.timeout)
            .bearer_auth(&credential.access_token)
            .json(&to_wire_event(event))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Remote(format!(
                "insert failed ({status}): {body}"
            )));
        }

        let body: serde_json::Value = response.json().await?;
        parse_remote_event(&body)
            .ok_or_else(|| SyncError::Remote("insert response missing event fields".to_string()))
    }

    async fn delete(
        &self,
        provider_id: &str,
        credential: &CredentialRecord,
    ) -> Result<RemoteDelete, SyncError> {
        let url = format!("{}/{}", self.events_url(), provider_id);
        let response = self
            .http
            .delete(&url)
            .timeout(self.timeout)
            .bearer_auth(&credential.access_token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(RemoteDelete::Deleted),
            StatusCode::NOT_FOUND | StatusCode::GONE => Ok(RemoteDelete::NotFound),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(SyncError::Remote(format!(
                    "delete failed ({status}): {body}"
                )))
            }
        }
    }
}

/// Parse one wire event into a RemoteEvent. Returns None for malformed
/// entries (missing id, title, start or end), which reconciliation skips.
pub fn parse_remote_event(item: &serde_json::Value) -> Option<RemoteEvent> {
    let id = item["id"].as_str()?;
    let title = item["summary"].as_str()?;

    let all_day = item["start"]["date"].is_string();
    let start = parse_wire_time(&item["start"])?;
    let end = parse_wire_time(&item["end"])?;

    Some(RemoteEvent {
        id: id.to_string(),
        title: title.to_string(),
        description: item["description"].as_str().map(String::from),
        location: item["location"].as_str().map(String::from),
        start,
        end,
        all_day,
    })
}

/// Parse a Google `start`/`end` object: `dateTime` for timed events,
/// `date` (midnight UTC) for all-day events.
fn parse_wire_time(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    if let Some(dt) = value["dateTime"].as_str() {
        return DateTime::parse_from_rfc3339(dt)
            .map(|dt| dt.with_timezone(&Utc))
            .ok();
    }
    let date = value["date"].as_str()?;
    let naive = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    Some(DateTime::from_naive_utc_and_offset(
        naive.and_hms_opt(0, 0, 0)?,
        Utc,
    ))
}

/// Convert an insert payload to the wire format.
pub fn to_wire_event(event: &NewRemoteEvent) -> serde_json::Value {
    let mut wire = json!({
        "summary": event.title,
        "start": { "dateTime": event.start.to_rfc3339() },
        "end": { "dateTime": event.end.to_rfc3339() },
    });
    if let Some(ref description) = event.description {
        wire["description"] = json!(description);
    }
    wire
}
