use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::AgendoError;
use crate::models::event::CalendarEvent;

/// The remote calendar, reduced to the calls the commands need. All times
/// are local wall-clock; implementations deal with offsets on the wire.
#[async_trait]
pub trait CalendarBackend: Send + Sync {
    async fn insert(
        &self,
        name: &str,
        color_id: Option<&str>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<CalendarEvent, AgendoError>;

    async fn update_end(&self, id: &str, end: NaiveDateTime) -> Result<(), AgendoError>;

    async fn rename(&self, id: &str, name: &str) -> Result<(), AgendoError>;

    async fn delete(&self, id: &str) -> Result<(), AgendoError>;

    async fn list_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<CalendarEvent>, AgendoError>;

    /// Most recently started event of the last 12 hours, to offer resuming
    /// it as the current activity.
    async fn last_event(&self, now: NaiveDateTime) -> Result<Option<CalendarEvent>, AgendoError> {
        let events = self.list_between(now - Duration::hours(12), now).await?;
        Ok(events.into_iter().max_by_key(|e| e.start))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct EventDateTimeBody {
    #[serde(rename = "dateTime")]
    date_time: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct EventBody {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    summary: Option<String>,
    #[serde(rename = "colorId", skip_serializing_if = "Option::is_none", default)]
    color_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    start: Option<EventDateTimeBody>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    end: Option<EventDateTimeBody>,
}

#[derive(Debug, Deserialize)]
struct EventListBody {
    #[serde(default)]
    items: Vec<EventBody>,
}

/// Google Calendar v3 REST client for one calendar. The bearer token comes
/// from configuration; acquiring it is out of scope here.
pub struct GoogleCalendar {
    client: reqwest::Client,
    base_url: String,
    token: String,
    calendar_id: String,
}

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

impl GoogleCalendar {
    pub fn new(token: String, calendar_id: String) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string(), token, calendar_id)
    }

    pub fn with_base_url(base_url: String, token: String, calendar_id: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            token,
            calendar_id,
        }
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{}/events", self.base_url, self.calendar_id)
    }

    fn event_url(&self, id: &str) -> String {
        format!("{}/{}", self.events_url(), id)
    }

    async fn check(response: reqwest::Response) -> Result<String, AgendoError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AgendoError::Backend(e.to_string()))?;
        if !status.is_success() {
            return Err(AgendoError::Backend(format!(
                "Calendar request failed with status {}: {}",
                status, text
            )));
        }
        Ok(text)
    }
}

fn to_rfc3339(local: NaiveDateTime) -> String {
    match Local.from_local_datetime(&local) {
        chrono::LocalResult::Single(dt) | chrono::LocalResult::Ambiguous(dt, _) => dt.to_rfc3339(),
        // A wall-clock instant skipped by a DST jump: shift by the offset of
        // the nearest representable moment.
        chrono::LocalResult::None => Local
            .from_local_datetime(&(local + Duration::hours(1)))
            .earliest()
            .map(|dt| (dt - Duration::hours(1)).to_rfc3339())
            .unwrap_or_default(),
    }
}

fn from_rfc3339(text: &str) -> Result<NaiveDateTime, AgendoError> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Local).naive_local())
        .map_err(|e| AgendoError::Backend(format!("Bad event time '{}': {}", text, e)))
}

fn from_body(body: EventBody) -> Result<CalendarEvent, AgendoError> {
    let start = body
        .start
        .ok_or_else(|| AgendoError::Backend("Event without start time".to_string()))?;
    let end = body
        .end
        .ok_or_else(|| AgendoError::Backend("Event without end time".to_string()))?;
    Ok(CalendarEvent {
        id: body.id.unwrap_or_default(),
        name: body.summary.unwrap_or_default(),
        color_id: body.color_id.unwrap_or_default(),
        start: from_rfc3339(&start.date_time)?,
        end: from_rfc3339(&end.date_time)?,
    })
}

#[async_trait]
impl CalendarBackend for GoogleCalendar {
    async fn insert(
        &self,
        name: &str,
        color_id: Option<&str>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<CalendarEvent, AgendoError> {
        let body = EventBody {
            id: None,
            summary: Some(name.to_string()),
            color_id: color_id.map(str::to_string),
            start: Some(EventDateTimeBody {
                date_time: to_rfc3339(start),
            }),
            end: Some(EventDateTimeBody {
                date_time: to_rfc3339(end),
            }),
        };
        let response = self
            .client
            .post(self.events_url())
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgendoError::Backend(e.to_string()))?;
        let text = Self::check(response).await?;
        let created: EventBody = serde_json::from_str(&text)
            .map_err(|e| AgendoError::Backend(format!("Bad insert response: {}", e)))?;
        from_body(created)
    }

    async fn update_end(&self, id: &str, end: NaiveDateTime) -> Result<(), AgendoError> {
        let body = EventBody {
            id: None,
            summary: None,
            color_id: None,
            start: None,
            end: Some(EventDateTimeBody {
                date_time: to_rfc3339(end),
            }),
        };
        let response = self
            .client
            .patch(self.event_url(id))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgendoError::Backend(e.to_string()))?;
        Self::check(response).await.map(|_| ())
    }

    async fn rename(&self, id: &str, name: &str) -> Result<(), AgendoError> {
        let body = EventBody {
            id: None,
            summary: Some(name.to_string()),
            color_id: None,
            start: None,
            end: None,
        };
        let response = self
            .client
            .patch(self.event_url(id))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgendoError::Backend(e.to_string()))?;
        Self::check(response).await.map(|_| ())
    }

    async fn delete(&self, id: &str) -> Result<(), AgendoError> {
        let response = self
            .client
            .delete(self.event_url(id))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| AgendoError::Backend(e.to_string()))?;
        Self::check(response).await.map(|_| ())
    }

    async fn list_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<CalendarEvent>, AgendoError> {
        let response = self
            .client
            .get(self.events_url())
            .bearer_auth(&self.token)
            .query(&[
                ("timeMin", to_rfc3339(start)),
                ("timeMax", to_rfc3339(end)),
                ("singleEvents", "true".to_string()),
                ("showDeleted", "false".to_string()),
                ("orderBy", "startTime".to_string()),
                ("maxResults", "512".to_string()),
            ])
            .send()
            .await
            .map_err(|e| AgendoError::Backend(e.to_string()))?;
        let text = Self::check(response).await?;
        let list: EventListBody = serde_json::from_str(&text)
            .map_err(|e| AgendoError::Backend(format!("Bad list response: {}", e)))?;
        list.items.into_iter().map(from_body).collect()
    }
}
