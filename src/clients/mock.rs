use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::clients::calendar::CalendarBackend;
use crate::error::AgendoError;
use crate::models::event::CalendarEvent;

/// In-memory backend for tests and offline runs. Events live in a mutex so a
/// shared reference can drive the same async trait as the real client.
#[derive(Default)]
pub struct MockCalendar {
    events: Mutex<Vec<CalendarEvent>>,
}

impl MockCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CalendarEvent> {
        self.events.lock().expect("mock calendar poisoned").clone()
    }
}

#[async_trait]
impl CalendarBackend for MockCalendar {
    async fn insert(
        &self,
        name: &str,
        color_id: Option<&str>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<CalendarEvent, AgendoError> {
        let event = CalendarEvent {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            color_id: color_id.unwrap_or_default().to_string(),
            start,
            end,
        };
        self.events
            .lock()
            .expect("mock calendar poisoned")
            .push(event.clone());
        Ok(event)
    }

    async fn update_end(&self, id: &str, end: NaiveDateTime) -> Result<(), AgendoError> {
        let mut events = self.events.lock().expect("mock calendar poisoned");
        match events.iter_mut().find(|e| e.id == id) {
            Some(event) => {
                event.end = end;
                Ok(())
            }
            None => Err(AgendoError::Backend(format!("No event with id {}", id))),
        }
    }

    async fn rename(&self, id: &str, name: &str) -> Result<(), AgendoError> {
        let mut events = self.events.lock().expect("mock calendar poisoned");
        match events.iter_mut().find(|e| e.id == id) {
            Some(event) => {
                event.name = name.to_string();
                Ok(())
            }
            None => Err(AgendoError::Backend(format!("No event with id {}", id))),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), AgendoError> {
        let mut events = self.events.lock().expect("mock calendar poisoned");
        let before = events.len();
        events.retain(|e| e.id != id);
        if events.len() == before {
            return Err(AgendoError::Backend(format!("No event with id {}", id)));
        }
        Ok(())
    }

    async fn list_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<CalendarEvent>, AgendoError> {
        let mut events: Vec<CalendarEvent> = self
            .events
            .lock()
            .expect("mock calendar poisoned")
            .iter()
            .filter(|e| e.start < end && e.end > start)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.start);
        Ok(events)
    }
}
