use chrono::{Duration, NaiveDateTime};

use crate::clients::calendar::CalendarBackend;
use crate::display;
use crate::error::AgendoError;
use crate::input::Prompter;
use crate::models::category::{CategoryRegistry, color_to_id};
use crate::models::event::CalendarEvent;

/// The activity being tracked right now. One per session; the shell keeps it
/// across commands, one-shot invocations recover it from the backend.
#[derive(Default)]
pub struct SessionState {
    pub current: Option<CalendarEvent>,
}

impl SessionState {
    /// Falls back to the most recently started event of the last 12 hours,
    /// so `stop` works in a fresh process.
    pub async fn current_or_recover(
        &mut self,
        backend: &dyn CalendarBackend,
        now: NaiveDateTime,
    ) -> Result<Option<&mut CalendarEvent>, AgendoError> {
        if self.current.is_none() {
            self.current = backend.last_event(now).await?;
        }
        Ok(self.current.as_mut())
    }
}

// A freshly started activity gets a provisional half-hour slot; stop rewrites
// the real end time.
fn provisional_slot() -> Duration {
    Duration::minutes(30)
}

/// Begin an activity now. Any running activity is stopped first. With no name
/// tokens the user is asked for one.
pub async fn start(
    backend: &dyn CalendarBackend,
    categories: &CategoryRegistry,
    session: &mut SessionState,
    category: &str,
    name_tokens: &[String],
    now: NaiveDateTime,
    prompter: &mut dyn Prompter,
) -> Result<(), AgendoError> {
    let name = if name_tokens.is_empty() {
        prompter.prompt_line("name of event")?
    } else {
        name_tokens.join(" ")
    };

    if let Some(current) = session.current.take() {
        if let Err(err) = backend.update_end(&current.id, now).await {
            display::error(&format!("Could not stop the current activity: {}", err));
        }
    }

    let color = categories.color_for(category);
    let event = backend
        .insert(&name, color_to_id(color), now, now + provisional_slot())
        .await?;
    session.current = Some(event);
    display::ok("Successfully added activity!");
    Ok(())
}

/// End the current activity, reporting how long it ran.
pub async fn stop(
    backend: &dyn CalendarBackend,
    session: &mut SessionState,
    now: NaiveDateTime,
) -> Result<(), AgendoError> {
    let Some(current) = session.current_or_recover(backend, now).await? else {
        return Err(AgendoError::Command("Nothing to stop".to_string()));
    };
    let duration = now - current.start;
    display::info(&format!(
        "The activity '{}' lasted {}",
        current.name,
        format_duration(duration)
    ));
    backend.update_end(&current.id, now).await?;
    session.current = None;
    display::ok("Successfully stopped the activity! I hope it went well");
    Ok(())
}

pub async fn delete(
    backend: &dyn CalendarBackend,
    session: &mut SessionState,
    now: NaiveDateTime,
) -> Result<(), AgendoError> {
    let Some(current) = session.current_or_recover(backend, now).await? else {
        return Err(AgendoError::Command("Nothing to delete".to_string()));
    };
    backend.delete(&current.id).await?;
    session.current = None;
    display::ok("Successfully deleted the activity!");
    Ok(())
}

pub async fn rename(
    backend: &dyn CalendarBackend,
    session: &mut SessionState,
    name_tokens: &[String],
    now: NaiveDateTime,
    prompter: &mut dyn Prompter,
) -> Result<(), AgendoError> {
    let name = if name_tokens.is_empty() {
        prompter.prompt_line("name of event")?
    } else {
        name_tokens.join(" ")
    };
    let Some(current) = session.current_or_recover(backend, now).await? else {
        return Err(AgendoError::Command("Nothing to rename".to_string()));
    };
    backend.rename(&current.id, &name).await?;
    current.name = name;
    display::ok("Successfully renamed the activity");
    Ok(())
}

pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    format!("{}h{:02}m", minutes / 60, minutes % 60)
}
