use chrono::{Datelike, Duration, NaiveDateTime};

use crate::clients::calendar::CalendarBackend;
use crate::display;
use crate::error::AgendoError;
use crate::input::Prompter;
use crate::models::category::{CategoryRegistry, color_to_id, id_to_color};
use crate::models::event::CalendarEvent;
use crate::parse;
use crate::resolve;

/// Resolves the shared `[date] [days]` argument pair of `plan` and `stats`
/// into a half-open span starting at midnight.
fn span(
    date: Option<&str>,
    days: Option<&str>,
    now: NaiveDateTime,
) -> Result<(NaiveDateTime, NaiveDateTime), AgendoError> {
    let begin = match date {
        Some(token) => parse::parse_date(token, now.date())
            .ok_or(AgendoError::WrongFormatting)?,
        None => now.date(),
    };
    let days = match days {
        Some(token) => token
            .parse::<i64>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| AgendoError::NotANumber(token.to_string()))?,
        None => 1,
    };
    let begin = begin.and_hms_opt(0, 0, 0).unwrap_or(now);
    Ok((begin, begin + Duration::days(days)))
}

fn event_line(index: usize, event: &CalendarEvent, categories: &CategoryRegistry) -> String {
    let mut category = categories.name_for_color(id_to_color(&event.color_id));
    if category == "default" {
        category = "";
    }
    format!(
        "[{}] [ {} -> {} ] [{:<6}: {}",
        index,
        event.start.format("%H:%M"),
        event.end.format("%H:%M"),
        format!("{}]", category),
        event.name
    )
}

/// Show the schedule of a day (or several), one line per event, with a
/// heading whenever the day changes.
pub async fn show(
    backend: &dyn CalendarBackend,
    categories: &CategoryRegistry,
    date: Option<&str>,
    days: Option<&str>,
    now: NaiveDateTime,
) -> Result<(), AgendoError> {
    let (begin, end) = span(date, days, now)?;
    let events = backend.list_between(begin, end).await?;
    if events.is_empty() {
        display::ok("No events found");
        return Ok(());
    }

    let mut last_day = None;
    for (index, event) in events.iter().enumerate() {
        let day = (event.start.year(), event.start.ordinal());
        if last_day != Some(day) {
            display::heading(&format!(" Events of {}", event.start.format("%m/%d")));
            last_day = Some(day);
        }
        display::ok(&event_line(index, event, categories));
    }
    Ok(())
}

/// Log an event at an arbitrary time: run the argument resolver over the
/// token tail, then write the draft to the calendar.
pub async fn add(
    backend: &dyn CalendarBackend,
    categories: &CategoryRegistry,
    tokens: &[String],
    now: NaiveDateTime,
    prompter: &mut dyn Prompter,
) -> Result<(), AgendoError> {
    let draft = resolve::resolve_event(tokens, now, prompter)?;
    display::ok(&format!(
        "Adding event {} of category {} starting {} at {} until {}",
        draft.name,
        draft.category,
        draft.start.format("%Y-%m-%d"),
        draft.start.format("%H:%M"),
        draft.end.format("%H:%M"),
    ));
    let color = categories.color_for(&draft.category);
    backend
        .insert(&draft.name, color_to_id(color), draft.start, draft.end)
        .await?;
    Ok(())
}

/// Time spent per category over a span, largest first.
pub fn category_totals(
    events: &[CalendarEvent],
    categories: &CategoryRegistry,
) -> Vec<(String, Duration)> {
    let mut totals: Vec<(String, Duration)> = Vec::new();
    for event in events {
        let name = categories.name_for_color(id_to_color(&event.color_id));
        let duration = event.end - event.start;
        match totals.iter_mut().find(|(n, _)| n == name) {
            Some((_, total)) => *total = *total + duration,
            None => totals.push((name.to_string(), duration)),
        }
    }
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals
}

pub async fn stats(
    backend: &dyn CalendarBackend,
    categories: &CategoryRegistry,
    date: Option<&str>,
    days: Option<&str>,
    now: NaiveDateTime,
) -> Result<(), AgendoError> {
    let (begin, end) = span(date, days, now)?;
    let events = backend.list_between(begin, end).await?;
    if events.is_empty() {
        display::ok("No events found");
        return Ok(());
    }

    for (category, total) in category_totals(&events, categories) {
        display::heading(&format!("=== {} ===", category));
        display::ok(&format!(
            "      Total : {}",
            super::activity::format_duration(total)
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::mock::MockCalendar;
    use crate::input::ScriptedPrompter;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(13, 0, 0)
            .unwrap()
    }

    fn registry() -> CategoryRegistry {
        CategoryRegistry::from_config_value("work=red,lunch=yellow").unwrap()
    }

    #[test]
    fn span_defaults_to_today_midnight_one_day() {
        let (begin, end) = span(None, None, now()).unwrap();
        assert_eq!(begin, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(end - begin, Duration::days(1));
    }

    #[test]
    fn span_takes_date_and_day_count() {
        let (begin, end) = span(Some("2024-03-01"), Some("7"), now()).unwrap();
        assert_eq!(begin.date(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(end - begin, Duration::days(7));
    }

    #[test]
    fn span_rejects_bad_arguments() {
        assert!(matches!(
            span(Some("nonsense"), None, now()),
            Err(AgendoError::WrongFormatting)
        ));
        assert!(matches!(
            span(Some("today"), Some("zero"), now()),
            Err(AgendoError::NotANumber(_))
        ));
        assert!(matches!(
            span(Some("today"), Some("0"), now()),
            Err(AgendoError::NotANumber(_))
        ));
    }

    #[test]
    fn event_line_shows_times_and_category() {
        let event = CalendarEvent {
            id: "e".to_string(),
            name: "standup".to_string(),
            color_id: "11".to_string(),
            start: now(),
            end: now() + Duration::minutes(30),
        };
        let line = event_line(0, &event, &registry());
        assert_eq!(line, "[0] [ 13:00 -> 13:30 ] [work] : standup");
    }

    #[test]
    fn totals_group_by_category_largest_first() {
        let make = |color_id: &str, minutes: i64| CalendarEvent {
            id: uuid::Uuid::new_v4().to_string(),
            name: "e".to_string(),
            color_id: color_id.to_string(),
            start: now(),
            end: now() + Duration::minutes(minutes),
        };
        let events = vec![make("11", 30), make("5", 90), make("11", 15)];
        let totals = category_totals(&events, &registry());
        assert_eq!(
            totals,
            vec![
                ("lunch".to_string(), Duration::minutes(90)),
                ("work".to_string(), Duration::minutes(45)),
            ]
        );
    }

    #[tokio::test]
    async fn add_resolves_then_inserts() {
        let backend = MockCalendar::new();
        let mut prompter = ScriptedPrompter::new(["standup"]);
        let tokens: Vec<String> = ["2024-03-01", "09:00", "09:15", "work"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        add(&backend, &registry(), &tokens, now(), &mut prompter)
            .await
            .unwrap();

        let events = backend.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "standup");
        assert_eq!(events[0].color_id, "11");
        assert_eq!(
            events[0].start,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(9, 0, 0).unwrap()
        );
    }
}
