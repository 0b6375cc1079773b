use chrono::NaiveDateTime;

/// Fully resolved input for one calendar write: what the argument resolver
/// hands to the command layer. End is always strictly after start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub category: String,
    pub name: String,
}

/// An event as the calendar backend knows it. Times are local wall-clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub id: String,
    pub name: String,
    pub color_id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}
